//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use notabook_core::config::AppConfig;
use notabook_database::Stores;
use notabook_service::{
    AdminUserService, AuditLogger, AuthSessionManager, ClientService, DashboardService,
    DocumentRenderer, JsonRenderer, NoteTransactionManager, ShareTokenService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Login, logout, and bearer token resolution
    pub sessions: Arc<AuthSessionManager>,
    /// Note transactions and reads
    pub notes: Arc<NoteTransactionManager>,
    /// Client management
    pub clients: Arc<ClientService>,
    /// User administration
    pub users: Arc<AdminUserService>,
    /// Share tokens and public reads
    pub share: Arc<ShareTokenService>,
    /// Audit log browsing
    pub audit: Arc<AuditLogger>,
    /// Dashboard figures
    pub dashboard: Arc<DashboardService>,
    /// Document engine for note downloads
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// Wire every service on top of the given stores, rendering documents
    /// with the [`JsonRenderer`].
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        Self::with_renderer(config, stores, Arc::new(JsonRenderer::new()))
    }

    /// Wire every service with a specific document renderer.
    pub fn with_renderer(
        config: AppConfig,
        stores: Stores,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        let audit = AuditLogger::new(Arc::clone(&stores.audit));

        let sessions = AuthSessionManager::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.sessions),
            audit.clone(),
            &config.auth,
            &config.session,
        );
        let notes = NoteTransactionManager::new(
            Arc::clone(&stores.notes),
            Arc::clone(&stores.clients),
            audit.clone(),
        );
        let clients = ClientService::new(Arc::clone(&stores.clients), audit.clone());
        let users = AdminUserService::new(Arc::clone(&stores.users), audit.clone(), &config.auth);
        let share = ShareTokenService::new(
            Arc::clone(&stores.clients),
            Arc::clone(&stores.notes),
            audit.clone(),
            config.share.clone(),
        );
        let dashboard = DashboardService::new(Arc::clone(&stores.clients), Arc::clone(&stores.notes));

        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            notes: Arc::new(notes),
            clients: Arc::new(clients),
            users: Arc::new(users),
            share: Arc::new(share),
            audit: Arc::new(audit),
            dashboard: Arc::new(dashboard),
            renderer,
        }
    }
}

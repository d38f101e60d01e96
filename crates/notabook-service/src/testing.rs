//! Fixtures shared by the service tests: every service wired to one
//! in-memory store with two staff users and two clients.

use rust_decimal::Decimal;

use notabook_auth::PasswordHasher;
use notabook_core::config::AppConfig;
use notabook_core::types::{ClientId, SessionId, UserId};
use notabook_database::{MemoryStore, Stores};
use notabook_entity::client::{Client, ClientInput};
use notabook_entity::note::{NewLineItem, NoteStatus};
use notabook_entity::session::SessionIdentity;
use notabook_entity::user::{CreateUser, User, UserRole};

use crate::{
    AdminUserService, AuditLogger, AuthSessionManager, ClientService, DashboardService,
    NoteInput, NoteTransactionManager, ShareTokenService,
};

/// An identity that is not backed by any stored user.
pub(crate) fn identity(role: UserRole) -> SessionIdentity {
    SessionIdentity {
        session_id: SessionId::new(),
        user_id: UserId::new(),
        name: format!("{role} fixture"),
        role,
    }
}

/// A line item with a generic description.
pub(crate) fn item(quantity: Decimal, unit_price: Decimal) -> NewLineItem {
    NewLineItem {
        article: "CU-01".to_string(),
        description: "Cobre".to_string(),
        quantity,
        unit_price,
    }
}

/// A pending note for `client_id`.
pub(crate) fn note_input(client_id: ClientId, line_items: Vec<NewLineItem>) -> NoteInput {
    NoteInput {
        client_id,
        description: "Compra de metal".to_string(),
        status: NoteStatus::Pending,
        line_items,
    }
}

/// Services wired to a seeded in-memory store.
pub(crate) struct Harness {
    pub store: MemoryStore,
    pub audit: AuditLogger,
    pub sessions: AuthSessionManager,
    pub notes: NoteTransactionManager,
    pub clients: ClientService,
    pub users: AdminUserService,
    pub share: ShareTokenService,
    pub dashboard: DashboardService,
    pub admin: SessionIdentity,
    pub secretary: SessionIdentity,
    pub acme: Client,
    pub globex: Client,
}

impl Harness {
    pub async fn new() -> Self {
        let config = AppConfig::in_memory();
        let store = MemoryStore::new();
        let stores = Stores::memory(store.clone());

        let admin = seed_user(
            &stores,
            "Admin",
            "admin@notabook.test",
            "admin123",
            UserRole::Admin,
        )
        .await;
        let secretary = seed_user(
            &stores,
            "Secretaria",
            "secretaria@notabook.test",
            "secret123",
            UserRole::Secretary,
        )
        .await;
        let acme = seed_client(&stores, "Acme", "compras@acme.test").await;
        let globex = seed_client(&stores, "Globex", "pagos@globex.test").await;

        let audit = AuditLogger::new(stores.audit.clone());
        Self {
            sessions: AuthSessionManager::new(
                stores.users.clone(),
                stores.sessions.clone(),
                audit.clone(),
                &config.auth,
                &config.session,
            ),
            notes: NoteTransactionManager::new(
                stores.notes.clone(),
                stores.clients.clone(),
                audit.clone(),
            ),
            clients: ClientService::new(stores.clients.clone(), audit.clone()),
            users: AdminUserService::new(stores.users.clone(), audit.clone(), &config.auth),
            share: ShareTokenService::new(
                stores.clients.clone(),
                stores.notes.clone(),
                audit.clone(),
                config.share.clone(),
            ),
            dashboard: DashboardService::new(stores.clients.clone(), stores.notes.clone()),
            admin: identity_of(&admin),
            secretary: identity_of(&secretary),
            audit,
            store,
            acme,
            globex,
        }
    }
}

fn identity_of(user: &User) -> SessionIdentity {
    SessionIdentity {
        session_id: SessionId::new(),
        user_id: user.id,
        name: user.name.clone(),
        role: user.role,
    }
}

async fn seed_user(
    stores: &Stores,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> User {
    let password_hash = PasswordHasher::new().hash_password(password).unwrap();
    stores
        .users
        .create(&CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            active: true,
        })
        .await
        .unwrap()
}

async fn seed_client(stores: &Stores, name: &str, email: &str) -> Client {
    stores
        .clients
        .create(&ClientInput {
            name: name.to_string(),
            email: email.to_string(),
            ..ClientInput::default()
        })
        .await
        .unwrap()
}

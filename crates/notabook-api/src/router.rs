//! Route definitions for the Notabook HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);
    let server = &config.server;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(client_routes())
        .merge(note_routes())
        .merge(admin_routes())
        .merge(public_routes())
        .route("/dashboard", get(handlers::dashboard::stats))
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Client CRUD and share tokens
fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clients",
            get(handlers::client::list_clients).post(handlers::client::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::client::get_client)
                .put(handlers::client::update_client)
                .delete(handlers::client::delete_client),
        )
        .route(
            "/clients/{id}/share-token",
            post(handlers::client::issue_share_token),
        )
}

/// Note CRUD, status, and documents
fn note_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(handlers::note::list_notes).post(handlers::note::create_note),
        )
        .route("/notes/next-folio", get(handlers::note::next_folio))
        .route(
            "/notes/{id}",
            get(handlers::note::get_note)
                .put(handlers::note::update_note)
                .delete(handlers::note::delete_note),
        )
        .route("/notes/{id}/status", put(handlers::note::set_status))
        .route("/notes/{id}/document", get(handlers::note::document))
}

/// Admin endpoints: users and audit log
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/users",
            get(handlers::admin::users::list_users).post(handlers::admin::users::create_user),
        )
        .route(
            "/admin/users/{id}",
            get(handlers::admin::users::get_user).put(handlers::admin::users::update_user),
        )
        .route(
            "/admin/users/{id}/activate",
            post(handlers::admin::users::activate_user),
        )
        .route(
            "/admin/users/{id}/deactivate",
            post(handlers::admin::users::deactivate_user),
        )
        .route("/admin/audit", get(handlers::admin::audit::search))
        .route("/admin/audit/stats", get(handlers::admin::audit::stats))
}

/// Token-scoped public endpoints (no session)
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/public/{token}/notes", get(handlers::public::list_notes))
        .route(
            "/public/{token}/notes/{note_id}/document",
            get(handlers::public::document),
        )
}

//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::State;

use notabook_auth::PermissionEvaluator;
use notabook_entity::session::SessionIdentity;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, MeResponse, MessageResponse};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn me_response(identity: SessionIdentity) -> MeResponse {
    MeResponse {
        capabilities: PermissionEvaluator::new().capabilities(identity.role),
        identity,
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    validate_request(&req)?;
    let outcome = state.sessions.authenticate(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: outcome.access_token,
        expires_at: outcome.expires_at,
        user: me_response(outcome.identity),
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.sessions.destroy_session(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::ok(me_response(auth.0)))
}

//! Dashboard handler.

use axum::Json;
use axum::extract::State;

use notabook_service::DashboardStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard
pub async fn stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.dashboard.stats().await?)))
}

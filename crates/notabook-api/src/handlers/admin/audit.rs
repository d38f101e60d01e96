//! Audit log browsing handlers.

use axum::Json;
use axum::extract::{Query, State};

use notabook_core::types::PageResponse;
use notabook_entity::audit::AuditLogEntry;
use notabook_service::AuditStats;

use crate::dto::request::AuditQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<PageResponse<AuditLogEntry>>>, ApiError> {
    let page = state
        .audit
        .search(&auth, &query.into(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/admin/audit/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AuditStats>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.audit.stats(&auth).await?)))
}

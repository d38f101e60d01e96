//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use notabook_core::types::{PageResponse, UserId};
use notabook_entity::user::User;

use crate::dto::request::{CreateUserBody, UpdateUserBody};
use crate::dto::response::ApiResponse;
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<User>>>, ApiError> {
    let page = state
        .users
        .list_users(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validate_request(&body)?;
    let user = state.users.create_user(&auth, &body.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.users.get_user(&auth, id).await?)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validate_request(&body)?;
    let user = state.users.update_user(&auth, id, &body.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/admin/users/{id}/activate
pub async fn activate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.users.activate_user(&auth, id).await?,
    )))
}

/// POST /api/admin/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    Ok(Json(ApiResponse::ok(
        state.users.deactivate_user(&auth, id).await?,
    )))
}

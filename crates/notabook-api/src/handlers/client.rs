//! Client handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use notabook_core::types::{ClientId, PageResponse};
use notabook_entity::client::Client;
use notabook_service::IssuedShareToken;

use crate::dto::request::{ClientListQuery, ClientRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/clients
pub async fn list_clients(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<ApiResponse<PageResponse<Client>>>, ApiError> {
    let page = state
        .clients
        .list_clients(query.search.as_deref(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ClientRequest>,
) -> Result<Json<ApiResponse<Client>>, ApiError> {
    validate_request(&req)?;
    let client = state.clients.create_client(&auth, &req.into()).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// GET /api/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<ApiResponse<Client>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.clients.get_client(id).await?)))
}

/// PUT /api/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ClientId>,
    Json(req): Json<ClientRequest>,
) -> Result<Json<ApiResponse<Client>>, ApiError> {
    validate_request(&req)?;
    let client = state.clients.update_client(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(client)))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.clients.delete_client(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Client deleted"))))
}

/// POST /api/clients/{id}/share-token
pub async fn issue_share_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ClientId>,
) -> Result<Json<ApiResponse<IssuedShareToken>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.share.issue_token(&auth, id).await?)))
}

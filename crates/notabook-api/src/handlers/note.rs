//! Note handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;

use notabook_core::types::{NoteId, PageResponse};
use notabook_entity::note::{Note, NoteDetail, NoteSummary};

use crate::dto::request::{NoteListQuery, NoteRequest, StatusRequest};
use crate::dto::response::{ApiResponse, MessageResponse, NextFolioResponse};
use crate::dto::validate_request;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::handlers::document_response;
use crate::state::AppState;

/// GET /api/notes
pub async fn list_notes(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(query): Query<NoteListQuery>,
) -> Result<Json<ApiResponse<PageResponse<NoteSummary>>>, ApiError> {
    let page = state
        .notes
        .list_notes(&query.into(), &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/notes/next-folio
pub async fn next_folio(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<NextFolioResponse>>, ApiError> {
    let folio = state.notes.peek_next_folio().await?;
    Ok(Json(ApiResponse::ok(NextFolioResponse {
        folio: folio.to_string(),
    })))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NoteRequest>,
) -> Result<Json<ApiResponse<Note>>, ApiError> {
    validate_request(&req)?;
    let note = state.notes.create_note(&auth, &req.into()).await?;
    Ok(Json(ApiResponse::ok(note)))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<NoteId>,
) -> Result<Json<ApiResponse<NoteDetail>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.notes.get_note(id).await?)))
}

/// PUT /api/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<ApiResponse<Note>>, ApiError> {
    validate_request(&req)?;
    let note = state.notes.update_note(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(note)))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.notes.delete_note(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Note deleted"))))
}

/// PUT /api/notes/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ApiResponse<Note>>, ApiError> {
    let note = state.notes.set_status(&auth, id, req.status).await?;
    Ok(Json(ApiResponse::ok(note)))
}

/// GET /api/notes/{id}/document
pub async fn document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<NoteId>,
) -> Result<Response, ApiError> {
    let document = state
        .notes
        .render_note(&auth, id, state.renderer.as_ref())
        .await?;
    Ok(document_response(document))
}

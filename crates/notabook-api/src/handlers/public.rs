//! Token-scoped public handlers. No session is involved; every failure
//! answers the same 404.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use notabook_core::error::AppError;
use notabook_core::types::NoteId;
use notabook_service::PublicNotes;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::handlers::document_response;
use crate::state::AppState;

/// GET /api/public/{token}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<PublicNotes>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.share.public_notes(&token).await?)))
}

/// GET /api/public/{token}/notes/{note_id}/document
pub async fn document(
    State(state): State<AppState>,
    Path((token, note_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    // A malformed id is indistinguishable from a foreign one.
    let note_id: NoteId = note_id.parse().map_err(|_| AppError::invalid_token())?;
    let document = state
        .share
        .public_document(&token, note_id, state.renderer.as_ref())
        .await?;
    Ok(document_response(document))
}

//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod client;
pub mod dashboard;
pub mod health;
pub mod note;
pub mod public;

use axum::http::header;
use axum::response::{IntoResponse, Response};

use notabook_service::RenderedDocument;

/// Serve a rendered document inline with its suggested file name.
pub(crate) fn document_response(document: RenderedDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", document.file_name),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

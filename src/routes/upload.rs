//! Upload routes
//!
//! `GET /upload` renders the form, `POST /upload` runs one upload session
//! over the request's multipart body.

use axum::{
    extract::{Multipart, State},
    response::Html,
};

use crate::error::Result;
use crate::html::upload_page;
use crate::session::UploadSession;
use crate::state::AppState;

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(upload_page(""))
}

/// POST /upload
///
/// Parts are streamed straight to storage as they arrive; the body is
/// never buffered as a whole.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Html<String>> {
    let mut session = UploadSession::new(
        state.store(),
        state.upload_cookie(),
        state.cipher(),
        state.buffer_size(),
    );

    let summary = session.run(&mut multipart).await?;
    tracing::debug!(session_id = %summary.id, files = summary.files.len(), "Upload session finished");

    Ok(Html(upload_page("ok")))
}

//! Download route
//!
//! Streams a stored object back through a bounded in-memory pipe. A
//! spawned task runs the serve pipeline into one end while the response
//! body reads from the other, so at most one pipe's worth of the object
//! is ever held in memory.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::transfer::{open_object, serve, StoredObject, ThroughputReport, TransferBuffer};

/// GET /download/*name
pub async fn download(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response> {
    let name = name.trim_start_matches('/').to_string();
    let path = state.store().resolve(&name).await?;
    let StoredObject { file, len } = open_object(&path).await?;

    let buffer_size = state.buffer_size();
    let (mut writer, reader) = tokio::io::duplex(buffer_size);

    let cipher = state.cipher().cloned();
    let file_name = name.clone();
    tokio::spawn(async move {
        let started = Instant::now();
        let mut buffer = TransferBuffer::new(buffer_size);

        match serve(file, &mut writer, &mut buffer, cipher.as_ref()).await {
            Ok(stats) => {
                let report = ThroughputReport::new(stats, started.elapsed());
                tracing::info!(
                    file_name = %file_name,
                    time_ms = report.elapsed_ms,
                    size = report.bytes,
                    throughput = report.bytes_per_sec,
                    part_size = report.mean_chunk_size,
                    "Download complete"
                );
            }
            Err(e) => {
                tracing::error!(file_name = %file_name, error = %e, "Download aborted");
            }
        }
    });

    let content_type = mime_guess::from_path(&name).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, len)
        .body(Body::from_stream(ReaderStream::with_capacity(reader, buffer_size)))
        .map_err(|e| AppError::Internal(e.to_string()))
}

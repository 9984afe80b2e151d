//! Upload session state machine

use std::time::Instant;

use uuid::Uuid;

use crate::storage::ObjectStore;
use crate::transfer::{drain, verify_token, CipherKey, ThroughputReport, TransferBuffer, TransferStats};

use super::parts::{Part, PartSource};
use super::types::{SessionError, SessionState, SessionSummary, StoredFile};

/// Form field carrying the upload token
pub const TOKEN_FIELD: &str = "uploadCookie";

/// Processing scope of one upload request.
///
/// Owns the session's transfer buffer; borrows everything else from the
/// server configuration. Nothing here outlives the request.
pub struct UploadSession<'s> {
    id: Uuid,
    store: &'s ObjectStore,
    expected_token: &'s [u8],
    cipher: Option<&'s CipherKey>,
    buffer: TransferBuffer,
    state: SessionState,
    authorized: bool,
    totals: TransferStats,
    files: Vec<StoredFile>,
    started: Instant,
}

impl<'s> UploadSession<'s> {
    pub fn new(
        store: &'s ObjectStore,
        expected_token: &'s [u8],
        cipher: Option<&'s CipherKey>,
        buffer_size: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            expected_token,
            cipher,
            buffer: TransferBuffer::new(buffer_size),
            state: SessionState::AwaitingPart,
            authorized: false,
            totals: TransferStats::default(),
            files: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn totals(&self) -> TransferStats {
        self.totals
    }

    /// Consume `parts` until the body ends or a part fails the session.
    ///
    /// On failure no further part is requested; the rest of the body is
    /// abandoned.
    pub async fn run<S>(&mut self, parts: &mut S) -> Result<SessionSummary, SessionError>
    where
        S: PartSource + ?Sized,
    {
        tracing::info!(session_id = %self.id, "Handling an upload post");

        loop {
            self.state = SessionState::AwaitingPart;

            let part = match parts.next_part().await {
                Ok(Some(part)) => part,
                Ok(None) => break,
                Err(e) => return Err(self.reject(e.into())),
            };

            if let Err(e) = self.handle_part(part).await {
                return Err(self.reject(e));
            }
        }

        self.state = SessionState::Done;
        let report = ThroughputReport::new(self.totals, self.started.elapsed());

        tracing::info!(
            session_id = %self.id,
            files = self.files.len(),
            time_ms = report.elapsed_ms,
            size = report.bytes,
            throughput = report.bytes_per_sec,
            part_size = report.mean_chunk_size,
            "Upload complete"
        );

        Ok(SessionSummary {
            id: self.id,
            files: std::mem::take(&mut self.files),
            totals: self.totals,
            report,
        })
    }

    async fn handle_part(&mut self, mut part: Part<'_>) -> Result<(), SessionError> {
        if part.field_name == TOKEN_FIELD {
            self.state = SessionState::ControlField;
            if verify_token(&mut part.body, self.expected_token, &mut self.buffer).await {
                self.authorized = true;
                tracing::debug!(session_id = %self.id, "Upload token accepted");
            } else {
                tracing::warn!(session_id = %self.id, "Upload token rejected");
            }
            return Ok(());
        }

        let Some(file_name) = part.file_name.take() else {
            tracing::debug!(
                session_id = %self.id,
                field = %part.field_name,
                "Skipping form field"
            );
            return Ok(());
        };

        self.state = SessionState::FileField;
        if !self.authorized {
            return Err(SessionError::Unauthorized(file_name));
        }

        let destination = self.store.resolve(&file_name).await?;
        tracing::info!(session_id = %self.id, file_name = %file_name, "Read part");

        let stats = drain(&mut part.body, &destination, &mut self.buffer, self.cipher).await?;
        self.totals.merge(stats);

        tracing::info!(
            session_id = %self.id,
            file_name = %file_name,
            bytes = stats.bytes,
            chunks = stats.chunks,
            download = %format!("/download/{}", file_name),
            "Wrote file"
        );

        self.files.push(StoredFile {
            name: file_name,
            stats,
        });
        Ok(())
    }

    fn reject(&mut self, error: SessionError) -> SessionError {
        self.state = SessionState::Rejected;
        match &error {
            SessionError::Unauthorized(file_name) => {
                tracing::warn!(session_id = %self.id, file_name = %file_name, "Failed authorization for file");
            }
            other => {
                tracing::error!(session_id = %self.id, error = %other, "Upload session aborted");
            }
        }
        error
    }
}

// ============================================================================
// Tests
// ============================================================================

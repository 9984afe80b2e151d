//! Multipart part iteration

use std::io;

use axum::extract::Multipart;
use futures::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

/// One multipart segment, borrowed from its source until dropped
pub struct Part<'a> {
    /// Form field name (empty when the part has none)
    pub field_name: String,

    /// File name attribute; `None` when absent or empty
    pub file_name: Option<String>,

    /// Segment content, positioned at its first byte
    pub body: Box<dyn AsyncRead + Send + Unpin + 'a>,
}

impl std::fmt::Debug for Part<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Part")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Malformed multipart framing
#[derive(Debug, thiserror::Error)]
#[error("Error getting a part: {0}")]
pub struct PartError(pub String);

/// Anything that yields multipart parts in order.
///
/// The previous part must be dropped before the next one is requested;
/// whatever it left unread is skipped by the source.
#[async_trait::async_trait]
pub trait PartSource: Send {
    /// Next part, or `None` at the end of the body
    async fn next_part<'a>(&'a mut self) -> Result<Option<Part<'a>>, PartError>;
}

#[async_trait::async_trait]
impl PartSource for Multipart {
    async fn next_part<'a>(&'a mut self) -> Result<Option<Part<'a>>, PartError> {
        let field = match self.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(PartError(e.to_string())),
        };

        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let body = StreamReader::new(
            field.map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
        );

        Ok(Some(Part {
            field_name,
            file_name,
            body: Box::new(body),
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Upload Session Orchestration
//!
//! One session per upload request. Parts are pulled from a [`PartSource`]
//! strictly one at a time:
//!
//! 1. The token field is checked against the configured upload cookie
//! 2. File parts are drained to storage once the session is authorized
//! 3. A file part seen before a valid token rejects the whole request
//! 4. Any other field is dropped unread

pub mod orchestrator;
pub mod parts;
pub mod types;

pub use orchestrator::{UploadSession, TOKEN_FIELD};
pub use parts::{Part, PartError, PartSource};
pub use types::*;

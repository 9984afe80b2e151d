//! Streaming Transfer Pipeline
//!
//! Everything that moves bytes between a client stream and disk goes
//! through a single fixed-size [`TransferBuffer`], so an 8 KiB buffer
//! drains a 100 GB upload with the same peak memory as a 100 KB one.
//!
//! - `buffer`: the bounded buffer and the chunked copy loop
//! - `token`: bounded read of the upload token
//! - `cipher`: AES-256-CTR reader/writer decorators
//! - `drain`: multipart part → file
//! - `serve`: file → response sink

pub mod buffer;
pub mod cipher;
pub mod drain;
pub mod serve;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use buffer::{pump, TransferBuffer, DEFAULT_BUFFER_SIZE};
pub use cipher::{CipherKey, CipherKeyError, CipherReader, CipherWriter, Keystream};
pub use drain::drain;
pub use serve::{open_object, serve, StoredObject};
pub use token::verify_token;
pub use types::*;

//! Object storage under a single root directory
//!
//! Object names come straight from clients (multipart file names and
//! download path suffixes), so every name is resolved here before it
//! touches the filesystem.

mod resolver;

pub use resolver::{ObjectStore, StorageError};

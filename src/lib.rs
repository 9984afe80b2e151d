//! Uploader Server Library
//!
//! Bounded-memory streaming upload and download of files over HTTP.
//! The main server binary is in main.rs.
//!
//! # Modules
//!
//! - `transfer`: Buffered pipelines (token check, drain, serve, stream cipher)
//! - `storage`: Object names to paths under the storage root
//! - `session`: Multipart upload session state machine
//! - `routes`: HTTP handlers and the router

pub mod config;
pub mod error;
pub mod html;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod transfer;

//! Configuration management for Uploader Server

use std::env;
use std::path::PathBuf;

use crate::transfer::{CipherKey, CipherKeyError, DEFAULT_BUFFER_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    /// At-rest stream cipher; `None` stores plaintext
    pub cipher: Option<CipherKey>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// Transfer buffer size; the per-session memory bound
    pub buffer_size: usize,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub upload_cookie: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("upload_cookie", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid number in {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("UPLOADER_BUFFER_SIZE must be greater than zero")]
    ZeroBufferSize,

    #[error("UPLOAD_COOKIE is {len} bytes but the transfer buffer holds only {buffer_size}")]
    TokenExceedsBuffer { len: usize, buffer_size: usize },

    #[error("UPLOADER_CIPHER_IV is set without UPLOADER_CIPHER_KEY")]
    IvWithoutKey,

    #[error(transparent)]
    Cipher(#[from] CipherKeyError),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 6060,
            },
            storage: StorageConfig {
                root: PathBuf::from("/tmp/uploader"),
                buffer_size: DEFAULT_BUFFER_SIZE,
            },
            auth: AuthConfig {
                upload_cookie: "change-me".to_string(),
            },
            cipher: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let defaults = Config::default();

        let port = match var("UPLOADER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "UPLOADER_PORT",
                value,
            })?,
            None => defaults.server.port,
        };

        let buffer_size = match var("UPLOADER_BUFFER_SIZE") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "UPLOADER_BUFFER_SIZE",
                value,
            })?,
            None => defaults.storage.buffer_size,
        };
        if buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }

        let upload_cookie = var("UPLOAD_COOKIE").ok_or(ConfigError::Missing("UPLOAD_COOKIE"))?;
        if upload_cookie.len() > buffer_size {
            return Err(ConfigError::TokenExceedsBuffer {
                len: upload_cookie.len(),
                buffer_size,
            });
        }

        let cipher = match (var("UPLOADER_CIPHER_KEY"), var("UPLOADER_CIPHER_IV")) {
            (Some(key), Some(iv)) => Some(CipherKey::from_hex(&key, &iv)?),
            (Some(_), None) => return Err(ConfigError::Missing("UPLOADER_CIPHER_IV")),
            (None, Some(_)) => return Err(ConfigError::IvWithoutKey),
            (None, None) => None,
        };

        Ok(Config {
            server: ServerConfig {
                host: var("UPLOADER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            storage: StorageConfig {
                root: var("UPLOADER_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.root),
                buffer_size,
            },
            auth: AuthConfig { upload_cookie },
            cipher,
        })
    }
}

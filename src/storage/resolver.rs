//! Root directory and name resolution

use std::io;
use std::path::{Component, Path, PathBuf};

/// Storage-specific errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object name escapes the storage root: {0}")]
    PathEscapesRoot(String),

    #[error("Invalid object name: {0:?}")]
    InvalidName(String),

    #[error("Storage root {} unavailable: {source}", .path.display())]
    Root { path: PathBuf, source: io::Error },
}

/// Resolves client-supplied object names to paths inside the root
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Open the store, creating the root directory (mode 0700 on unix)
    /// when it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let root_error = |source| StorageError::Root {
            path: root.clone(),
            source,
        };

        if !root.exists() {
            let mut builder = std::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o700);
            }
            builder.create(&root).map_err(root_error)?;
            tracing::info!(root = %root.display(), "Created storage root");
        }

        let root = root.canonicalize().map_err(root_error)?;
        Ok(Self { root })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an object name to a path under the root.
    ///
    /// Only plain path components are accepted: `..`, absolute paths and
    /// drive prefixes are rejected outright. Whatever already exists on the
    /// resolved path is canonicalized and must still lie under the root,
    /// which catches symlinks pointing outside it.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::PathEscapesRoot(name.to_string()));
                }
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let candidate = self.root.join(&relative);

        let existing = match tokio::fs::canonicalize(&candidate).await {
            Ok(real) => Some(real),
            Err(_) => match candidate.parent() {
                Some(parent) => tokio::fs::canonicalize(parent).await.ok(),
                None => None,
            },
        };

        if let Some(real) = existing {
            if !real.starts_with(&self.root) {
                return Err(StorageError::PathEscapesRoot(name.to_string()));
            }
        }

        Ok(candidate)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! File-backed persistence for the signed-in user's token.
//!
//! A record expires `TokenExpiresIn` seconds after it was saved. Missing,
//! unreadable and expired records all read as "no session".

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use colorboxd_core::types::UserToken;

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: UserToken,
    expires_at: DateTime<Utc>,
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, expiring `token_expires_in` seconds after `now`.
    pub fn save(&self, token: &UserToken, now: DateTime<Utc>) -> Result<(), TokenStoreError> {
        let record = StoredToken {
            token: token.clone(),
            expires_at: now + Duration::seconds(token.token_expires_in.max(0)),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&record)?)?;
        tracing::debug!(path = %self.path.display(), expires_at = %record.expires_at, "User token saved");
        Ok(())
    }

    /// The stored token, if one exists and has not expired at `now`.
    pub fn load(&self, now: DateTime<Utc>) -> Option<UserToken> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot read token store");
                return None;
            }
        };

        let record: StoredToken = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt token store");
                return None;
            }
        };

        if record.expires_at <= now {
            tracing::info!(expires_at = %record.expires_at, "Stored user token has expired");
            return None;
        }
        Some(record.token)
    }

    /// Remove the stored token. Absent records are not an error.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

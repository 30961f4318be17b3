//! The network collaborator seam.
//!
//! [`ListBackend`] describes the four Colorboxd backend calls. The HTTP
//! implementation lives in `colorboxd-client`; tests substitute fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{List, ListSummary, UserToken};

/// Prefix of the first status line on a successful list write.
pub const WRITE_SUCCESS_PREFIX: &str = "List updated successfully";

/// Description of a reordering to apply to a list.
///
/// The backend re-sorts its own copy of the entries by `sort_key`, rotates
/// so `start_offset` comes first and applies `reverse`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub list: List,
    #[serde(rename = "offset")]
    pub start_offset: usize,
    #[serde(rename = "sortMethod")]
    pub sort_key: String,
    pub reverse: bool,
}

#[async_trait]
pub trait ListBackend: Send + Sync {
    /// Exchange a Letterboxd authorization code for an access token.
    async fn auth_user(&self, auth_code: &str) -> Result<UserToken, CoreError>;

    /// Fetch the user's list summaries.
    async fn get_lists(&self, token: &str, user_id: &str, refresh: bool) -> Result<Vec<ListSummary>, CoreError>;

    /// Fetch a list's entries, each annotated with per-algorithm ranks.
    async fn sort_list(&self, token: &str, summary: &ListSummary, refresh: bool) -> Result<List, CoreError>;

    /// Submit a reordering. Returns the backend's status lines.
    async fn write_sorted_list(&self, token: &str, request: &WriteRequest) -> Result<Vec<String>, CoreError>;
}

/// Interpret the status lines returned by a list write.
///
/// Only a first line starting with [`WRITE_SUCCESS_PREFIX`] counts as
/// success, whatever the transport status was.
pub fn check_write_response(lines: &[String]) -> Result<(), CoreError> {
    match lines.first() {
        Some(first) if first.starts_with(WRITE_SUCCESS_PREFIX) => Ok(()),
        _ => Err(CoreError::WriteRejected(lines.to_vec())),
    }
}

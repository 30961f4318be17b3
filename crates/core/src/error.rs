/// Domain errors shared by every Colorboxd crate.
///
/// Network failures from the client layer are folded into [`CoreError::Fetch`]
/// so the session layer only ever deals with this one type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Cannot rotate an empty list")]
    ListEmpty,

    #[error("Index {index} is out of range for a list of {len} entries")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid sort key: '{0}'")]
    InvalidSortKey(String),

    #[error("Entry not found in list: {0}")]
    UnknownEntry(String),

    #[error("Request failed: {0}")]
    Fetch(String),

    #[error("List update rejected: {}", .0.join("; "))]
    WriteRejected(Vec<String>),

    #[error("List too short ({film_count} films): {message}")]
    MinimumLength { film_count: u32, message: String },

    #[error("Invalid list data: {0}")]
    DataMismatch(String),

    #[error("Cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Busy: {0}")]
    Busy(String),

    #[error("No active session")]
    NoSession,
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl CoreError {
    /// Human-readable text suitable for showing to the user.
    ///
    /// Technical detail (status codes, payload dumps) stays in the logs;
    /// only the guard hint and validation messages are passed through.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::ListEmpty | CoreError::OutOfRange { .. } => {
                "That list has no entries to reorder.".to_string()
            }
            CoreError::InvalidSortKey(key) => format!("Unknown sort mode '{key}'."),
            CoreError::UnknownEntry(_) => "That film is not in the current list.".to_string(),
            CoreError::Fetch(_) => "Could not reach Colorboxd. Please try again.".to_string(),
            CoreError::WriteRejected(_) => {
                "Error writing list to Letterboxd account.".to_string()
            }
            CoreError::MinimumLength { message, .. } => message.clone(),
            CoreError::DataMismatch(_) => {
                "The list returned by Letterboxd looks incomplete. Try refreshing.".to_string()
            }
            CoreError::InvalidTransition { .. } => "That action is not available right now.".to_string(),
            CoreError::Busy(_) => "Please wait...".to_string(),
            CoreError::NoSession => "Please sign in with Letterboxd first.".to_string(),
        }
    }
}

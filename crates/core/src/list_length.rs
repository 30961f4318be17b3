//! Minimum list length guard applied before a sort is requested.
//!
//! Short lists are rejected locally with a light-hearted hint; nothing is
//! sent to the backend.

use rand::seq::IndexedRandom;

use crate::error::CoreError;
use crate::types::ListSummary;

/// Default minimum number of films a list needs to be worth sorting.
pub const DEFAULT_MIN_LIST_LENGTH: u32 = 20;

/// Build the fixed set of rejection messages for a given threshold.
///
/// The "give me at least" message appears twice so it is picked more often.
pub fn rejection_messages(min_length: u32) -> Vec<String> {
    let at_least = format!("Give me at least {min_length} films.");
    vec![
        "Don't waste my time...".to_string(),
        "You call that a list?".to_string(),
        "You can sort that yourself!".to_string(),
        at_least.clone(),
        at_least,
    ]
}

/// Check a summary against the threshold, picking a random rejection
/// message when it is too short.
pub fn check_list_length(summary: &ListSummary, min_length: u32) -> Result<(), CoreError> {
    if summary.film_count >= min_length {
        return Ok(());
    }

    let messages = rejection_messages(min_length);
    let message = messages
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| format!("Give me at least {min_length} films."));

    Err(CoreError::MinimumLength {
        film_count: summary.film_count,
        message,
    })
}

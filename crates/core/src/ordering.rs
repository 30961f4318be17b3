//! In-place orderings of list entries and list-level data checks.

use std::cmp::Ordering;

use crate::error::CoreError;
use crate::sorting::SORT_MODES;
use crate::types::{Entry, List};

/// Sort entries ascending by their rank under `key`. Stable.
///
/// Entries without a rank for `key` sort last; [`validate_list`] rejects
/// such lists before they reach a session.
pub fn sort_by_rank(entries: &mut [Entry], key: &str) {
    entries.sort_by(|a, b| match (a.rank(key), b.rank(key)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Original-order key of an entry: the numeric value of its `entryId`.
///
/// Non-numeric ids sort after every numeric one.
fn original_key(entry: &Entry) -> (bool, u64) {
    match entry.entry_id.parse::<u64>() {
        Ok(n) => (false, n),
        Err(_) => (true, 0),
    }
}

/// Restore the list order the backend considers canonical. Stable.
pub fn sort_by_original(entries: &mut [Entry]) {
    entries.sort_by_key(original_key);
}

/// Check the invariants a list must satisfy before it can be reordered:
/// entry count matches `filmCount`, entry ids are unique, and every entry
/// carries a rank for every registered sort key.
pub fn validate_list(list: &List) -> Result<(), CoreError> {
    let film_count = list.summary.film_count as usize;
    if list.entries.len() != film_count {
        return Err(CoreError::DataMismatch(format!(
            "list '{}' reports {film_count} films but contains {} entries",
            list.summary.id,
            list.entries.len()
        )));
    }

    let mut ids: Vec<&str> = list.entries.iter().map(|e| e.entry_id.as_str()).collect();
    ids.sort_unstable();
    if let Some(dup) = ids.windows(2).find(|w| w[0] == w[1]) {
        return Err(CoreError::DataMismatch(format!(
            "duplicate entryId '{}' in list '{}'",
            dup[0], list.summary.id
        )));
    }

    for entry in &list.entries {
        if let Some(mode) = SORT_MODES.iter().find(|m| entry.rank(m.key).is_none()) {
            return Err(CoreError::DataMismatch(format!(
                "entry '{}' has no '{}' rank",
                entry.entry_id, mode.key
            )));
        }
    }
    Ok(())
}

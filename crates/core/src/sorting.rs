//! Sort registry: the closed, ordered set of colour sort algorithms.
//!
//! Keys match the rank field names the backend writes into every entry's
//! `sorts` map. Adding an algorithm only touches this table and the
//! server-side rank computation.

use crate::error::CoreError;

/// A registered sort algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortModeInfo {
    /// Stable wire key, e.g. `"Hue"`.
    pub key: &'static str,
    /// Label shown in the mode picker.
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub const SORT_HUE: &str = "Hue";
pub const SORT_LUMINOSITY: &str = "Lum";
pub const SORT_INVERSE_STEP_8: &str = "InverseStep_8";
pub const SORT_INVERSE_STEP_12: &str = "InverseStep_12";
pub const SORT_INVERSE_STEP_V2_8: &str = "InverseStep2_8";
pub const SORT_INVERSE_STEP_V2_12: &str = "InverseStep2_12";
pub const SORT_BRBW_1: &str = "BRBW1";
pub const SORT_BRBW_2: &str = "BRBW2";

/// All sort modes in presentation order. The first one is the default.
pub const SORT_MODES: &[SortModeInfo] = &[
    SortModeInfo { key: SORT_HUE, label: "Hue" },
    SortModeInfo { key: SORT_LUMINOSITY, label: "Luminosity" },
    SortModeInfo { key: SORT_INVERSE_STEP_8, label: "Inverse Step 8" },
    SortModeInfo { key: SORT_INVERSE_STEP_12, label: "Inverse Step 12" },
    SortModeInfo { key: SORT_INVERSE_STEP_V2_8, label: "Inverse Step V2 8" },
    SortModeInfo { key: SORT_INVERSE_STEP_V2_12, label: "Inverse Step V2 12" },
    SortModeInfo { key: SORT_BRBW_1, label: "BRBW 1" },
    SortModeInfo { key: SORT_BRBW_2, label: "BRBW 2" },
];

/// The ordered registry.
pub fn list_sort_modes() -> &'static [SortModeInfo] {
    SORT_MODES
}

/// The mode a freshly loaded list is sorted by.
pub fn default_sort_mode() -> &'static SortModeInfo {
    &SORT_MODES[0]
}

pub fn is_valid_key(key: &str) -> bool {
    SORT_MODES.iter().any(|m| m.key == key)
}

/// Look up a mode by key.
pub fn lookup(key: &str) -> Result<&'static SortModeInfo, CoreError> {
    SORT_MODES
        .iter()
        .find(|m| m.key == key)
        .ok_or_else(|| CoreError::InvalidSortKey(key.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn registry_is_not_empty_and_starts_with_hue() {
        assert!(!list_sort_modes().is_empty());
        assert_eq!(default_sort_mode().key, SORT_HUE);
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = SORT_MODES.iter().map(|m| m.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SORT_MODES.len());
    }

    #[test]
    fn valid_keys() {
        for mode in list_sort_modes() {
            assert!(is_valid_key(mode.key));
        }
        assert!(!is_valid_key("hue"));
        assert!(!is_valid_key(""));
    }

    #[test]
    fn lookup_returns_label() {
        assert_eq!(lookup("Lum").map(|m| m.label), Ok("Luminosity"));
    }

    #[test]
    fn lookup_unknown_key() {
        assert_matches!(lookup("Saturation"), Err(CoreError::InvalidSortKey(k)) if k == "Saturation");
    }

    #[test]
    fn registry_is_restartable() {
        let first: Vec<_> = list_sort_modes().iter().map(|m| m.key).collect();
        let second: Vec<_> = list_sort_modes().iter().map(|m| m.key).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
    }
}

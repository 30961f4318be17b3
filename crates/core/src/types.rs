//! Wire and domain types for users, lists and list entries.
//!
//! Field names follow the Colorboxd backend JSON: camelCase for list and
//! entry fields, PascalCase for the auth response and colour info.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-algorithm rank values, keyed by sort key.
pub type SortRanks = HashMap<String, f64>;

/// The backend's response to a successful Letterboxd sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserToken {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub token_expires_in: i64,
    pub token_refresh: String,
    pub user_id: String,
    pub username: String,
    pub user_given_name: String,
}

/// List metadata without its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub version: i64,
    pub film_count: u32,
    #[serde(default)]
    pub description: String,
}

/// RGB triple of a poster's dominant colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    #[serde(rename = "R")]
    pub r: f64,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "B")]
    pub b: f64,
}

/// Colour descriptor computed server-side. Opaque to the reorder engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageInfo {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub hue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luminosity: Option<f64>,
}

/// One film in a list, annotated with colour info and sort ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub entry_id: String,
    #[serde(default)]
    pub film_id: String,
    pub name: String,
    #[serde(default)]
    pub release_year: i32,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub poster_customisable: bool,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub adult_poster_url: String,
    #[serde(rename = "ImageInfo", default)]
    pub image_info: ImageInfo,
    #[serde(default)]
    pub sorts: SortRanks,
}

impl Entry {
    /// Rank of this entry under `key`, if the backend supplied one.
    pub fn rank(&self, key: &str) -> Option<f64> {
        self.sorts.get(key).copied()
    }

    /// Poster to display, honouring the adult variant.
    pub fn display_poster(&self) -> &str {
        if self.adult && !self.adult_poster_url.is_empty() {
            &self.adult_poster_url
        } else {
            &self.poster_url
        }
    }
}

/// A list together with its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(flatten)]
    pub summary: ListSummary,
    pub entries: Vec<Entry>,
}

impl List {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Physical index of the entry with `entry_id` in the current order.
    pub fn position_of(&self, entry_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.entry_id == entry_id)
    }
}

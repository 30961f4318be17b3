use crate::sorting::SORT_MODES;
use crate::types::{Entry, ImageInfo, List, ListSummary};

/// An entry with `rank` for every registered sort key.
pub fn entry(id: &str, rank: f64) -> Entry {
    Entry {
        entry_id: id.to_string(),
        film_id: format!("film-{id}"),
        name: format!("Film {id}"),
        release_year: 2000,
        adult: false,
        poster_customisable: false,
        poster_url: format!("https://posters/{id}.jpg"),
        adult_poster_url: String::new(),
        image_info: ImageInfo::default(),
        sorts: SORT_MODES.iter().map(|m| (m.key.to_string(), rank)).collect(),
    }
}

pub fn list_of(id: &str, entries: Vec<Entry>) -> List {
    List {
        summary: ListSummary {
            id: id.to_string(),
            name: format!("List {id}"),
            version: 1,
            film_count: entries.len() as u32,
            description: String::new(),
        },
        entries,
    }
}

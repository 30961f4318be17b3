//! Plain-text rendering of the menu, the sort modes and the preview.

use std::fmt::Write;

use colorboxd_core::error::CoreError;
use colorboxd_core::sorting::list_sort_modes;
use colorboxd_core::types::ListSummary;
use colorboxd_session::session::ReorderSession;

/// Numbered list summaries, the chosen one marked with `>`.
pub fn render_lists(summaries: &[ListSummary], chosen: Option<usize>) -> String {
    if summaries.is_empty() {
        return "You have no lists.".to_string();
    }
    let mut out = String::new();
    for (i, summary) in summaries.iter().enumerate() {
        let marker = if chosen == Some(i) { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {:>3}. {} ({} films)", i + 1, summary.name, summary.film_count);
    }
    out.trim_end().to_string()
}

/// Registered sort modes, the active one marked with `*`.
pub fn render_modes(active: Option<&str>) -> String {
    let mut out = String::new();
    for mode in list_sort_modes() {
        let marker = if active == Some(mode.key) { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {:<16} {}", mode.key, mode.label);
    }
    out.trim_end().to_string()
}

/// The loaded list in display order with a one-line mode header.
pub fn render_preview(session: &ReorderSession) -> Result<String, CoreError> {
    let entries = session.preview()?;
    let mode = session.sort_mode();
    let name = session.list().map(|l| l.summary.name.as_str()).unwrap_or_default();

    let order = if mode.visible {
        mode.sort_key.label
    } else {
        "Original order"
    };
    let mut out = format!("{name} | {order}");
    if mode.visible && mode.reverse {
        out.push_str(" | reversed");
    }

    for (slot, entry) in entries.iter().enumerate() {
        let _ = write!(out, "\n{:>4}. [{}] {}", slot + 1, entry.entry_id, entry.name);
        if entry.release_year > 0 {
            let _ = write!(out, " ({})", entry.release_year);
        }
        let poster = entry.display_poster();
        if !poster.is_empty() {
            let _ = write!(out, " {poster}");
        }
    }
    Ok(out)
}

//! Reorder session state machine.
//!
//! A [`ReorderSession`] holds one loaded list, the active [`SortMode`] and
//! the chosen rotation start. States move `Idle -> Loaded -> Submitting`
//! and back to `Idle` on a successful write or `Loaded` on failure.
//!
//! Every operation that is not valid in the current state fails with
//! [`CoreError::InvalidTransition`] and leaves the session untouched.

use std::time::{Duration, Instant};

use colorboxd_core::backend::{check_write_response, ListBackend, WriteRequest};
use colorboxd_core::error::CoreError;
use colorboxd_core::ordering::{sort_by_original, sort_by_rank, validate_list};
use colorboxd_core::rotation::{display_index, display_order, target_position};
use colorboxd_core::sorting::{default_sort_mode, lookup, SortModeInfo};
use colorboxd_core::types::{Entry, List};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loaded,
    Submitting,
}

impl SessionState {
    fn describe(self) -> &'static str {
        match self {
            SessionState::Idle => "no list is loaded",
            SessionState::Loaded => "a list is loaded",
            SessionState::Submitting => "a save is in progress",
        }
    }
}

/// Which order is active and how it is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortMode {
    pub sort_key: &'static SortModeInfo,
    /// `false` shows the list's original order instead of the sorted one.
    pub visible: bool,
    /// Walk the rotation backwards. Ignored while `visible` is `false`.
    pub reverse: bool,
}

impl Default for SortMode {
    fn default() -> Self {
        Self {
            sort_key: default_sort_mode(),
            visible: true,
            reverse: false,
        }
    }
}

/// Issued by [`ReorderSession::begin_submit`]; must be handed back to
/// [`ReorderSession::complete_submit`] with the write result.
#[derive(Debug)]
pub struct SubmitTicket {
    generation: u64,
    list_id: String,
}

impl SubmitTicket {
    pub fn list_id(&self) -> &str {
        &self.list_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend confirmed the write; the session is idle again.
    Saved { list_id: String },
    /// The response belonged to a session that has since moved on.
    Stale,
}

pub struct ReorderSession {
    state: SessionState,
    list: Option<List>,
    mode: SortMode,
    start_offset: usize,
    /// Bumped on every load and every return to idle.
    generation: u64,
    error: Option<String>,
    last_activity: Instant,
    idle_ttl: Duration,
}

impl ReorderSession {
    /// Idle session; a loaded list is dropped after `idle_ttl` without activity.
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            state: SessionState::Idle,
            list: None,
            mode: SortMode::default(),
            start_offset: 0,
            generation: 0,
            error: None,
            last_activity: Instant::now(),
            idle_ttl,
        }
    }

    // ---- accessors ----

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The loaded list in its current physical order.
    pub fn list(&self) -> Option<&List> {
        self.list.as_ref()
    }

    /// Active sort key and view flags.
    pub fn sort_mode(&self) -> SortMode {
        self.mode
    }

    /// Physical index shown in slot 0.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// Bumped on every load and every return to idle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Message from the last failed submit, cleared by the next transition.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ---- transitions ----

    /// Load `list`, sorted by the registry's first mode, with the rotation
    /// reset. Allowed from `Idle` and `Loaded`.
    pub fn load_list(&mut self, list: List) -> Result<(), CoreError> {
        if self.state == SessionState::Submitting {
            return Err(self.invalid("load a list"));
        }
        validate_list(&list)?;

        tracing::info!(
            list_id = %list.summary.id,
            entries = list.entries.len(),
            sort_key = default_sort_mode().key,
            "List loaded",
        );

        self.list = Some(list);
        self.mode = SortMode::default();
        self.start_offset = 0;
        self.state = SessionState::Loaded;
        self.generation += 1;
        self.error = None;
        self.apply_order();
        self.touch();
        Ok(())
    }

    /// Make the entry with `entry_id` the first one shown.
    pub fn choose_start(&mut self, entry_id: &str) -> Result<(), CoreError> {
        self.require_loaded("choose a start entry")?;
        let position = self
            .entries()
            .iter()
            .position(|e| e.entry_id == entry_id)
            .ok_or_else(|| CoreError::UnknownEntry(entry_id.to_string()))?;
        self.start_offset = position;
        self.touch();
        Ok(())
    }

    /// Make the entry at physical index `index` of the current order the
    /// first one shown.
    pub fn choose_start_index(&mut self, index: usize) -> Result<(), CoreError> {
        self.require_loaded("choose a start entry")?;
        let len = self.entries().len();
        if len == 0 {
            return Err(CoreError::ListEmpty);
        }
        if index >= len {
            return Err(CoreError::OutOfRange { index, len });
        }
        self.start_offset = index;
        self.touch();
        Ok(())
    }

    /// Make whatever is currently shown at display slot `slot` the start.
    pub fn choose_start_slot(&mut self, slot: usize) -> Result<(), CoreError> {
        self.require_loaded("choose a start entry")?;
        let index = display_index(slot, self.start_offset, self.entries().len(), self.effective_reverse())?;
        self.choose_start_index(index)
    }

    /// Switch to another registered sort mode. Resets the rotation.
    pub fn change_sort_mode(&mut self, key: &str) -> Result<(), CoreError> {
        self.require_loaded("change the sort mode")?;
        let sort_key = lookup(key)?;

        self.mode = SortMode {
            sort_key,
            visible: true,
            reverse: false,
        };
        self.start_offset = 0;
        self.apply_order();
        self.touch();
        tracing::debug!(sort_key = key, "Sort mode changed");
        Ok(())
    }

    /// Flip between the sorted and the original order. Resets the rotation
    /// and the reverse flag.
    pub fn toggle_original(&mut self) -> Result<(), CoreError> {
        self.require_loaded("toggle the original order")?;
        self.mode.visible = !self.mode.visible;
        self.mode.reverse = false;
        self.start_offset = 0;
        self.apply_order();
        self.touch();
        tracing::debug!(visible = self.mode.visible, "Original order toggled");
        Ok(())
    }

    /// Flip the traversal direction. The stored flag flips even while the
    /// original order is shown; it takes effect once sorting is visible.
    pub fn toggle_reverse(&mut self) -> Result<(), CoreError> {
        self.require_loaded("reverse the order")?;
        self.mode.reverse = !self.mode.reverse;
        self.touch();
        Ok(())
    }

    /// Move to `Submitting` and build the write request.
    ///
    /// The request always carries the active sort key and reverse flag,
    /// even while the original order is shown.
    pub fn begin_submit(&mut self) -> Result<(SubmitTicket, WriteRequest), CoreError> {
        self.require_loaded("save the list")?;
        let list = match &self.list {
            Some(list) => list.clone(),
            None => return Err(self.invalid("save the list")),
        };

        let ticket = SubmitTicket {
            generation: self.generation,
            list_id: list.summary.id.clone(),
        };
        let request = WriteRequest {
            list,
            start_offset: self.start_offset,
            sort_key: self.mode.sort_key.key.to_string(),
            reverse: self.mode.reverse,
        };

        self.state = SessionState::Submitting;
        self.error = None;
        tracing::info!(
            list_id = %ticket.list_id,
            sort_key = %request.sort_key,
            start_offset = request.start_offset,
            reverse = request.reverse,
            "Submitting list order",
        );
        Ok((ticket, request))
    }

    /// Apply the result of a write started with [`begin_submit`](Self::begin_submit).
    ///
    /// On success the session returns to `Idle`. On failure it returns to
    /// `Loaded` with the error message set and the list untouched.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Vec<String>, CoreError>,
    ) -> Result<SubmitOutcome, CoreError> {
        if self.state != SessionState::Submitting || ticket.generation != self.generation {
            tracing::warn!(list_id = %ticket.list_id, "Discarding stale submit response");
            return Ok(SubmitOutcome::Stale);
        }

        match result.and_then(|lines| check_write_response(&lines)) {
            Ok(()) => {
                tracing::info!(list_id = %ticket.list_id, "List saved");
                self.reset_to_idle();
                Ok(SubmitOutcome::Saved {
                    list_id: ticket.list_id,
                })
            }
            Err(err) => {
                match &err {
                    CoreError::WriteRejected(lines) => {
                        for line in lines {
                            tracing::error!(list_id = %ticket.list_id, line = %line, "List write rejected");
                        }
                    }
                    other => {
                        tracing::error!(list_id = %ticket.list_id, error = %other, "List write failed");
                    }
                }
                self.state = SessionState::Loaded;
                self.error = Some(err.user_message());
                self.touch();
                Err(err)
            }
        }
    }

    /// Submit through `backend` in one step.
    pub async fn submit(&mut self, backend: &dyn ListBackend, token: &str) -> Result<SubmitOutcome, CoreError> {
        let (ticket, request) = self.begin_submit()?;
        let result = backend.write_sorted_list(token, &request).await;
        self.complete_submit(ticket, result)
    }

    /// Discard the loaded list.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.require_loaded("cancel")?;
        if let Some(list) = &self.list {
            tracing::info!(list_id = %list.summary.id, "Reorder cancelled");
        }
        self.reset_to_idle();
        Ok(())
    }

    /// Drop a loaded list that has seen no activity for the idle TTL.
    /// Returns whether the session expired.
    pub fn expire_if_idle(&mut self) -> bool {
        if self.state == SessionState::Loaded && self.last_activity.elapsed() >= self.idle_ttl {
            tracing::info!(idle_secs = self.last_activity.elapsed().as_secs(), "Loaded list expired");
            self.reset_to_idle();
            return true;
        }
        false
    }

    // ---- preview ----

    /// Entries in display order: rotated to start at the chosen entry and,
    /// when sorting is visible, optionally reversed.
    pub fn preview(&self) -> Result<Vec<&Entry>, CoreError> {
        let list = self.list.as_ref().ok_or_else(|| self.invalid("preview"))?;
        let order = display_order(self.start_offset, list.entries.len(), self.effective_reverse())?;
        Ok(order.into_iter().map(|i| &list.entries[i]).collect())
    }

    /// Display slot the entry with `entry_id` lands in once saved.
    pub fn slot_of(&self, entry_id: &str) -> Result<usize, CoreError> {
        let list = self.list.as_ref().ok_or_else(|| self.invalid("locate an entry"))?;
        let physical = list
            .position_of(entry_id)
            .ok_or_else(|| CoreError::UnknownEntry(entry_id.to_string()))?;
        target_position(physical, self.start_offset, list.entries.len(), self.effective_reverse())
    }

    // ---- private helpers ----

    fn entries(&self) -> &[Entry] {
        self.list.as_ref().map(|l| l.entries.as_slice()).unwrap_or(&[])
    }

    fn effective_reverse(&self) -> bool {
        self.mode.visible && self.mode.reverse
    }

    /// Re-sort the entries for the current mode. Always restores the
    /// original order first so ties resolve the same way every time.
    fn apply_order(&mut self) {
        let key = self.mode.sort_key.key;
        let visible = self.mode.visible;
        if let Some(list) = self.list.as_mut() {
            sort_by_original(&mut list.entries);
            if visible {
                sort_by_rank(&mut list.entries, key);
            }
        }
    }

    fn require_loaded(&mut self, operation: &'static str) -> Result<(), CoreError> {
        self.expire_if_idle();
        if self.state != SessionState::Loaded {
            return Err(self.invalid(operation));
        }
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            operation,
            state: self.state.describe(),
        }
    }

    fn reset_to_idle(&mut self) {
        self.state = SessionState::Idle;
        self.list = None;
        self.mode = SortMode::default();
        self.start_offset = 0;
        self.generation += 1;
        self.error = None;
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use colorboxd_core::sorting::SORT_MODES;
    use colorboxd_core::types::{ImageInfo, ListSummary};

    use super::*;

    /// Entry with the given `Hue` and `Lum` ranks; every other key ranks 0.
    fn entry(id: &str, hue: f64, lum: f64) -> Entry {
        let sorts = SORT_MODES
            .iter()
            .map(|m| {
                let rank = match m.key {
                    "Hue" => hue,
                    "Lum" => lum,
                    _ => 0.0,
                };
                (m.key.to_string(), rank)
            })
            .collect();
        Entry {
            entry_id: id.into(),
            film_id: format!("f{id}"),
            name: format!("Film {id}"),
            release_year: 1990,
            adult: false,
            poster_customisable: false,
            poster_url: String::new(),
            adult_poster_url: String::new(),
            image_info: ImageInfo::default(),
            sorts,
        }
    }

    /// Five entries as the backend sends them (already hue-sorted).
    fn sample_list() -> List {
        let entries = vec![
            entry("3", 0.0, 40.0),
            entry("1", 1.0, 10.0),
            entry("5", 2.0, 30.0),
            entry("2", 3.0, 50.0),
            entry("4", 4.0, 20.0),
        ];
        List {
            summary: ListSummary {
                id: "list-1".into(),
                name: "Colours".into(),
                version: 7,
                film_count: entries.len() as u32,
                description: String::new(),
            },
            entries,
        }
    }

    fn loaded() -> ReorderSession {
        let mut session = ReorderSession::new(Duration::from_secs(3600));
        session.load_list(sample_list()).unwrap();
        session
    }

    fn order(session: &ReorderSession) -> Vec<String> {
        session.list().unwrap().entries.iter().map(|e| e.entry_id.clone()).collect()
    }

    fn preview_ids(session: &ReorderSession) -> Vec<String> {
        session.preview().unwrap().iter().map(|e| e.entry_id.clone()).collect()
    }

    #[test]
    fn load_resets_to_default_mode() {
        let session = loaded();
        assert_eq!(session.state(), SessionState::Loaded);
        assert_eq!(session.sort_mode(), SortMode::default());
        assert_eq!(session.start_offset(), 0);
        assert_eq!(order(&session), vec!["3", "1", "5", "2", "4"]);
    }

    #[test]
    fn load_rejects_invalid_list() {
        let mut list = sample_list();
        list.summary.film_count = 9;
        let mut session = ReorderSession::new(Duration::from_secs(60));
        assert_matches!(session.load_list(list), Err(CoreError::DataMismatch(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn idle_session_rejects_transitions() {
        let mut session = ReorderSession::new(Duration::from_secs(60));
        assert_matches!(session.toggle_reverse(), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.change_sort_mode("Lum"), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.cancel(), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.begin_submit(), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.preview(), Err(CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn choose_start_uses_current_physical_index() {
        let mut session = loaded();
        session.choose_start("5").unwrap();
        assert_eq!(session.start_offset(), 2);
        assert_eq!(preview_ids(&session), vec!["5", "2", "4", "3", "1"]);
        assert_eq!(order(&session), vec!["3", "1", "5", "2", "4"]);
    }

    #[test]
    fn choose_start_unknown_entry() {
        let mut session = loaded();
        assert_matches!(session.choose_start("99"), Err(CoreError::UnknownEntry(id)) if id == "99");
        assert_eq!(session.start_offset(), 0);
    }

    #[test]
    fn choose_start_index_bounds() {
        let mut session = loaded();
        assert_matches!(session.choose_start_index(5), Err(CoreError::OutOfRange { index: 5, len: 5 }));
        session.choose_start_index(4).unwrap();
        assert_eq!(session.start_offset(), 4);
    }

    #[test]
    fn choose_start_slot_follows_reverse() {
        let mut session = loaded();
        session.choose_start_index(2).unwrap();
        session.toggle_reverse().unwrap();
        // Reversed display from index 2 is [2, 1, 0, 4, 3].
        session.choose_start_slot(3).unwrap();
        assert_eq!(session.start_offset(), 4);
    }

    #[test]
    fn reverse_preview_matches_rotation() {
        let mut session = loaded();
        session.choose_start_index(2).unwrap();
        assert_eq!(preview_ids(&session), vec!["5", "2", "4", "3", "1"]);
        session.toggle_reverse().unwrap();
        assert_eq!(session.start_offset(), 2);
        assert_eq!(preview_ids(&session), vec!["5", "1", "3", "4", "2"]);
    }

    #[test]
    fn slot_of_agrees_with_preview() {
        let mut session = loaded();
        session.choose_start_index(2).unwrap();
        session.toggle_reverse().unwrap();
        let shown = preview_ids(&session);
        for (slot, id) in shown.iter().enumerate() {
            assert_eq!(session.slot_of(id).unwrap(), slot);
        }
        assert_matches!(session.slot_of("99"), Err(CoreError::UnknownEntry(_)));
    }

    #[test]
    fn change_sort_mode_resorts_and_resets() {
        let mut session = loaded();
        session.choose_start_index(3).unwrap();
        session.toggle_reverse().unwrap();

        session.change_sort_mode("Lum").unwrap();
        assert_eq!(session.start_offset(), 0);
        assert_eq!(session.sort_mode().sort_key.key, "Lum");
        assert!(session.sort_mode().visible);
        assert!(!session.sort_mode().reverse);

        let ranks: Vec<f64> = session
            .list()
            .unwrap()
            .entries
            .iter()
            .map(|e| e.rank("Lum").unwrap())
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(order(&session), vec!["1", "4", "5", "3", "2"]);
    }

    #[test]
    fn change_sort_mode_rejects_unknown_key_without_state_change() {
        let mut session = loaded();
        session.choose_start_index(1).unwrap();
        let before = order(&session);

        assert_matches!(session.change_sort_mode("Vibes"), Err(CoreError::InvalidSortKey(_)));
        assert_eq!(session.start_offset(), 1);
        assert_eq!(session.sort_mode().sort_key.key, "Hue");
        assert_eq!(order(&session), before);
    }

    #[test]
    fn toggle_original_round_trip_restores_load_order() {
        let mut session = loaded();
        let after_load = order(&session);

        session.choose_start_index(3).unwrap();
        session.toggle_original().unwrap();
        assert!(!session.sort_mode().visible);
        assert_eq!(session.start_offset(), 0);
        assert_eq!(order(&session), vec!["1", "2", "3", "4", "5"]);

        session.toggle_original().unwrap();
        assert!(session.sort_mode().visible);
        assert_eq!(order(&session), after_load);
    }

    #[test]
    fn toggle_original_resets_reverse() {
        let mut session = loaded();
        session.toggle_reverse().unwrap();
        session.toggle_original().unwrap();
        assert!(!session.sort_mode().reverse);
    }

    #[test]
    fn reverse_is_stored_but_ignored_in_original_view() {
        let mut session = loaded();
        session.toggle_original().unwrap();
        let plain = preview_ids(&session);

        session.toggle_reverse().unwrap();
        assert!(session.sort_mode().reverse);
        assert_eq!(preview_ids(&session), plain);
    }

    #[test]
    fn begin_submit_moves_to_submitting_and_blocks_double_submit() {
        let mut session = loaded();
        session.choose_start("2").unwrap();
        let (ticket, request) = session.begin_submit().unwrap();

        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(ticket.list_id(), "list-1");
        assert_eq!(request.sort_key, "Hue");
        assert_eq!(request.start_offset, 3);
        assert!(!request.reverse);

        assert_matches!(session.begin_submit(), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.toggle_reverse(), Err(CoreError::InvalidTransition { .. }));
        assert_matches!(session.load_list(sample_list()), Err(CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn submit_from_original_view_sends_active_key() {
        let mut session = loaded();
        session.change_sort_mode("Lum").unwrap();
        session.toggle_original().unwrap();
        session.toggle_reverse().unwrap();
        assert!(!session.sort_mode().visible);

        let (ticket, request) = session.begin_submit().unwrap();
        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(ticket.list_id(), "list-1");
        assert_eq!(request.sort_key, "Lum");
        assert_eq!(request.start_offset, 0);
        assert!(request.reverse);
    }

    #[test]
    fn successful_write_returns_to_idle() {
        let mut session = loaded();
        let (ticket, _) = session.begin_submit().unwrap();
        let outcome = session
            .complete_submit(ticket, Ok(vec!["List updated successfully: 5 updated".into()]))
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved { list_id: "list-1".into() });
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.list().is_none());
    }

    #[test]
    fn rejected_write_returns_to_loaded_with_error() {
        let mut session = loaded();
        session.choose_start_index(2).unwrap();
        session.toggle_reverse().unwrap();
        let (ticket, _) = session.begin_submit().unwrap();

        let result = session.complete_submit(ticket, Ok(vec!["Partial failure: 2 of 5 not found".into()]));
        assert_matches!(result, Err(CoreError::WriteRejected(_)));
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(session.error().is_some());
        assert!(session.list().is_some());
        assert_eq!(session.start_offset(), 2);
        assert!(session.sort_mode().reverse);
    }

    #[test]
    fn transport_failure_returns_to_loaded() {
        let mut session = loaded();
        let (ticket, _) = session.begin_submit().unwrap();
        let result = session.complete_submit(ticket, Err(CoreError::Fetch("timeout".into())));
        assert_matches!(result, Err(CoreError::Fetch(_)));
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn stale_submit_response_is_discarded() {
        let mut session = loaded();
        let (ticket, _) = session.begin_submit().unwrap();
        session
            .complete_submit(ticket, Err(CoreError::Fetch("first try".into())))
            .unwrap_err();

        // A new load starts a new generation; a late ticket from the old
        // one must not touch it.
        session.load_list(sample_list()).unwrap();
        let late = SubmitTicket {
            generation: session.generation() - 1,
            list_id: "list-1".into(),
        };
        let (_current, _) = session.begin_submit().unwrap();
        let outcome = session
            .complete_submit(late, Ok(vec!["List updated successfully".into()]))
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Stale);
        assert_eq!(session.state(), SessionState::Submitting);
    }

    #[test]
    fn cancel_clears_the_list() {
        let mut session = loaded();
        session.cancel().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.list().is_none());
    }

    #[test]
    fn idle_ttl_expires_loaded_list() {
        let mut session = ReorderSession::new(Duration::ZERO);
        session.load_list(sample_list()).unwrap();
        assert_matches!(session.toggle_reverse(), Err(CoreError::InvalidTransition { .. }));
        assert_eq!(session.state(), SessionState::Idle);
    }
}

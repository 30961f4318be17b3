//! List selection menu: fetched summaries, the chosen list, the in-flight
//! flag for sort requests and the transient "list too short" hint.

use std::time::{Duration, Instant};

use colorboxd_core::error::CoreError;
use colorboxd_core::list_length::check_list_length;
use colorboxd_core::types::ListSummary;

struct Hint {
    message: String,
    shown_at: Instant,
}

/// Issued by [`ListMenu::begin_sort`] for one sort request.
#[derive(Debug, Clone)]
pub struct SortTicket {
    generation: u64,
    pub summary: ListSummary,
}

pub struct ListMenu {
    summaries: Vec<ListSummary>,
    chosen: Option<usize>,
    loading: bool,
    hint: Option<Hint>,
    hint_duration: Duration,
    min_list_length: u32,
    /// Bumped whenever the summaries are replaced.
    generation: u64,
}

impl ListMenu {
    /// Empty menu with the given guard threshold and hint lifetime.
    pub fn new(min_list_length: u32, hint_duration: Duration) -> Self {
        Self {
            summaries: Vec::new(),
            chosen: None,
            loading: false,
            hint: None,
            hint_duration,
            min_list_length,
            generation: 0,
        }
    }

    /// Summaries from the last fetch, in backend order.
    pub fn summaries(&self) -> &[ListSummary] {
        &self.summaries
    }

    /// Index of the chosen list, `None` when there are no lists.
    pub fn chosen_index(&self) -> Option<usize> {
        self.chosen
    }

    /// Summary of the chosen list.
    pub fn chosen_summary(&self) -> Option<&ListSummary> {
        self.chosen.and_then(|i| self.summaries.get(i))
    }

    /// Whether a sort request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fewest films a list needs before it can be sorted.
    pub fn min_list_length(&self) -> u32 {
        self.min_list_length
    }

    /// The current hint, until it fades after the hint duration.
    pub fn hint(&self) -> Option<&str> {
        self.hint
            .as_ref()
            .filter(|h| h.shown_at.elapsed() < self.hint_duration)
            .map(|h| h.message.as_str())
    }

    /// Replace the summaries wholesale and select the first one.
    ///
    /// Any sort request still in flight belongs to the old summaries and
    /// will be reported stale by [`finish_sort`](Self::finish_sort).
    pub fn set_summaries(&mut self, summaries: Vec<ListSummary>) {
        self.chosen = if summaries.is_empty() { None } else { Some(0) };
        self.summaries = summaries;
        self.invalidate();
    }

    /// Forget any in-flight sort request.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Choose the list at `index`. Out-of-range indices keep the selection.
    pub fn select(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.summaries.len();
        if index >= len {
            return Err(CoreError::OutOfRange { index, len });
        }
        self.chosen = Some(index);
        Ok(())
    }

    /// Start a sort request for the chosen list.
    ///
    /// Lists shorter than the minimum length are rejected here with a hint
    /// and never reach the network.
    pub fn begin_sort(&mut self) -> Result<SortTicket, CoreError> {
        if self.loading {
            return Err(CoreError::Busy("a list is already being sorted".to_string()));
        }
        let summary = self
            .chosen_summary()
            .cloned()
            .ok_or(CoreError::InvalidTransition {
                operation: "sort",
                state: "no list is selected",
            })?;

        if let Err(err) = check_list_length(&summary, self.min_list_length) {
            if let CoreError::MinimumLength { message, .. } = &err {
                self.hint = Some(Hint {
                    message: message.clone(),
                    shown_at: Instant::now(),
                });
            }
            tracing::debug!(list_id = %summary.id, film_count = summary.film_count, "List too short to sort");
            return Err(err);
        }

        self.loading = true;
        self.hint = None;
        Ok(SortTicket {
            generation: self.generation,
            summary,
        })
    }

    /// Finish a sort request. Returns `false` when the ticket is stale and
    /// its response must be discarded.
    pub fn finish_sort(&mut self, ticket: &SortTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }
}

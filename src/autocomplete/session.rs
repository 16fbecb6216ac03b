//! Search session state machine
//!
//! Pure, synchronous bookkeeping for one autocomplete field. The controller
//! owns the timer and the network; this type decides what is visible.
//!
//! Every issued search carries a sequence number. A response is rendered
//! only if its number is at least `last_rendered`, so a slow early request
//! can never overwrite the results of a faster later one.

use crate::directory::AddressSuggestion;
use serde::Serialize;
use tracing::debug;

/// Phase of the autocomplete field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Debouncing,
    Searching,
    Rendered,
}

/// What the controller must do after a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input too short: results cleared, no timer, no request
    Cleared,
    /// (Re)start the debounce timer
    Debounce,
}

/// A search to issue, tagged with its sequence number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub sequence: u64,
    pub query: String,
}

/// Snapshot of what the autocomplete field shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutocompleteView {
    pub phase: Phase,
    pub input: String,
    pub suggestions: Vec<AddressSuggestion>,
    pub panel_visible: bool,
}

/// Per-field search session
#[derive(Debug, Clone)]
pub struct SearchSession {
    min_query_len: usize,
    phase: Phase,
    input: String,
    pending_query: String,
    sequence_number: u64,
    last_rendered: u64,
    /// Responses numbered up to here answer an abandoned query
    invalidated_through: u64,
    suggestions: Vec<AddressSuggestion>,
    panel_visible: bool,
}

impl SearchSession {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            min_query_len,
            phase: Phase::Idle,
            input: String::new(),
            pending_query: String::new(),
            sequence_number: 0,
            last_rendered: 0,
            invalidated_through: 0,
            suggestions: Vec::new(),
            panel_visible: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of the most recently issued search
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Number of the most recently rendered search
    pub fn last_rendered(&self) -> u64 {
        self.last_rendered
    }

    pub fn suggestions(&self) -> &[AddressSuggestion] {
        &self.suggestions
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Nothing typed is waiting for a search and every issued search has
    /// rendered or been invalidated
    pub fn is_settled(&self) -> bool {
        self.phase != Phase::Debouncing
            && (self.sequence_number == self.last_rendered
                || self.sequence_number <= self.invalidated_through)
    }

    pub fn view(&self) -> AutocompleteView {
        AutocompleteView {
            phase: self.phase,
            input: self.input.clone(),
            suggestions: self.suggestions.clone(),
            panel_visible: self.panel_visible,
        }
    }

    /// Handle a keystroke
    pub fn input(&mut self, text: &str) -> InputOutcome {
        self.input = text.to_string();
        let query = text.trim();

        if query.chars().count() < self.min_query_len {
            self.pending_query.clear();
            self.clear_results();
            self.invalidate_in_flight();
            self.phase = Phase::Idle;
            return InputOutcome::Cleared;
        }

        self.pending_query = query.to_string();
        self.phase = Phase::Debouncing;
        InputOutcome::Debounce
    }

    /// The debounce timer fired: issue the pending query
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        if self.pending_query.is_empty() {
            return None;
        }

        self.sequence_number += 1;
        self.phase = Phase::Searching;
        Some(SearchTicket {
            sequence: self.sequence_number,
            query: std::mem::take(&mut self.pending_query),
        })
    }

    /// A search response arrived; returns whether it was rendered
    pub fn receive(&mut self, sequence: u64, results: Vec<AddressSuggestion>) -> bool {
        if sequence < self.last_rendered || sequence <= self.invalidated_through {
            debug!(sequence, last_rendered = self.last_rendered, "discarding stale results");
            return false;
        }

        self.last_rendered = sequence;
        self.panel_visible = !results.is_empty();
        self.suggestions = results;
        // Keep debouncing if the user is still typing
        if self.phase != Phase::Debouncing {
            self.phase = Phase::Rendered;
        }
        true
    }

    /// The user picked a suggestion
    ///
    /// The input takes the suggestion's description, the panel closes and
    /// responses still in flight are suppressed.
    pub fn select(&mut self, index: usize) -> Option<AddressSuggestion> {
        let chosen = self.suggestions.get(index).cloned()?;
        self.input = chosen.description.clone();
        self.pending_query.clear();
        self.clear_results();
        self.invalidate_in_flight();
        self.phase = Phase::Idle;
        Some(chosen)
    }

    /// Interaction outside the field and the panel
    pub fn dismiss(&mut self) {
        self.panel_visible = false;
    }

    fn invalidate_in_flight(&mut self) {
        self.invalidated_through = self.sequence_number;
    }

    fn clear_results(&mut self) {
        self.suggestions.clear();
        self.panel_visible = false;
    }
}

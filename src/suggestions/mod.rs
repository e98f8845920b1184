//! Suggestion fetcher: query → token-tagged request → candidate dropdown.
//!
//! Every non-empty input issues a new request token. Only the response
//! carrying the most recently issued token is applied; anything older is
//! dropped, whatever order responses arrive in. Clearing the input or
//! closing the dropdown supersedes the in-flight request as well.

pub mod dropdown;

use std::collections::HashMap;

pub use dropdown::{DropdownState, Highlight};

use crate::api::ApiError;
use crate::models::MedicationCandidate;
use crate::views::Feedback;

pub const LOADING_TEXT: &str = "Loading...";
pub const NO_RESULTS_TEXT: &str = "No medications found for your query.";

// ─── Public types ────────────────────────────────────────────────────────────

/// A suggestion lookup the caller must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub token: u64,
    pub query: String,
}

// ─── Fetcher ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SuggestionFetcher {
    last_issued: u64,
    awaiting: Option<u64>,
    state: DropdownState,
    candidates: Vec<MedicationCandidate>,
    highlight: Highlight,
    /// Lower-cased display name → candidate, from the last applied response.
    /// Lets a fully typed name be committed with Enter.
    last_seen: HashMap<String, MedicationCandidate>,
    feedback: Option<Feedback>,
}

impl SuggestionFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to the input text changing. Returns the request to perform,
    /// or `None` when the (trimmed) query is empty.
    pub fn begin(&mut self, query: &str) -> Option<SuggestionRequest> {
        let query = query.trim();
        if query.is_empty() {
            self.close();
            return None;
        }

        self.last_issued += 1;
        let token = self.last_issued;
        self.awaiting = Some(token);
        self.state = DropdownState::Loading;
        self.candidates.clear();
        self.highlight.reset();
        self.feedback = Some(Feedback::loading(LOADING_TEXT));

        Some(SuggestionRequest {
            token,
            query: query.to_string(),
        })
    }

    /// Apply a response. Returns `false` (and changes nothing) if `token`
    /// has been superseded.
    pub fn complete(
        &mut self,
        token: u64,
        result: Result<Vec<MedicationCandidate>, ApiError>,
    ) -> bool {
        if self.awaiting != Some(token) {
            tracing::debug!(token, latest = self.last_issued, "Discarding stale suggestions");
            return false;
        }
        self.awaiting = None;
        self.highlight.reset();

        match result {
            Ok(candidates) if candidates.is_empty() => {
                self.state = DropdownState::Empty;
                self.candidates.clear();
                self.feedback = Some(Feedback::empty(NO_RESULTS_TEXT));
            }
            Ok(candidates) => {
                self.last_seen = candidates
                    .iter()
                    .map(|c| (c.display_name.to_lowercase(), c.clone()))
                    .collect();
                self.state = DropdownState::Open;
                self.candidates = candidates;
                self.feedback = None;
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "Autocomplete failed");
                self.state = DropdownState::Error;
                self.candidates.clear();
                self.feedback = Some(Feedback::error(&e.user_message()));
            }
        }
        true
    }

    /// Close the dropdown (Escape, click outside, selection, cleared input).
    /// An in-flight request is superseded so it cannot reopen the list.
    pub fn close(&mut self) {
        self.awaiting = None;
        self.state = DropdownState::Closed;
        self.candidates.clear();
        self.highlight.reset();
        self.feedback = None;
    }

    pub fn move_down(&mut self) -> Option<usize> {
        if self.state != DropdownState::Open {
            return None;
        }
        self.highlight.next(self.candidates.len())
    }

    pub fn move_up(&mut self) -> Option<usize> {
        if self.state != DropdownState::Open {
            return None;
        }
        self.highlight.previous(self.candidates.len())
    }

    pub fn highlighted(&self) -> Option<&MedicationCandidate> {
        self.highlight.index().and_then(|i| self.candidates.get(i))
    }

    pub fn candidate(&self, index: usize) -> Option<&MedicationCandidate> {
        self.candidates.get(index)
    }

    /// Resolve text typed in full against the last applied response.
    pub fn resolve_typed(&self, text: &str) -> Option<&MedicationCandidate> {
        self.last_seen.get(&text.trim().to_lowercase())
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn candidates(&self) -> &[MedicationCandidate] {
        &self.candidates
    }

    pub fn highlight_index(&self) -> Option<usize> {
        self.highlight.index()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Token of the request whose response would still be applied.
    pub fn awaiting(&self) -> Option<u64> {
        self.awaiting
    }
}

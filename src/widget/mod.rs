//! The medication selection widget.
//!
//! One `MedicationWidget` owns everything for its page region: the input
//! text, the suggestion fetcher, the selection set and the views
//! subscribed to it, the interaction checker and the search results.
//! Nothing is shared between instances except the page live region.
//!
//! Operations are synchronous. Anything that needs the network returns an
//! `Effect`; the result comes back through `apply_suggestions`,
//! `apply_search` or `apply_interactions`.

mod effect;
mod error;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use uuid::Uuid;

pub use effect::{Effect, FormSubmission, Key, SearchRequest};
pub use error::WidgetError;

use crate::accessibility::LiveRegion;
use crate::api::ApiError;
use crate::config::WidgetConfig;
use crate::interactions::{InteractionChecker, InteractionReport};
use crate::models::{InteractionResult, MedicationCandidate, MedicationId, SearchResult};
use crate::render;
use crate::selection::SelectionSet;
use crate::suggestions::{DropdownState, SuggestionFetcher};
use crate::views::{
    CheckButtonView, Feedback, HiddenFieldView, SearchResultsView, TagListView,
};

pub const SEARCH_FAILED_TEXT: &str = "Error performing search. Please try again.";

pub struct MedicationWidget {
    id: Uuid,
    config: WidgetConfig,
    input: String,
    fetcher: SuggestionFetcher,
    selection: SelectionSet,
    tags: Rc<RefCell<TagListView>>,
    hidden_field: Rc<RefCell<HiddenFieldView>>,
    check_button: Rc<RefCell<CheckButtonView>>,
    search_results: Rc<RefCell<SearchResultsView>>,
    checker: Rc<RefCell<InteractionChecker>>,
    search_issued: u64,
    search_awaiting: Option<u64>,
    feedback: Option<Feedback>,
    live_region: LiveRegion,
}

impl MedicationWidget {
    pub fn new(config: WidgetConfig, live_region: LiveRegion) -> Self {
        let tags = Rc::new(RefCell::new(TagListView::new(&config)));
        let hidden_field = Rc::new(RefCell::new(HiddenFieldView::new(&config.hidden_field_name)));
        let check_button = Rc::new(RefCell::new(CheckButtonView::default()));
        let search_results = Rc::new(RefCell::new(SearchResultsView::default()));
        let checker = Rc::new(RefCell::new(InteractionChecker::new()));

        let mut selection = SelectionSet::new();
        selection.subscribe(tags.clone());
        selection.subscribe(hidden_field.clone());
        selection.subscribe(check_button.clone());
        selection.subscribe(search_results.clone());
        selection.subscribe(checker.clone());

        let id = Uuid::new_v4();
        tracing::debug!(widget = %id, "Medication widget created");

        Self {
            id,
            config,
            input: String::new(),
            fetcher: SuggestionFetcher::new(),
            selection,
            tags,
            hidden_field,
            check_button,
            search_results,
            checker,
            search_issued: 0,
            search_awaiting: None,
            feedback: None,
            live_region,
        }
    }

    // ── Input & dropdown ────────────────────────────────────

    pub fn input_changed(&mut self, text: &str) -> Option<Effect> {
        self.input = text.to_string();
        self.feedback = None;
        let request = self.fetcher.begin(text)?;
        tracing::debug!(widget = %self.id, token = request.token, query = %request.query, "Suggestion request issued");
        Some(Effect::FetchSuggestions(request))
    }

    pub fn apply_suggestions(
        &mut self,
        token: u64,
        result: Result<Vec<MedicationCandidate>, ApiError>,
    ) {
        if !self.fetcher.complete(token, result) {
            return;
        }
        match self.fetcher.state() {
            DropdownState::Open => {
                let count = self.fetcher.candidates().len();
                self.live_region
                    .announce(format!("{count} {} available", plural(count, "suggestion")));
            }
            DropdownState::Empty | DropdownState::Error => {
                if let Some(feedback) = self.fetcher.feedback() {
                    self.live_region.announce(feedback.text());
                }
            }
            DropdownState::Closed | DropdownState::Loading => {}
        }
    }

    /// Keyboard handling for the search input. Ctrl/Meta+Enter submits the
    /// form and hands back the submission.
    pub fn key(&mut self, key: Key) -> Result<Option<FormSubmission>, WidgetError> {
        match key {
            Key::ArrowDown => {
                self.fetcher.move_down();
            }
            Key::ArrowUp => {
                self.fetcher.move_up();
            }
            Key::Escape => self.fetcher.close(),
            Key::Enter => self.commit_input()?,
            Key::ModifiedEnter => return self.submit().map(Some),
            Key::Tab | Key::Other => {}
        }
        Ok(None)
    }

    /// Enter: take the highlighted suggestion, else resolve the typed text
    /// against the last suggestions seen.
    fn commit_input(&mut self) -> Result<(), WidgetError> {
        if let Some(candidate) = self.fetcher.highlighted().cloned() {
            self.select_candidate(&candidate);
            return Ok(());
        }

        let typed = self.input.trim().to_string();
        if typed.is_empty() {
            return Ok(());
        }

        match self.fetcher.resolve_typed(&typed).cloned() {
            Some(candidate) => {
                self.select_candidate(&candidate);
                Ok(())
            }
            None => Err(self.block(WidgetError::UnknownMedication(typed))),
        }
    }

    pub fn click_suggestion(&mut self, index: usize) {
        if let Some(candidate) = self.fetcher.candidate(index).cloned() {
            self.select_candidate(&candidate);
        }
    }

    pub fn click_outside(&mut self) {
        self.fetcher.close();
    }

    pub fn select_candidate(&mut self, candidate: &MedicationCandidate) {
        let name = candidate.display_name.clone();
        if self.selection.add(candidate.to_selection()) {
            tracing::info!(widget = %self.id, medication = %candidate.id, "Medication selected");
            self.announce_count(&format!("{name} added."));
        } else {
            self.live_region.announce(format!("{name} is already selected."));
        }
        self.input.clear();
        self.fetcher.close();
        self.feedback = None;
    }

    // ── Selection ───────────────────────────────────────────

    pub fn remove(&mut self, id: &MedicationId) {
        if let Some(removed) = self.selection.remove(id) {
            tracing::info!(widget = %self.id, medication = %id, "Medication removed");
            self.announce_count(&format!("{} removed.", removed.display_name));
        }
    }

    // ── Search form ─────────────────────────────────────────

    pub fn submit_search(&mut self, query: &str) -> Option<Effect> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.search_issued += 1;
        self.search_awaiting = Some(self.search_issued);
        Some(Effect::Search(SearchRequest {
            token: self.search_issued,
            query: query.to_string(),
        }))
    }

    pub fn apply_search(&mut self, token: u64, result: Result<Vec<SearchResult>, ApiError>) {
        if self.search_awaiting != Some(token) {
            tracing::debug!(widget = %self.id, token, "Discarding stale search results");
            return;
        }
        self.search_awaiting = None;

        match result {
            Ok(results) => {
                let count = results.len();
                self.search_results.borrow_mut().set_results(results);
                self.live_region
                    .announce(format!("Found {count} {}", plural(count, "result")));
            }
            Err(e) => {
                tracing::warn!(widget = %self.id, error = %e, "Search failed");
                self.feedback = Some(Feedback::error(&e.user_message()));
                self.live_region.announce(SEARCH_FAILED_TEXT);
            }
        }
    }

    /// Select/Selected button on a search card.
    pub fn toggle_search_result(&mut self, id: &MedicationId) {
        if self.selection.contains(id) {
            self.remove(id);
            return;
        }
        let found = self.search_results.borrow().find(id).cloned();
        if let Some(result) = found {
            if self.selection.add(result.to_selection()) {
                self.announce_count(&format!("{} added.", result.name));
            }
        }
    }

    // ── Interactions ────────────────────────────────────────

    pub fn check_interactions(&mut self) -> Result<Effect, WidgetError> {
        let prepared = self.checker.borrow_mut().prepare(&self.selection);
        match prepared {
            Ok(request) => {
                self.feedback = None;
                tracing::info!(widget = %self.id, drugs = request.drugs.len(), "Interaction check issued");
                Ok(Effect::CheckInteractions(request))
            }
            Err(e) => Err(self.block(e)),
        }
    }

    pub fn apply_interactions(
        &mut self,
        token: u64,
        result: Result<Vec<InteractionResult>, ApiError>,
    ) {
        let announcement = self
            .checker
            .borrow_mut()
            .complete(token, result)
            .map(|report| report.outcome.announcement());
        if let Some(announcement) = announcement {
            self.live_region.announce(announcement);
        }
    }

    // ── Form ────────────────────────────────────────────────

    /// Build the form post. The value is serialized from the selection at
    /// this moment, not taken from any earlier snapshot.
    pub fn submit(&mut self) -> Result<FormSubmission, WidgetError> {
        if self.selection.is_empty() {
            return Err(self.block(WidgetError::EmptySelection));
        }
        let submission = FormSubmission {
            field: self.config.hidden_field_name.clone(),
            value: self.selection.hidden_field_value(),
            ids: self.selection.serialize(),
        };
        tracing::info!(widget = %self.id, count = submission.ids.len(), "Medication form submitted");
        Ok(submission)
    }

    pub fn reset(&mut self) {
        self.selection.clear();
        self.input.clear();
        self.fetcher.close();
        self.checker.borrow_mut().reset();
        self.search_results.borrow_mut().clear();
        self.search_awaiting = None;
        self.feedback = None;
        self.live_region.announce("Medication list cleared.");
    }

    // ── Read access ─────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn fetcher(&self) -> &SuggestionFetcher {
        &self.fetcher
    }

    pub fn dropdown_state(&self) -> DropdownState {
        self.fetcher.state()
    }

    pub fn check_enabled(&self) -> bool {
        self.check_button.borrow().enabled()
    }

    pub fn hidden_field_value(&self) -> String {
        self.hidden_field.borrow().value().to_string()
    }

    pub fn search_button_label(&self, id: &MedicationId) -> Option<&'static str> {
        self.search_results.borrow().button_label(id)
    }

    /// The report for the current selection, if a check has completed
    /// since it last changed.
    pub fn interaction_report(&self) -> Option<InteractionReport> {
        self.checker.borrow().report().cloned()
    }

    pub fn is_checking(&self) -> bool {
        self.checker.borrow().is_checking()
    }

    /// Widget-level message (precondition failures, search errors).
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        let suggestions_html = match self.fetcher.state() {
            DropdownState::Open => render::suggestion_list(
                self.fetcher.candidates(),
                self.fetcher.highlight_index(),
                |id| self.selection.contains(id),
                self.config.show_name_tooltip,
            ),
            _ => self.fetcher.feedback().map(Feedback::html).unwrap_or_default(),
        };

        WidgetSnapshot {
            widget_id: self.id,
            input: self.input.clone(),
            dropdown: self.fetcher.state(),
            highlighted: self.fetcher.highlight_index(),
            suggestions_html,
            tags_html: self.tags.borrow().html().to_string(),
            hidden_field: self.hidden_field_value(),
            check_enabled: self.check_enabled(),
            search_html: self.search_results.borrow().html().to_string(),
            interactions_html: self
                .checker
                .borrow()
                .report()
                .map(|r| render::interaction_report(&r.outcome))
                .unwrap_or_default(),
            feedback: self.feedback.clone(),
        }
    }

    // ── Internal ────────────────────────────────────────────

    /// Show a blocking message for a refused action and hand the error back.
    fn block(&mut self, error: WidgetError) -> WidgetError {
        let message = error.to_string();
        self.feedback = Some(Feedback::error(&message));
        self.live_region.announce(message);
        error
    }

    fn announce_count(&self, prefix: &str) {
        let count = self.selection.count();
        self.live_region.announce(format!(
            "{prefix} {count} {} selected.",
            plural(count, "medication")
        ));
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// Rendered state of one widget, for shells that paint it.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub widget_id: Uuid,
    pub input: String,
    pub dropdown: DropdownState,
    pub highlighted: Option<usize>,
    pub suggestions_html: String,
    pub tags_html: String,
    pub hidden_field: String,
    pub check_enabled: bool,
    pub search_html: String,
    pub interactions_html: String,
    pub feedback: Option<Feedback>,
}

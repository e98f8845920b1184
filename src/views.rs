//! View models derived from the selection set.
//!
//! Each view subscribes to `SelectionSet` and recomputes its output from
//! the snapshot it receives.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::WidgetConfig;
use crate::models::{MedicationId, SearchResult, SelectedMedication};
use crate::render;
use crate::selection::{encode_ids, SelectionObserver};

/// Minimum selection size for an interaction check.
pub const MIN_INTERACTION_SELECTION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Loading,
    Empty,
    Error,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

/// A line of user-facing status text. "Nothing found" and "request failed"
/// are separate kinds so they never read the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    kind: FeedbackKind,
    text: String,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn loading(text: &str) -> Self {
        Self::new(FeedbackKind::Loading, text)
    }

    pub fn empty(text: &str) -> Self {
        Self::new(FeedbackKind::Empty, text)
    }

    pub fn error(text: &str) -> Self {
        Self::new(FeedbackKind::Error, text)
    }

    pub fn kind(&self) -> FeedbackKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn html(&self) -> String {
        render::feedback(self.kind.as_str(), &self.text)
    }
}

/// Removable tag list.
pub struct TagListView {
    config: WidgetConfig,
    html: String,
}

impl TagListView {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            config: config.clone(),
            html: render::tag_list(&[], config),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl SelectionObserver for TagListView {
    fn selection_changed(&mut self, selection: &[SelectedMedication]) {
        self.html = render::tag_list(selection, &self.config);
    }
}

/// Hidden form input carrying the JSON id list.
pub struct HiddenFieldView {
    name: String,
    value: String,
}

impl HiddenFieldView {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: encode_ids(&[]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl SelectionObserver for HiddenFieldView {
    fn selection_changed(&mut self, selection: &[SelectedMedication]) {
        let ids: Vec<MedicationId> = selection.iter().map(|m| m.id.clone()).collect();
        self.value = encode_ids(&ids);
    }
}

/// The "Check interactions" control.
#[derive(Default)]
pub struct CheckButtonView {
    enabled: bool,
}

impl CheckButtonView {
    pub fn enabled(&self) -> bool {
        self.enabled
    }
}

impl SelectionObserver for CheckButtonView {
    fn selection_changed(&mut self, selection: &[SelectedMedication]) {
        self.enabled = selection.len() >= MIN_INTERACTION_SELECTION;
    }
}

/// Search result cards. Results are pushed in by the widget; the
/// Select/Selected state of every card comes from the selection snapshot.
#[derive(Default)]
pub struct SearchResultsView {
    results: Vec<SearchResult>,
    selected: HashSet<MedicationId>,
    html: String,
}

impl SearchResultsView {
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.results = results;
        self.rerender();
    }

    pub fn clear(&mut self) {
        self.set_results(Vec::new());
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn find(&self, id: &MedicationId) -> Option<&SearchResult> {
        self.results.iter().find(|r| &r.id == id)
    }

    /// Button label for a card, `None` if no such card is shown.
    pub fn button_label(&self, id: &MedicationId) -> Option<&'static str> {
        self.find(id)
            .map(|r| render::select_label(self.selected.contains(&r.id)))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    fn rerender(&mut self) {
        self.html = render::search_cards(&self.results, &self.selected);
    }
}

impl SelectionObserver for SearchResultsView {
    fn selection_changed(&mut self, selection: &[SelectedMedication]) {
        self.selected = selection.iter().map(|m| m.id.clone()).collect();
        self.rerender();
    }
}

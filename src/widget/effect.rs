use serde::Serialize;

use crate::interactions::InteractionRequest;
use crate::models::MedicationId;
use crate::suggestions::SuggestionRequest;

/// Network work requested by a widget operation. The caller performs it
/// and feeds the result back through the matching `apply_*` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSuggestions(SuggestionRequest),
    Search(SearchRequest),
    CheckInteractions(InteractionRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: u64,
    pub query: String,
}

/// Key presses the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    /// Ctrl+Enter or Meta+Enter.
    ModifiedEnter,
    ArrowDown,
    ArrowUp,
    Escape,
    Tab,
    Other,
}

/// What a standard form post would carry: one hidden field holding the
/// JSON-encoded id list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    pub field: String,
    pub value: String,
    pub ids: Vec<MedicationId>,
}

impl FormSubmission {
    /// `application/x-www-form-urlencoded` pairs.
    pub fn form_pairs(&self) -> Vec<(&str, &str)> {
        vec![(self.field.as_str(), self.value.as_str())]
    }
}

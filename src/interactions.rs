//! Interaction checker.
//!
//! A check needs at least two selected medications; the precondition is
//! enforced before any request exists. Results are never cached: each
//! check issues a fresh token and only the latest one is applied. The
//! checker observes the selection, and any change to it drops both the
//! pending check and the last report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::ApiError;
use crate::models::{InteractionResult, MedicationId, SelectedMedication};
use crate::render::NO_INTERACTIONS_TEXT;
use crate::selection::{SelectionObserver, SelectionSet};
use crate::views::MIN_INTERACTION_SELECTION;
use crate::widget::WidgetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRequest {
    pub token: u64,
    pub drugs: Vec<MedicationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// Not an error: nothing is known, which is not a safety guarantee.
    NoKnownInteractions,
    Warnings(Vec<InteractionResult>),
    Failed(String),
}

impl InteractionOutcome {
    /// Live-region text for this outcome.
    pub fn announcement(&self) -> String {
        match self {
            Self::NoKnownInteractions => NO_INTERACTIONS_TEXT.to_string(),
            Self::Warnings(results) if results.len() == 1 => {
                "Found 1 potential interaction".to_string()
            }
            Self::Warnings(results) => format!("Found {} potential interactions", results.len()),
            Self::Failed(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionReport {
    pub outcome: InteractionOutcome,
    pub medications_checked: usize,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct InteractionChecker {
    last_issued: u64,
    awaiting: Option<u64>,
    /// Ids sent with the latest check; the report only holds while the
    /// selection still matches them.
    checked: Vec<MedicationId>,
    report: Option<InteractionReport>,
}

impl InteractionChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request for the current selection, or refuse if fewer than
    /// two medications are selected.
    pub fn prepare(&mut self, selection: &SelectionSet) -> Result<InteractionRequest, WidgetError> {
        let selected = selection.count();
        if selected < MIN_INTERACTION_SELECTION {
            return Err(WidgetError::NotEnoughMedications {
                required: MIN_INTERACTION_SELECTION,
                selected,
            });
        }

        self.last_issued += 1;
        let token = self.last_issued;
        self.awaiting = Some(token);
        self.checked = selection.serialize();
        self.report = None;

        Ok(InteractionRequest {
            token,
            drugs: self.checked.clone(),
        })
    }

    /// Apply a response. Returns `None` for superseded tokens.
    pub fn complete(
        &mut self,
        token: u64,
        result: Result<Vec<InteractionResult>, ApiError>,
    ) -> Option<&InteractionReport> {
        if self.awaiting != Some(token) {
            tracing::debug!(token, "Discarding stale interaction result");
            return None;
        }
        self.awaiting = None;

        let outcome = match result {
            Ok(results) if results.is_empty() => InteractionOutcome::NoKnownInteractions,
            Ok(results) => InteractionOutcome::Warnings(results),
            Err(e) => {
                tracing::warn!(token, error = %e, "Interaction check failed");
                InteractionOutcome::Failed(match e {
                    ApiError::Status { message, .. } => message,
                    _ => CHECK_FAILED_TEXT.to_string(),
                })
            }
        };

        self.report = Some(InteractionReport {
            outcome,
            medications_checked: self.checked.len(),
            checked_at: Utc::now(),
        });
        self.report.as_ref()
    }

    pub fn is_checking(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn report(&self) -> Option<&InteractionReport> {
        self.report.as_ref()
    }

    /// Ids the pending check or current report refers to.
    pub fn checked(&self) -> &[MedicationId] {
        &self.checked
    }

    pub fn reset(&mut self) {
        self.awaiting = None;
        self.checked.clear();
        self.report = None;
    }
}

impl SelectionObserver for InteractionChecker {
    fn selection_changed(&mut self, selection: &[SelectedMedication]) {
        let unchanged = self.checked.len() == selection.len()
            && self.checked.iter().zip(selection).all(|(id, m)| *id == m.id);
        if unchanged || (self.awaiting.is_none() && self.report.is_none()) {
            return;
        }
        tracing::debug!(
            pending = self.awaiting.is_some(),
            "Selection changed, dropping interaction results"
        );
        self.reset();
    }
}

pub const CHECK_FAILED_TEXT: &str = "Error checking interactions. Please try again.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SelectedMedication, Severity};

    fn selection(ids: &[&str]) -> SelectionSet {
        let mut set = SelectionSet::new();
        for id in ids {
            set.add(SelectedMedication::new(*id, id));
        }
        set
    }

    fn warning() -> InteractionResult {
        InteractionResult {
            severity: Severity::High,
            title: None,
            description: "Bleeding risk".into(),
            recommendation: None,
        }
    }

    #[test]
    fn refuses_fewer_than_two() {
        let mut checker = InteractionChecker::new();
        for ids in [&[][..], &["d1"][..]] {
            let err = checker.prepare(&selection(ids)).unwrap_err();
            assert_eq!(
                err,
                WidgetError::NotEnoughMedications {
                    required: 2,
                    selected: ids.len()
                }
            );
        }
        assert!(!checker.is_checking());
    }

    #[test]
    fn request_carries_ids_in_order() {
        let mut checker = InteractionChecker::new();
        let req = checker.prepare(&selection(&["d2", "d1"])).unwrap();
        assert_eq!(req.drugs, vec![MedicationId::new("d2"), MedicationId::new("d1")]);
        assert!(checker.is_checking());
    }

    #[test]
    fn empty_result_is_no_known_interactions() {
        let mut checker = InteractionChecker::new();
        let req = checker.prepare(&selection(&["d1", "d2"])).unwrap();
        let report = checker.complete(req.token, Ok(Vec::new())).unwrap();
        assert_eq!(report.outcome, InteractionOutcome::NoKnownInteractions);
        assert_eq!(report.medications_checked, 2);
        assert_eq!(
            report.outcome.announcement(),
            "No known interactions found between the selected medications."
        );
    }

    #[test]
    fn warnings_are_counted_in_announcement() {
        let mut checker = InteractionChecker::new();
        let req = checker.prepare(&selection(&["d1", "d2", "d3"])).unwrap();
        let report = checker
            .complete(req.token, Ok(vec![warning(), warning()]))
            .unwrap();
        assert_eq!(report.outcome.announcement(), "Found 2 potential interactions");
    }

    #[test]
    fn only_latest_check_applies() {
        let mut checker = InteractionChecker::new();
        let set = selection(&["d1", "d2"]);
        let first = checker.prepare(&set).unwrap();
        let second = checker.prepare(&set).unwrap();
        assert!(checker.complete(first.token, Ok(vec![warning()])).is_none());
        assert!(checker.complete(second.token, Ok(Vec::new())).is_some());
        assert_eq!(
            checker.report().unwrap().outcome,
            InteractionOutcome::NoKnownInteractions
        );
    }

    #[test]
    fn failures_map_to_user_text() {
        let mut checker = InteractionChecker::new();
        let set = selection(&["d1", "d2"]);
        let req = checker.prepare(&set).unwrap();
        let report = checker
            .complete(req.token, Err(ApiError::Connection("x".into())))
            .unwrap();
        assert_eq!(report.outcome, InteractionOutcome::Failed(CHECK_FAILED_TEXT.into()));

        let req = checker.prepare(&set).unwrap();
        let report = checker
            .complete(
                req.token,
                Err(ApiError::Status {
                    status: 400,
                    message: "Unknown drug id".into(),
                }),
            )
            .unwrap();
        assert_eq!(report.outcome, InteractionOutcome::Failed("Unknown drug id".into()));
    }

    #[test]
    fn new_check_clears_previous_report() {
        let mut checker = InteractionChecker::new();
        let set = selection(&["d1", "d2"]);
        let req = checker.prepare(&set).unwrap();
        checker.complete(req.token, Ok(Vec::new()));
        checker.prepare(&set).unwrap();
        assert!(checker.report().is_none());
    }

    #[test]
    fn selection_change_drops_pending_check() {
        let checker = std::rc::Rc::new(std::cell::RefCell::new(InteractionChecker::new()));
        let mut set = selection(&["d1", "d2"]);
        set.subscribe(checker.clone());

        let req = checker.borrow_mut().prepare(&set).unwrap();
        set.remove(&MedicationId::new("d2"));
        assert!(!checker.borrow().is_checking());
        assert!(checker
            .borrow_mut()
            .complete(req.token, Ok(vec![warning()]))
            .is_none());
        assert!(checker.borrow().report().is_none());
    }

    #[test]
    fn selection_change_clears_report() {
        let checker = std::rc::Rc::new(std::cell::RefCell::new(InteractionChecker::new()));
        let mut set = selection(&["d1", "d2"]);
        set.subscribe(checker.clone());

        let req = checker.borrow_mut().prepare(&set).unwrap();
        checker.borrow_mut().complete(req.token, Ok(vec![warning()]));
        // Re-adding a present id does not change the selection.
        set.add(SelectedMedication::new("d1", "d1"));
        assert!(checker.borrow().report().is_some());

        set.add(SelectedMedication::new("d3", "d3"));
        assert!(checker.borrow().report().is_none());
        assert!(checker.borrow().checked().is_empty());
    }
}

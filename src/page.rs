//! A page: the accessibility layer plus one medication widget.
//!
//! `Page` routes UI events to the right component and applies fetch
//! completions. It never touches the network itself; see `driver`.

use serde::Serialize;

use crate::accessibility::Accessibility;
use crate::api::ApiError;
use crate::config::WidgetConfig;
use crate::models::{FontSize, InteractionResult, MedicationCandidate, MedicationId, SearchResult};
use crate::widget::{Effect, FormSubmission, Key, MedicationWidget, WidgetSnapshot};

pub const UNCAUGHT_ERROR_TEXT: &str = "An error occurred. Please try again.";

/// User input as the page receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Input(String),
    Key(Key),
    ClickSuggestion(usize),
    ClickOutside,
    PointerDown,
    RemoveTag(MedicationId),
    SubmitSearch(String),
    ToggleSearchResult(MedicationId),
    CheckInteractions,
    SubmitForm,
    Reset,
    SetFontSize(FontSize),
    ToggleContrast,
}

/// A finished network effect, tagged with the token it was issued under.
#[derive(Debug, Clone)]
pub enum Completion {
    Suggestions {
        token: u64,
        result: Result<Vec<MedicationCandidate>, ApiError>,
    },
    Search {
        token: u64,
        result: Result<Vec<SearchResult>, ApiError>,
    },
    Interactions {
        token: u64,
        result: Result<Vec<InteractionResult>, ApiError>,
    },
}

pub struct Page {
    a11y: Accessibility,
    widget: MedicationWidget,
    submitted: Option<FormSubmission>,
}

impl Page {
    pub fn new(config: WidgetConfig) -> Self {
        let a11y = Accessibility::new();
        let widget = MedicationWidget::new(config, a11y.live_region());
        Self {
            a11y,
            widget,
            submitted: None,
        }
    }

    /// Route one event. Returns the network work it started, if any.
    pub fn handle(&mut self, event: UiEvent) -> Vec<Effect> {
        tracing::trace!(?event, "UI event");
        let effect = match event {
            UiEvent::Input(text) => self.widget.input_changed(&text),
            UiEvent::Key(key) => {
                if key == Key::Tab {
                    self.a11y.tab_pressed();
                }
                match self.widget.key(key) {
                    Ok(Some(submission)) => self.submitted = Some(submission),
                    Ok(None) => {}
                    Err(e) => tracing::debug!(error = %e, "Key action refused"),
                }
                None
            }
            UiEvent::ClickSuggestion(index) => {
                self.a11y.pointer_down();
                self.widget.click_suggestion(index);
                None
            }
            UiEvent::ClickOutside => {
                self.a11y.pointer_down();
                self.widget.click_outside();
                None
            }
            UiEvent::PointerDown => {
                self.a11y.pointer_down();
                None
            }
            UiEvent::RemoveTag(id) => {
                self.widget.remove(&id);
                None
            }
            UiEvent::SubmitSearch(query) => self.widget.submit_search(&query),
            UiEvent::ToggleSearchResult(id) => {
                self.widget.toggle_search_result(&id);
                None
            }
            UiEvent::CheckInteractions => match self.widget.check_interactions() {
                Ok(effect) => Some(effect),
                Err(e) => {
                    tracing::debug!(error = %e, "Interaction check refused");
                    None
                }
            },
            UiEvent::SubmitForm => {
                match self.widget.submit() {
                    Ok(submission) => self.submitted = Some(submission),
                    Err(e) => tracing::debug!(error = %e, "Form submission refused"),
                }
                None
            }
            UiEvent::Reset => {
                self.submitted = None;
                self.widget.reset();
                None
            }
            UiEvent::SetFontSize(size) => {
                self.a11y.set_font_size(size);
                None
            }
            UiEvent::ToggleContrast => {
                self.a11y.toggle_high_contrast();
                None
            }
        };
        effect.into_iter().collect()
    }

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Suggestions { token, result } => {
                self.widget.apply_suggestions(token, result)
            }
            Completion::Search { token, result } => self.widget.apply_search(token, result),
            Completion::Interactions { token, result } => {
                self.widget.apply_interactions(token, result)
            }
        }
    }

    /// Last-resort handler for failures nothing else caught. Logs the
    /// error and tells the user; widget state is left as it was.
    pub fn report_uncaught(&mut self, error: &dyn std::error::Error) {
        tracing::error!(error = %error, "Uncaught error");
        self.a11y.live_region().announce(UNCAUGHT_ERROR_TEXT);
    }

    pub fn widget(&self) -> &MedicationWidget {
        &self.widget
    }

    pub fn accessibility(&self) -> &Accessibility {
        &self.a11y
    }

    /// The most recent accepted form post.
    pub fn submitted(&self) -> Option<&FormSubmission> {
        self.submitted.as_ref()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            body_classes: self.a11y.body_classes(),
            font_size: self.a11y.font_size().css_value(),
            announcement: self.a11y.live_region().text(),
            submitted: self.submitted.clone(),
            widget: self.widget.snapshot(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub body_classes: Vec<&'static str>,
    pub font_size: &'static str,
    pub announcement: String,
    pub submitted: Option<FormSubmission>,
    pub widget: WidgetSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessibility::{HIGH_CONTRAST_CLASS, KEYBOARD_NAV_CLASS};
    use crate::suggestions::DropdownState;

    fn page() -> Page {
        Page::new(WidgetConfig::default())
    }

    fn pick(page: &mut Page, id: &str, name: &str) {
        let effects = page.handle(UiEvent::Input(name.to_string()));
        let Some(Effect::FetchSuggestions(req)) = effects.first() else {
            panic!("expected suggestion fetch");
        };
        page.apply(Completion::Suggestions {
            token: req.token,
            result: Ok(vec![MedicationCandidate::new(id, name)]),
        });
        page.handle(UiEvent::ClickSuggestion(0));
    }

    #[test]
    fn tab_and_pointer_toggle_keyboard_mode() {
        let mut page = page();
        page.handle(UiEvent::Key(Key::Tab));
        assert_eq!(page.snapshot().body_classes, vec![KEYBOARD_NAV_CLASS]);
        page.handle(UiEvent::PointerDown);
        assert!(page.snapshot().body_classes.is_empty());
    }

    #[test]
    fn font_and_contrast_announce() {
        let mut page = page();
        page.handle(UiEvent::SetFontSize(FontSize::Large));
        assert_eq!(page.snapshot().announcement, "Font size set to large");
        assert_eq!(page.snapshot().font_size, FontSize::Large.css_value());

        page.handle(UiEvent::ToggleContrast);
        let snap = page.snapshot();
        assert_eq!(snap.body_classes, vec![HIGH_CONTRAST_CLASS]);
        assert_eq!(snap.announcement, "High contrast mode enabled");
    }

    #[test]
    fn widget_and_page_share_one_live_region() {
        let mut page = page();
        pick(&mut page, "d1", "Ibuprofen");
        assert_eq!(
            page.snapshot().announcement,
            "Ibuprofen added. 1 medication selected."
        );
    }

    #[test]
    fn submit_records_submission() {
        let mut page = page();
        assert!(page.handle(UiEvent::SubmitForm).is_empty());
        assert!(page.submitted().is_none());

        pick(&mut page, "d1", "Ibuprofen");
        page.handle(UiEvent::Key(Key::ModifiedEnter));
        assert_eq!(page.submitted().unwrap().value, r#"["d1"]"#);

        page.handle(UiEvent::Reset);
        assert!(page.submitted().is_none());
    }

    #[test]
    fn refused_check_produces_no_effect() {
        let mut page = page();
        pick(&mut page, "d1", "Ibuprofen");
        assert!(page.handle(UiEvent::CheckInteractions).is_empty());
        pick(&mut page, "d2", "Aspirin");
        assert!(matches!(
            page.handle(UiEvent::CheckInteractions).as_slice(),
            [Effect::CheckInteractions(_)]
        ));
    }

    #[test]
    fn uncaught_error_leaves_state_alone() {
        let mut page = page();
        pick(&mut page, "d1", "Ibuprofen");
        page.handle(UiEvent::Input("asp".into()));

        let err = std::io::Error::other("worker crashed");
        page.report_uncaught(&err);

        let snap = page.snapshot();
        assert_eq!(snap.announcement, UNCAUGHT_ERROR_TEXT);
        assert_eq!(snap.widget.hidden_field, r#"["d1"]"#);
        assert_eq!(snap.widget.dropdown, DropdownState::Loading);
    }
}

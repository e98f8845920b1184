//! Accessibility layer: font size, high contrast, keyboard-navigation
//! mode and the page's single live region.

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::FontSize;

pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";
pub const KEYBOARD_NAV_CLASS: &str = "keyboard-navigation";

/// Handle to the page's `aria-live` region.
///
/// Clones share one region; a new announcement replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct LiveRegion {
    current: Rc<RefCell<String>>,
}

impl LiveRegion {
    pub fn announce(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Live region announcement");
        *self.current.borrow_mut() = message;
    }

    pub fn text(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn html(&self) -> String {
        format!(
            r#"<div class="sr-only" aria-live="polite" aria-atomic="true">{}</div>"#,
            crate::render::escape_html(&self.text())
        )
    }

    /// Whether two handles point at the same region.
    pub fn same_region(&self, other: &LiveRegion) -> bool {
        Rc::ptr_eq(&self.current, &other.current)
    }
}

#[derive(Debug, Default)]
pub struct Accessibility {
    font_size: FontSize,
    high_contrast: bool,
    keyboard_navigation: bool,
    live_region: LiveRegion,
}

impl Accessibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for components that need to announce. Exactly one region
    /// exists per `Accessibility`; every handle shares it.
    pub fn live_region(&self) -> LiveRegion {
        self.live_region.clone()
    }

    /// Absolute set, not an increment.
    pub fn set_font_size(&mut self, size: FontSize) {
        self.font_size = size;
        self.live_region.announce(format!("Font size set to {size}"));
    }

    pub fn toggle_high_contrast(&mut self) -> bool {
        self.high_contrast = !self.high_contrast;
        let state = if self.high_contrast { "enabled" } else { "disabled" };
        self.live_region.announce(format!("High contrast mode {state}"));
        self.high_contrast
    }

    /// Tab enters keyboard-navigation mode.
    pub fn tab_pressed(&mut self) {
        self.keyboard_navigation = true;
    }

    /// Any pointer-down leaves it.
    pub fn pointer_down(&mut self) {
        self.keyboard_navigation = false;
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn high_contrast(&self) -> bool {
        self.high_contrast
    }

    pub fn keyboard_navigation(&self) -> bool {
        self.keyboard_navigation
    }

    pub fn body_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.high_contrast {
            classes.push(HIGH_CONTRAST_CLASS);
        }
        if self.keyboard_navigation {
            classes.push(KEYBOARD_NAV_CLASS);
        }
        classes
    }
}

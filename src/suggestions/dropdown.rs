//! Suggestion dropdown state machine.
//!
//! ```text
//! Closed ──(non-empty input)──▶ Loading ──▶ Open | Empty | Error
//!   ▲                                          │
//!   └──(Escape, click outside, selection, input cleared)
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownState {
    #[default]
    Closed,
    Loading,
    Open,
    Empty,
    Error,
}

impl DropdownState {
    /// Whether anything (list, spinner, message) is shown under the input.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Arrow-key highlight over `len` options, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlight(Option<usize>);

impl Highlight {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }

    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.0 = None;
            return None;
        }
        self.0 = Some(match self.0 {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
        self.0
    }

    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.0 = None;
            return None;
        }
        self.0 = Some(match self.0 {
            Some(i) if i > 0 && i < len => i - 1,
            _ => len - 1,
        });
        self.0
    }
}

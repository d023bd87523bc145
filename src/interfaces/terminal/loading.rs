//! Loading indicator
//!
//! Has a single state: visible. Showing or hiding it is the caller's business.

use std::fmt;

const SPINNER: &str = "⠋";
const LABEL: &str = "Loading…";

/// Busy-state indicator shown while a page is being fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingIndicator;

impl LoadingIndicator {
    pub fn new() -> Self {
        Self
    }

    /// Always returns the same text.
    pub fn render(&self) -> String {
        format!("{SPINNER} {LABEL}")
    }
}

impl fmt::Display for LoadingIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SPINNER} {LABEL}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_input() {
        assert!(!LoadingIndicator::new().render().is_empty());
    }

    #[test]
    fn render_is_stable() {
        let indicator = LoadingIndicator::default();
        let first = indicator.render();
        for _ in 0..10 {
            assert_eq!(indicator.render(), first);
        }
        assert_eq!(LoadingIndicator::new().render(), first);
        assert_eq!(indicator.to_string(), first);
    }
}

//! Collapsible navbar state

use crate::classes::{update_utility_classes, ClassList, ClassResult};
use serde::{Deserialize, Serialize};

/// Utility class that hides the collapsed menu
pub const HIDDEN_CLASS: &str = "hidden";

/// Whether the collapsible menu is expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavbarState {
    pub is_open: bool,
}

/// Events the host forwards to the navbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarEvent {
    /// The toggler was clicked; `n_clicks` is the host's running click count
    TogglerClicked { n_clicks: Option<u32> },
    /// A page link was followed
    Navigated,
}

impl NavbarState {
    pub fn new(is_open: bool) -> Self {
        Self { is_open }
    }

    /// Next state for an event
    pub fn reduce(self, event: NavbarEvent) -> Self {
        match event {
            // The host fires once on page load with no clicks yet
            NavbarEvent::TogglerClicked { n_clicks } => match n_clicks {
                Some(n) if n > 0 => Self {
                    is_open: !self.is_open,
                },
                _ => self,
            },
            NavbarEvent::Navigated => Self { is_open: false },
        }
    }
}

/// Class string for the collapse container in the given state
///
/// Returns `current` unchanged (whitespace-normalized) when it already matches.
pub fn collapse_classes(current: &str, is_open: bool) -> ClassResult<String> {
    let hidden = ClassList::parse(current).contains(HIDDEN_CLASS);
    match (is_open, hidden) {
        (true, true) => update_utility_classes(current, &[HIDDEN_CLASS], &[], false),
        (false, false) => update_utility_classes(current, &[], &[HIDDEN_CLASS], true),
        _ => Ok(ClassList::parse(current).to_string()),
    }
}

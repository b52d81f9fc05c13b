//! UI state transitions
//!
//! Pure functions from (current UI state, event) to new UI state. The host UI
//! framework owns event dispatch and calls these from its own handlers; nothing
//! here assumes a particular binding mechanism.
//!
//! - **navbar**: Collapsible navbar toggle
//! - **nav**: Page registry and active-link highlighting

pub mod nav;
pub mod navbar;

pub use nav::{
    default_pages, highlight_active_link, highlight_active_links, nav_links, NavIcon,
    NavLinkState, NavLinkStyle, PageEntry,
};
pub use navbar::{collapse_classes, NavbarEvent, NavbarState, HIDDEN_CLASS};

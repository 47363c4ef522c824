//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer turns the page model and its computed styles into cells on the
//! terminal.  No choreography math happens here.

pub mod indicator;
pub mod layout;
pub mod page_view;
pub mod popup;
pub mod smooth_scroll;
pub mod theme;

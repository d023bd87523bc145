//! Plain-text rendering for terminals

pub mod loading;
pub mod table;

pub use loading::LoadingIndicator;
pub use table::{render_failure, render_page, render_state, render_update_status};

//! Text rendering of fetch states and update checks

use std::fmt::{Display, Write};

use super::LoadingIndicator;
use crate::application::{FetchFailure, FetchState, UpdateStatus};
use crate::domain::{Pagination, PaginationParams};

/// Numbered records followed by a `page X of Y` footer.
pub fn render_page<T: Display>(page: &Pagination<Vec<T>>) -> String {
    let offset = PaginationParams::new(page.page, page.page_size).offset();
    let mut out = String::new();

    if page.data.is_empty() {
        out.push_str("  (no records)\n");
    }
    for (i, record) in page.data.iter().enumerate() {
        let _ = writeln!(out, "{:>4}. {}", offset + i as u64 + 1, record);
    }
    let _ = write!(
        out,
        "page {} of {} ({} records)",
        page.page,
        page.total_pages.max(1),
        page.total_records
    );
    out
}

pub fn render_failure(failure: &FetchFailure) -> String {
    format!("Error: {}", failure.reason)
}

/// What a terminal should show for the given state. Empty while idle.
pub fn render_state<T: Display>(state: &FetchState<T>) -> String {
    match state {
        FetchState::Idle => String::new(),
        FetchState::Loading { .. } => LoadingIndicator::new().render(),
        FetchState::Loaded(page) => render_page(page),
        FetchState::Failed(failure) => render_failure(failure),
    }
}

pub fn render_update_status(status: &UpdateStatus) -> String {
    if status.update_available {
        format!(
            "Update available: {} -> {}\nDownload: {}",
            status.current, status.latest, status.url
        )
    } else {
        format!(
            "Up to date: running {} (latest {})",
            status.current, status.latest
        )
    }
}

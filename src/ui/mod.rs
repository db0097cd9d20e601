//! Page components. Each pane owns the state one region of the page shows
//! and is written only by its own component; `App` wires them together.

pub mod compose;
pub mod detail;
pub mod list;
pub mod poller;

use crate::api::types::ReceivedAt;
use std::fmt::Write as _;

/// en-US style `toLocaleString` rendering, e.g. `6/10/2024, 8:00:00 AM`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub const INVALID_DATE: &str = "Invalid Date";

pub const NO_SUBJECT: &str = "(no subject)";

/// Display string for a message timestamp in local time.
pub fn format_received(received: Option<&ReceivedAt>, date_format: &str) -> String {
    let local = match received.and_then(|r| r.to_local()) {
        Some(local) => local,
        None => return INVALID_DATE.to_string(),
    };

    let mut out = String::new();
    if write!(out, "{}", local.format(date_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(DEFAULT_DATE_FORMAT));
    }
    out
}

//! The status line: the last cycle's outcome and connectivity changes.

use std::cell::RefCell;
use std::io::Write;

use chrono::{DateTime, Local, TimeZone};
use tracing::{info, warn};

/// Receives user-facing status messages. Never fails.
pub trait StatusReporter {
    /// Show `message` as the current status, replacing the previous one.
    fn report(&self, message: &str);
}

/// Success text, e.g. `Last updated: 3:04:05 PM`.
///
/// # Arguments
///
/// * `at` - Completion time of the cycle, in the zone it should be shown in
///
/// # Returns
///
/// `"Last updated: "` followed by a 12-hour clock time with seconds.
pub fn last_updated_message<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Last updated: {}", at.format("%-I:%M:%S %p"))
}

/// Success text stamped with the current local time.
///
/// # Returns
///
/// The same text as [`last_updated_message`] for `Local::now()`.
pub fn last_updated_now() -> String {
    last_updated_message(&Local::now())
}

/// Writes status messages to a terminal sink and to the diagnostic log.
pub struct StatusLine<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> StatusLine<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }
}

impl<W: Write> StatusReporter for StatusLine<W> {
    fn report(&self, message: &str) {
        info!(status = %message, "Status");

        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "[status] {}", message).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write status line");
        }
    }
}

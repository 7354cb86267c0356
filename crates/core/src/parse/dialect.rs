//! The line-dialect seam shared by the pin-descriptor parsers.
//!
//! A dialect turns one line of text into a candidate [`PinRecord`] or rejects
//! it; [`parse_pin_lines`] runs a dialect over a whole stream under a ceiling.

use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::PinRecord;

/// A debug-text dialect that turns one line into a candidate pin record.
///
/// Lines that do not have the dialect's record shape are rejected with `None`.
/// Debug dumps mix commentary with records, so rejection is not an error.
pub trait PinDialect {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn parse_line(&self, line: &str) -> Option<PinRecord>;
}

/// Run a dialect over every line of `text`, keeping accepted records in file
/// order. At most `max_pins` records are kept; the rest are counted in a
/// `CapacityExceeded` diagnostic.
pub fn parse_pin_lines<D: PinDialect + ?Sized>(
    dialect: &D,
    text: &str,
    source_name: &str,
    max_pins: usize,
    diags: &mut Diagnostics,
) -> Vec<PinRecord> {
    let mut pins = Vec::new();
    let mut rejected = 0usize;
    let mut dropped = 0usize;

    for line in text.lines() {
        match dialect.parse_line(line) {
            Some(_) if pins.len() >= max_pins => dropped += 1,
            Some(pin) => pins.push(pin),
            None => {
                trace!(dialect = dialect.name(), line, "rejected line");
                rejected += 1;
            }
        }
    }

    if dropped > 0 {
        diags.push(Diagnostic::CapacityExceeded {
            what: format!("{source_name}: pins"),
            limit: max_pins,
            dropped,
        });
    }

    debug!(
        dialect = dialect.name(),
        source = source_name,
        pins = pins.len(),
        rejected,
        "parsed pin records"
    );
    pins
}

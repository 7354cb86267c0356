//! Chip directory parser for the system-wide GPIO summary (`<debugfs>/gpio`).
//!
//! Header lines look like
//! `gpiochip4: GPIOs 498-505, parent: platform/31000000.gpio, aon_gpio_porta:`.
//! Indented per-line rows that follow each header are not directory records
//! and are skipped without comment.

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::ChipDirectoryEntry;

const RANGE_PREFIX: &str = "GPIOs ";
const PARENT_PREFIX: &str = "parent: ";

/// Tokens of a `<chip>: GPIOs <range>, parent: <parent>[, <controller>]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipHeader<'a> {
    pub chip_name: &'a str,
    /// Full range field including the `GPIOs ` prefix.
    pub range_label: &'a str,
    pub base_offset: u32,
    pub parent: &'a str,
    /// Trailing controller label with its `:` stripped, when present.
    pub controller: Option<&'a str>,
}

/// Split a chip header line into its fields.
///
/// Returns `None` when the line does not have the header shape or the range
/// does not start with an integer.
pub fn parse_chip_header(line: &str) -> Option<ChipHeader<'_>> {
    let line = line.trim_end();
    let (chip_name, rest) = line.split_once(": ")?;
    let chip_name = chip_name.trim();
    if chip_name.is_empty() || chip_name.contains(char::is_whitespace) {
        return None;
    }

    let mut fields = rest.split(", ");
    let range_label = fields.next()?.trim();
    let parent = fields.next()?.trim().strip_prefix(PARENT_PREFIX)?.trim();
    let controller = match fields.next() {
        Some(field) => {
            let field = field.trim();
            let field = field.strip_suffix(':').unwrap_or(field).trim();
            if field.is_empty() || field.contains(char::is_whitespace) {
                return None;
            }
            Some(field)
        }
        None => None,
    };
    if fields.next().is_some() {
        return None;
    }

    let base_offset = parse_base_offset(range_label)?;
    let parent = parent.strip_suffix(':').unwrap_or(parent);
    Some(ChipHeader { chip_name, range_label, base_offset, parent, controller })
}

/// First integer of a `GPIOs N-M` range.
fn parse_base_offset(range_label: &str) -> Option<u32> {
    let range = range_label.strip_prefix(RANGE_PREFIX)?.trim();
    let (first, _) = range.split_once('-').unwrap_or((range, ""));
    first.trim().parse().ok()
}

/// Parse the chip directory text into entries, in file order.
///
/// Malformed header lines are reported and skipped. Duplicate chip names keep
/// their first entry. At most `max_chips` entries are returned.
pub fn parse_chip_directory(
    text: &str,
    source_name: &str,
    max_chips: usize,
    diags: &mut Diagnostics,
) -> Vec<ChipDirectoryEntry> {
    let mut entries: Vec<ChipDirectoryEntry> = Vec::new();
    let mut dropped = 0usize;

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with(char::is_whitespace) {
            continue;
        }

        let Some(header) = parse_chip_header(line).filter(|h| h.controller.is_some()) else {
            diags.push(Diagnostic::MalformedRecord {
                source_name: source_name.to_string(),
                line_no: idx + 1,
                text: line.to_string(),
            });
            continue;
        };

        if entries.iter().any(|e| e.chip_name == header.chip_name) {
            diags.push(Diagnostic::MalformedRecord {
                source_name: source_name.to_string(),
                line_no: idx + 1,
                text: line.to_string(),
            });
            continue;
        }

        if entries.len() >= max_chips {
            dropped += 1;
            continue;
        }

        entries.push(ChipDirectoryEntry {
            chip_name: header.chip_name.to_string(),
            controller_name: header.controller.unwrap_or_default().to_string(),
            base_offset: header.base_offset,
            line_range_label: header.range_label.to_string(),
            parent: header.parent.to_string(),
        });
    }

    if dropped > 0 {
        diags.push(Diagnostic::CapacityExceeded {
            what: format!("{source_name}: chips"),
            limit: max_chips,
            dropped,
        });
    }

    debug!(source = source_name, chips = entries.len(), "parsed chip directory");
    entries
}

//! Composite-node dialect, one file per controller:
//!
//! ```text
//! gpiochip4: GPIOs 498-505, parent: platform/31000000.gpio
//! PinNode: aon_gpio_porta_7 PinName: UART_TX
//! ```
//!
//! The header supplies the chip and its base offset. Each `PinNode` id ends
//! with `_<n>`, the line number within the controller, and everything before
//! that suffix names the controller.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{ChipDirectoryEntry, PinRecord};
use crate::parse::dialect::{parse_pin_lines, PinDialect};
use crate::parse::directory::parse_chip_header;

/// Line parser for `PinNode: <node_id> PinName: <name>` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeDumpDialect;

impl PinDialect for NodeDumpDialect {
    fn name(&self) -> &'static str {
        "node-dump"
    }

    fn parse_line(&self, line: &str) -> Option<PinRecord> {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != "PinNode:" {
            return None;
        }
        let node = tokens.next()?;
        if tokens.next()? != "PinName:" {
            return None;
        }
        let pin_name = tokens.next()?;
        let (controller, line_number) = split_node_id(node)?;
        Some(PinRecord::new(pin_name, controller, line_number).with_node(node))
    }
}

/// Split `aon_gpio_porta_7` into (`aon_gpio_porta`, 7).
pub fn split_node_id(node: &str) -> Option<(&str, u32)> {
    let (prefix, suffix) = node.rsplit_once('_')?;
    if prefix.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((prefix, suffix.parse().ok()?))
}

/// One parsed node-dump file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDump {
    /// Chip described by the header line. `controller_name` comes from the
    /// header when present, otherwise from the first pin's node prefix.
    pub header: ChipDirectoryEntry,
    /// Pin records in file order.
    pub pins: Vec<PinRecord>,
}

/// Parse a node-dump file. The first non-blank line must be the chip header;
/// a file without one is reported as malformed and yields `None`.
pub fn parse_node_dump(
    text: &str,
    source_name: &str,
    max_pins: usize,
    diags: &mut Diagnostics,
) -> Option<NodeDump> {
    let Some((idx, first)) = text.lines().enumerate().find(|(_, l)| !l.trim().is_empty()) else {
        diags.push(Diagnostic::MalformedRecord {
            source_name: source_name.to_string(),
            line_no: 0,
            text: String::new(),
        });
        return None;
    };
    let Some(header) = parse_chip_header(first) else {
        diags.push(Diagnostic::MalformedRecord {
            source_name: source_name.to_string(),
            line_no: idx + 1,
            text: first.to_string(),
        });
        return None;
    };

    let body = text.lines().skip(idx + 1).collect::<Vec<_>>().join("\n");
    let pins = parse_pin_lines(&NodeDumpDialect, &body, source_name, max_pins, diags);

    let controller_name = header
        .controller
        .map(str::to_string)
        .or_else(|| pins.first().map(|p| p.controller_name.clone()))
        .unwrap_or_default();

    Some(NodeDump {
        header: ChipDirectoryEntry {
            chip_name: header.chip_name.to_string(),
            controller_name,
            base_offset: header.base_offset,
            line_range_label: header.range_label.to_string(),
            parent: header.parent.to_string(),
        },
        pins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The line number is the numeric suffix after the last underscore.
    #[test]
    fn decodes_trailing_node_suffix() {
        let pin = NodeDumpDialect
            .parse_line("PinNode: aon_gpio_porta_7 PinName: UART_TX")
            .expect("record");
        assert_eq!(pin.line_number, 7);
        assert_eq!(pin.pin_name, "UART_TX");
        assert_eq!(pin.controller_name, "aon_gpio_porta");
        assert_eq!(pin.node.as_deref(), Some("aon_gpio_porta_7"));
    }

    #[test]
    fn rejects_lines_without_numeric_suffix() {
        assert!(NodeDumpDialect.parse_line("PinNode: aon_gpio_x PinName: A").is_none());
        assert!(NodeDumpDialect.parse_line("PinNode: 7 PinName: A").is_none());
        assert!(NodeDumpDialect.parse_line("PinName: A PinNode: a_1").is_none());
        assert!(NodeDumpDialect.parse_line("PinNode: a_1").is_none());
    }

    /// The header line comes first and supplies the chip and base offset.
    #[test]
    fn parses_header_then_pins() {
        let text = "gpiochip4: GPIOs 498-505, parent: platform/31000000.gpio\n\
                    PinNode: aon_gpio_porta_7 PinName: UART_TX\n\
                    some commentary\n\
                    PinNode: aon_gpio_porta_2 PinName: i2c_sda\n";
        let mut diags = Diagnostics::new();
        let dump = parse_node_dump(text, "aon", 100, &mut diags).expect("dump");
        assert_eq!(dump.header.chip_name, "gpiochip4");
        assert_eq!(dump.header.base_offset, 498);
        assert_eq!(dump.header.controller_name, "aon_gpio_porta");
        assert_eq!(dump.pins.len(), 2);
        assert_eq!(dump.pins[1].line_number, 2);
        assert!(diags.is_empty());
    }

    /// A dump that does not start with a header yields nothing.
    #[test]
    fn missing_header_is_malformed() {
        let mut diags = Diagnostics::new();
        let dump = parse_node_dump("PinNode: a_1 PinName: X\n", "bad", 100, &mut diags);
        assert!(dump.is_none());
        assert_eq!(diags.count(|d| matches!(d, Diagnostic::MalformedRecord { .. })), 1);
    }
}

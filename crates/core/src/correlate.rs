//! Pin correlator: turns raw per-chip pin records into sorted pin tables.
//!
//! For every chip the correlator places each record at
//! `line_number + base_offset`, upper-cases the pin name, stable-sorts by
//! line number and drops later records that reuse a line number.

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{ChipDirectoryEntry, ChipPinTable, PinDescriptor, PinRecord};

/// Raw parser output for one chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChipPins {
    pub entry: ChipDirectoryEntry,
    pub pins: Vec<PinRecord>,
}

/// Correlated pin tables for every chip, plus the directory they came from.
#[derive(Debug, Clone, Default)]
pub struct PinTables {
    entries: Vec<ChipDirectoryEntry>,
    tables: Vec<ChipPinTable>,
    by_chip: HashMap<String, usize>,
}

impl PinTables {
    /// Directory entry for a chip, whether or not it has pins.
    pub fn entry(&self, chip_name: &str) -> Option<&ChipDirectoryEntry> {
        self.entries.iter().find(|e| e.chip_name == chip_name)
    }

    pub fn entries(&self) -> &[ChipDirectoryEntry] {
        &self.entries
    }

    pub fn table(&self, chip_name: &str) -> Option<&ChipPinTable> {
        self.by_chip.get(chip_name).map(|&idx| &self.tables[idx])
    }

    pub fn tables(&self) -> &[ChipPinTable] {
        &self.tables
    }

    /// Descriptor for `(chip_name, line_number)`, if the chip has one.
    pub fn lookup(&self, chip_name: &str, line_number: u32) -> Option<&PinDescriptor> {
        self.table(chip_name).and_then(|t| t.pin(line_number))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Correlate every chip. Chips are kept in input order; a chip listed twice
/// keeps its first occurrence.
pub fn correlate(chips: Vec<RawChipPins>, diags: &mut Diagnostics) -> PinTables {
    let mut out = PinTables::default();
    for RawChipPins { entry, pins } in chips {
        if out.entry(&entry.chip_name).is_some() {
            debug!(chip = %entry.chip_name, "chip already correlated, skipping");
            continue;
        }
        let table = correlate_chip(&entry, pins, diags);
        out.by_chip.insert(table.chip_name.clone(), out.tables.len());
        out.tables.push(table);
        out.entries.push(entry);
    }
    out
}

/// Build the pin table for one chip.
pub fn correlate_chip(
    entry: &ChipDirectoryEntry,
    pins: Vec<PinRecord>,
    diags: &mut Diagnostics,
) -> ChipPinTable {
    let mut descriptors: Vec<PinDescriptor> = Vec::with_capacity(pins.len());
    for pin in pins {
        let Some(absolute_pin_number) = pin.line_number.checked_add(entry.base_offset) else {
            diags.push(Diagnostic::MalformedRecord {
                source_name: entry.chip_name.clone(),
                line_no: 0,
                text: format!("{} at line {} overflows the pin space", pin.pin_name, pin.line_number),
            });
            continue;
        };
        descriptors.push(PinDescriptor {
            pin_name: pin.pin_name.to_uppercase(),
            controller_name: pin.controller_name,
            line_number: pin.line_number,
            absolute_pin_number,
            node: pin.node,
            current_function: pin.current_function,
        });
    }

    descriptors.sort_by_key(|d| d.line_number);

    let mut unique: Vec<PinDescriptor> = Vec::with_capacity(descriptors.len());
    for desc in descriptors {
        match unique.last() {
            Some(kept) if kept.line_number == desc.line_number => {
                diags.push(Diagnostic::DuplicateLineNumber {
                    chip: entry.chip_name.clone(),
                    line_number: desc.line_number,
                    kept: kept.pin_name.clone(),
                    discarded: desc.pin_name,
                });
            }
            _ => unique.push(desc),
        }
    }

    debug!(chip = %entry.chip_name, pins = unique.len(), "correlated pin table");
    ChipPinTable {
        chip_name: entry.chip_name.clone(),
        controller_name: entry.controller_name.clone(),
        base_offset: entry.base_offset,
        pins: unique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(chip: &str, base: u32) -> ChipDirectoryEntry {
        ChipDirectoryEntry {
            chip_name: chip.into(),
            controller_name: "aon_gpio_porta".into(),
            base_offset: base,
            line_range_label: format!("GPIOs {base}-{}", base + 7),
            parent: "platform/31000000.gpio".into(),
        }
    }

    /// Absolute pin numbers are the line number plus the chip base.
    #[test]
    fn absolute_number_is_line_plus_base() {
        let mut diags = Diagnostics::new();
        let table = correlate_chip(
            &entry("gpiochip4", 498),
            vec![PinRecord::new("uart_tx", "aon_gpio_porta", 7)],
            &mut diags,
        );
        assert_eq!(table.pins[0].absolute_pin_number, 505);
        assert_eq!(table.pins[0].pin_name, "UART_TX");
    }

    /// Pins sort by line number and a repeated line number keeps the first pin.
    #[test]
    fn sorts_and_keeps_first_duplicate() {
        let mut diags = Diagnostics::new();
        let pins = vec![
            PinRecord::new("c", "x", 3),
            PinRecord::new("first", "x", 1),
            PinRecord::new("a", "x", 0),
            PinRecord::new("second", "x", 1),
        ];
        let table = correlate_chip(&entry("gpiochip0", 0), pins, &mut diags);
        let lines: Vec<_> = table.pins.iter().map(|p| p.line_number).collect();
        assert_eq!(lines, [0, 1, 3]);
        assert_eq!(table.pin(1).map(|p| p.pin_name.as_str()), Some("FIRST"));
        assert!(diags.iter().any(|d| matches!(
            d,
            Diagnostic::DuplicateLineNumber { line_number: 1, .. }
        )));
    }

    #[test]
    fn lookup_goes_through_chip_name() {
        let mut diags = Diagnostics::new();
        let tables = correlate(
            vec![
                RawChipPins { entry: entry("gpiochip0", 0), pins: vec![] },
                RawChipPins {
                    entry: entry("gpiochip4", 498),
                    pins: vec![PinRecord::new("uart_tx", "aon_gpio_porta", 7)],
                },
            ],
            &mut diags,
        );
        assert_eq!(tables.lookup("gpiochip4", 7).map(|p| p.absolute_pin_number), Some(505));
        assert!(tables.lookup("gpiochip0", 7).is_none());
        assert!(tables.lookup("gpiochip9", 7).is_none());
        assert_eq!(tables.entry("gpiochip0").map(|e| e.base_offset), Some(0));
    }
}

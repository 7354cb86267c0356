use pinmap_core::correlate::{correlate, PinTables, RawChipPins};
use pinmap_core::diagnostics::{Diagnostic, Diagnostics};
use pinmap_core::model::{ChipDirectoryEntry, KernelChip, PinRecord};
use pinmap_core::provider::{ProviderError, Snapshot, SnapshotChip, SnapshotProvider};
use pinmap_core::scan::{scan, LineRow, RowSink, ScanOptions};

/// Sink recording `(chip, offset, pin name)` per row and every banner.
#[derive(Default)]
struct Recorder {
    banners: Vec<(String, Option<u32>)>,
    rows: Vec<(String, u32, Option<String>)>,
}

impl RowSink for Recorder {
    fn begin_chip(&mut self, chip: &KernelChip, entry: Option<&ChipDirectoryEntry>) {
        self.banners.push((chip.name.clone(), entry.map(|e| e.base_offset)));
    }

    fn row(&mut self, row: &LineRow<'_>) {
        self.rows.push((
            row.chip.name.clone(),
            row.line.offset,
            row.pin.map(|p| p.pin_name.clone()),
        ));
    }
}

fn provider() -> SnapshotProvider {
    SnapshotProvider::new(Snapshot {
        chips: vec![
            SnapshotChip::with_line_names("gpiochip0", &["LED", "BTN", ""]),
            SnapshotChip::with_line_names(
                "gpiochip4",
                &["AON0", "", "", "", "", "", "", "UART_TX"],
            ),
        ],
    })
}

fn tables() -> PinTables {
    let entry = ChipDirectoryEntry {
        chip_name: "gpiochip4".into(),
        controller_name: "aon_gpio_porta".into(),
        base_offset: 498,
        line_range_label: "GPIOs 498-505".into(),
        parent: "platform/31000000.gpio".into(),
    };
    let pins = vec![PinRecord::new("uart_tx", "aon_gpio_porta", 7).with_node("aon_gpio_porta_7")];
    correlate(vec![RawChipPins { entry, pins }], &mut Diagnostics::new())
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Listing everything visits every chip and attaches pins where the tables
/// have them.
#[test]
fn listing_all_lines_emits_every_line_with_enrichment() {
    let mut sink = Recorder::default();
    let report = scan(&provider(), &tables(), &[], &ScanOptions::default(), &mut sink).unwrap();
    assert!(report.success);
    assert_eq!(report.rows, 11);
    assert_eq!(report.resolve.num_found, 11);
    assert_eq!(sink.banners, [("gpiochip0".to_string(), None), ("gpiochip4".to_string(), Some(498))]);
    assert_eq!(sink.rows[10], ("gpiochip4".to_string(), 7, Some("UART_TX".to_string())));
    // No enrichment for gpiochip0, yet every line is listed.
    assert!(sink.rows[..3].iter().all(|(chip, _, pin)| chip == "gpiochip0" && pin.is_none()));
}

/// UART_TX resolves to offset 7 on the second chip.
#[test]
fn resolving_uart_tx_by_name_matches_offset_seven() {
    let mut sink = Recorder::default();
    let report =
        scan(&provider(), &tables(), &ids(&["UART_TX"]), &ScanOptions::default(), &mut sink)
            .unwrap();
    assert!(report.success);
    assert_eq!(report.resolve.num_found, 1);
    assert_eq!(report.resolve.requests[0].matched_offset, Some(7));
    assert_eq!(report.resolve.requests[0].matched_chip_index, Some(1));
    assert_eq!(sink.rows, [("gpiochip4".to_string(), 7, Some("UART_TX".to_string()))]);
}

#[test]
fn every_request_found_reports_success() {
    let mut sink = Recorder::default();
    let report = scan(
        &provider(),
        &tables(),
        &ids(&["BTN", "UART_TX", "LED"]),
        &ScanOptions::default(),
        &mut sink,
    )
    .unwrap();
    assert!(report.success);
    assert_eq!(report.resolve.num_found, 3);
    assert_eq!(sink.rows.len(), 3);
}

/// One unmatched request fails the run without hiding the rows that matched.
#[test]
fn unresolved_request_fails_but_keeps_other_rows() {
    let mut sink = Recorder::default();
    let report =
        scan(&provider(), &tables(), &ids(&["LED", "MISSING"]), &ScanOptions::default(), &mut sink)
            .unwrap();
    assert!(!report.success);
    assert_eq!(sink.rows.len(), 1);
    assert!(report.resolve.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::UnresolvedRequest { identifier } if identifier == "MISSING"
    )));
}

/// A name used twice on one chip is ambiguous under `--strict`.
#[test]
fn strict_scan_flags_duplicate_names() {
    let provider = SnapshotProvider::new(Snapshot {
        chips: vec![SnapshotChip::with_line_names("gpiochip0", &["DUP", "x", "DUP"])],
    });
    let opts = ScanOptions { strict: true, ..Default::default() };
    let mut sink = Recorder::default();
    let report = scan(&provider, &PinTables::default(), &ids(&["DUP"]), &opts, &mut sink).unwrap();
    assert!(!report.success);
    assert_eq!(report.resolve.num_found, 1);
    assert_eq!(report.resolve.requests[0].matched_offset, Some(0));
    assert_eq!(sink.rows.len(), 1);
    assert!(report.resolve.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::AmbiguousNameMatch { first_offset: 0, second_offset: 2, .. }
    )));
}

/// Offsets on a scoped chip are emitted in offset order, not request order.
/// Naming one line twice emits it once and does not count as two finds.
#[test]
fn repeated_request_for_one_line_fails() {
    let mut sink = Recorder::default();
    let report =
        scan(&provider(), &tables(), &ids(&["LED", "LED"]), &ScanOptions::default(), &mut sink)
            .unwrap();
    assert!(!report.success);
    assert_eq!(report.rows, 1);
    assert_eq!(report.resolve.num_found, 1);
    assert!(report.resolve.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::SameLineRequest { chip, offset: 0, .. } if chip == "gpiochip0"
    )));
}

#[test]
fn offsets_resolve_on_scoped_chip() {
    let opts = ScanOptions { chip: Some("4".into()), ..Default::default() };
    let mut sink = Recorder::default();
    let report = scan(&provider(), &tables(), &ids(&["7", "0"]), &opts, &mut sink).unwrap();
    assert!(report.success);
    let offsets: Vec<_> = sink.rows.iter().map(|r| r.1).collect();
    assert_eq!(offsets, [0, 7]);
}

/// Scoping to a chip that does not exist is fatal.
#[test]
fn unknown_chip_scope_is_an_error() {
    let opts = ScanOptions { chip: Some("gpiochip9".into()), ..Default::default() };
    let err = scan(&provider(), &tables(), &[], &opts, &mut Recorder::default()).unwrap_err();
    assert!(matches!(err, ProviderError::NoSuchChip(_)));
}

mod support;

use gpio_pinmap::commands::{load_scan_config, render_scan, InfoOptions};
use pinmap_core::config::{DialectSelection, ScanConfig};
use pinmap_core::provider::SnapshotProvider;
use pinmap_core::sources::load_enrichment;
use support::{node_dump_fixture, write};

/// Explicit flags win over the config file, which wins over defaults.
#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("pinmap.json");
    write(&config, r#"{"debugfs_root": "/from/file", "dialect": "pinctrl", "max_chips": 4}"#);

    let loaded = load_scan_config(Some(&config), None, None).expect("load");
    assert_eq!(loaded.dialect, DialectSelection::Pinctrl);
    assert_eq!(loaded.max_chips, 4);

    let overridden = load_scan_config(
        Some(&config),
        Some(dir.path()),
        Some(DialectSelection::NodeDump),
    )
    .expect("load");
    assert_eq!(overridden.debugfs_root, dir.path());
    assert_eq!(overridden.dialect, DialectSelection::NodeDump);
    assert_eq!(overridden.max_chips, 4);
}

/// Config files are JSON or YAML; anything else is rejected up front.
#[test]
fn unsupported_config_extension_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("pinmap.toml");
    write(&config, "debugfs_root = '/x'\n");
    let err = load_scan_config(Some(&config), None, None).unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported config format"), "{err:#}");
}

/// Resolved rows come out in scan order, each joined with its pin.
#[test]
fn render_scan_writes_text_and_reports_success() {
    let fixture = node_dump_fixture();
    let enrichment = load_enrichment(&ScanConfig::with_root(fixture.debugfs()));
    let provider = SnapshotProvider::from_json_file(&fixture.snapshot()).expect("snapshot");

    let opts = InfoOptions { lines: vec!["UART_TX".into(), "PWR_KEY".into()], ..Default::default() };
    let mut out = Vec::new();
    let report = render_scan(&provider, &enrichment.tables, enrichment.dialect, &opts, &mut out)
        .expect("scan");
    assert!(report.success);
    assert_eq!(report.resolve.num_found, 2);

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("gpiochip4 0\t\"PWR_KEY\""));
    assert!(lines[0].ends_with("498"), "got {:?}", lines[0]);
    assert!(lines[1].starts_with("gpiochip4 7\t"));
}

/// An unmatched request fails the run and JSON output is an empty array.
#[test]
fn render_scan_reports_unresolved_requests() {
    let fixture = node_dump_fixture();
    let enrichment = load_enrichment(&ScanConfig::with_root(fixture.debugfs()));
    let provider = SnapshotProvider::from_json_file(&fixture.snapshot()).expect("snapshot");

    let opts = InfoOptions { lines: vec!["MISSING".into()], json: true, ..Default::default() };
    let mut out = Vec::new();
    let report = render_scan(&provider, &enrichment.tables, enrichment.dialect, &opts, &mut out)
        .expect("scan");
    assert!(!report.success);
    assert_eq!(report.resolve.diagnostics.len(), 1);
    assert_eq!(String::from_utf8(out).expect("utf8").trim(), "[]");
}

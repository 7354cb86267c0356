use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use pinmap_core::config::{Dialect, DialectSelection};
use pinmap_core::correlate::PinTables;
use pinmap_core::provider::{CdevProvider, LineInfoProvider, SnapshotProvider};
use pinmap_core::scan::{scan, ScanOptions, ScanReport};
use pinmap_core::sources::load_enrichment;
use tracing::debug;

use crate::commands::load_scan_config;
use crate::render::{JsonSink, TextSink, TextStyle};

/// Everything the `gpio-pinmap` invocation asked for.
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    /// Requested line names or offsets; empty lists every line.
    pub lines: Vec<String>,
    pub chip: Option<String>,
    pub by_name: bool,
    pub strict: bool,
    pub unquoted: bool,
    pub json: bool,
    pub dialect: Option<DialectSelection>,
    pub debugfs: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Read line metadata from a JSON snapshot instead of `/dev/gpiochip*`.
    pub snapshot: Option<PathBuf>,
}

impl InfoOptions {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions { chip: self.chip.clone(), by_name: self.by_name, strict: self.strict }
    }
}

/// Run the listing and write rows to stdout. Returns whether the run
/// succeeded: every request resolved exactly once and every chip was read.
pub fn info_command(opts: &InfoOptions) -> Result<bool> {
    let config =
        load_scan_config(opts.config.as_deref(), opts.debugfs.as_deref(), opts.dialect)?;
    let enrichment = load_enrichment(&config);
    debug!(
        dialect = ?enrichment.dialect,
        chips = enrichment.tables.tables().len(),
        problems = enrichment.diagnostics.len(),
        "enrichment loaded"
    );

    let stdout = io::stdout();
    let report = match &opts.snapshot {
        Some(path) => {
            let provider = SnapshotProvider::from_json_file(path)?;
            render_scan(&provider, &enrichment.tables, enrichment.dialect, opts, stdout.lock())?
        }
        None => {
            render_scan(&CdevProvider, &enrichment.tables, enrichment.dialect, opts, stdout.lock())?
        }
    };

    report_problems(&report);
    Ok(report.success)
}

/// Scan `provider` and render the rows to `out` as text or JSON. `dialect`
/// picks the pin columns of the text heading.
pub fn render_scan<W: Write>(
    provider: &dyn LineInfoProvider,
    tables: &PinTables,
    dialect: Dialect,
    opts: &InfoOptions,
    out: W,
) -> Result<ScanReport> {
    let scan_opts = opts.scan_options();
    let scan_context = || match &opts.chip {
        Some(chip) => format!("Failed to scan GPIO chip '{chip}'"),
        None => "Failed to enumerate GPIO chips".to_string(),
    };

    let report = if opts.json {
        let mut sink = JsonSink::new();
        let report = scan(provider, tables, &opts.lines, &scan_opts, &mut sink)
            .with_context(scan_context)?;
        sink.write_to(out).context("Failed to write JSON output")?;
        report
    } else {
        let style =
            TextStyle { unquoted: opts.unquoted, resolve_mode: !opts.lines.is_empty(), dialect };
        let mut sink = TextSink::new(out, style);
        let report = scan(provider, tables, &opts.lines, &scan_opts, &mut sink)
            .with_context(scan_context)?;
        sink.finish().context("Failed to write output")?;
        report
    };

    debug!(
        chips = report.chips_scanned,
        rows = report.rows,
        found = report.resolve.num_found,
        "scan finished"
    );
    Ok(report)
}

/// Resolve problems are the answer to the user's question, so they are
/// printed regardless of the log filter.
fn report_problems(report: &ScanReport) {
    for diagnostic in report.resolve.diagnostics.iter() {
        eprintln!("gpio-pinmap: {diagnostic}");
    }
}

//! The scan driver: walks every chip and line offset, asks the resolver
//! whether each line is wanted and hands wanted lines, joined with their pin
//! descriptor, to a [`RowSink`].

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::correlate::PinTables;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{ChipDirectoryEntry, KernelChip, KernelLine, PinDescriptor};
use crate::provider::{ChipReader, LineInfoProvider, ProviderError};
use crate::resolve::{LineResolver, ResolveOptions, ResolveSummary};

/// What to scan and how to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Restrict the scan to one chip id.
    pub chip: Option<String>,
    pub by_name: bool,
    pub strict: bool,
}

/// One emitted line.
#[derive(Debug, Clone, Serialize)]
pub struct LineRow<'a> {
    pub chip: &'a KernelChip,
    #[serde(skip)]
    pub chip_index: usize,
    pub line: KernelLine,
    pub pin: Option<&'a PinDescriptor>,
}

/// Receiver of scan output.
pub trait RowSink {
    /// Called once per opened chip before any of its rows.
    fn begin_chip(&mut self, _chip: &KernelChip, _entry: Option<&ChipDirectoryEntry>) {}

    fn row(&mut self, row: &LineRow<'_>);
}

/// Result of a full scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub chips_scanned: usize,
    pub rows: usize,
    pub resolve: ResolveSummary,
    /// Chip-level problems (chips that could not be opened or read).
    pub diagnostics: Diagnostics,
    /// Every chip was read and every request resolved exactly once.
    pub success: bool,
}

/// Scan chips from `provider`.
///
/// Chips that cannot be opened are reported and skipped, except when the
/// scan is restricted to a single chip: then the failure is returned.
pub fn scan(
    provider: &dyn LineInfoProvider,
    tables: &PinTables,
    identifiers: &[String],
    opts: &ScanOptions,
    sink: &mut dyn RowSink,
) -> Result<ScanReport, ProviderError> {
    let scope = opts.chip.as_deref();
    let paths = provider.chip_paths(scope)?;
    let mut resolver = LineResolver::new(
        identifiers,
        ResolveOptions { by_name: opts.by_name, strict: opts.strict, chip_scoped: scope.is_some() },
    );
    let mut diags = Diagnostics::new();
    let mut rows = 0usize;
    let mut chips_scanned = 0usize;

    for (chip_index, path) in paths.iter().enumerate() {
        let chip = match provider.open(path) {
            Ok(chip) => chip,
            Err(e) if scope.is_some() => return Err(e),
            Err(e) => {
                push_unavailable(&mut diags, path, &e);
                continue;
            }
        };
        match scan_chip(chip.as_ref(), chip_index, tables, &mut resolver, sink) {
            Ok(emitted) => {
                rows += emitted;
                chips_scanned += 1;
            }
            Err(e) => push_unavailable(&mut diags, path, &e),
        }
    }

    let resolve = resolver.finish();
    let success = diags.is_empty() && resolve.success;
    Ok(ScanReport { chips_scanned, rows, resolve, diagnostics: diags, success })
}

fn push_unavailable(diags: &mut Diagnostics, path: &Path, err: &ProviderError) {
    diags.push(Diagnostic::SourceUnavailable { path: path.to_path_buf(), reason: err.to_string() });
}

fn scan_chip(
    chip: &dyn ChipReader,
    chip_index: usize,
    tables: &PinTables,
    resolver: &mut LineResolver,
    sink: &mut dyn RowSink,
) -> Result<usize, ProviderError> {
    let info = chip.info()?;
    debug!(chip = %info.name, lines = info.num_lines, "scanning chip");
    let mut announced = false;
    let mut emitted = 0usize;

    for offset in 0..info.num_lines {
        if resolver.is_done() {
            break;
        }
        let line = chip.line_info(offset)?;
        if !resolver.resolve_line(chip_index, &info.name, offset, line.name.as_deref()) {
            continue;
        }
        if !announced {
            sink.begin_chip(&info, tables.entry(&info.name));
            announced = true;
        }
        let pin = tables.lookup(&info.name, offset);
        sink.row(&LineRow { chip: &info, chip_index, line, pin });
        emitted += 1;
    }
    Ok(emitted)
}

//! Loading the debugfs dumps from disk.
//!
//! Every source is optional enrichment: a file or directory that cannot be
//! read is reported as `SourceUnavailable` and the affected chips simply end
//! up without pins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Dialect, ScanConfig};
use crate::correlate::{correlate, PinTables, RawChipPins};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{ChipDirectoryEntry, PinRecord};
use crate::parse::{
    apply_pinmux, parse_chip_directory, parse_node_dump, parse_pin_lines, PinctrlPinsDialect,
};

/// Correlated enrichment data for a run.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub dialect: Dialect,
    pub tables: PinTables,
    pub diagnostics: Diagnostics,
}

/// Read the chip directory and the configured dialect's dumps, then correlate.
pub fn load_enrichment(config: &ScanConfig) -> Enrichment {
    let mut diags = Diagnostics::new();
    let dialect = config.resolve_dialect();
    info!(?dialect, root = %config.debugfs_root.display(), "loading pin enrichment");

    let directory = load_chip_directory(config, &mut diags);
    let raw = match dialect {
        Dialect::NodeDump => load_node_dumps(config, directory, &mut diags),
        Dialect::Pinctrl => load_pinctrl(config, directory, &mut diags),
    };
    let tables = correlate(raw, &mut diags);
    Enrichment { dialect, tables, diagnostics: diags }
}

/// Parse `<debugfs>/gpio`. An unreadable file yields an empty directory.
pub fn load_chip_directory(
    config: &ScanConfig,
    diags: &mut Diagnostics,
) -> Vec<ChipDirectoryEntry> {
    let path = config.chip_directory_path();
    match read_source(&path, diags) {
        Some(text) => parse_chip_directory(&text, &source_name(&path), config.max_chips, diags),
        None => Vec::new(),
    }
}

fn read_source(path: &Path, diags: &mut Diagnostics) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            diags.push(Diagnostic::SourceUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}

fn source_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
}

/// Sorted children of `dir` passing `keep`, or `None` when it cannot be read.
fn list_dir(dir: &Path, keep: fn(&Path) -> bool, diags: &mut Diagnostics) -> Option<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            diags.push(Diagnostic::SourceUnavailable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return None;
        }
    };
    let mut paths: Vec<PathBuf> =
        entries.filter_map(|e| e.ok()).map(|e| e.path()).filter(|p| keep(p)).collect();
    paths.sort();
    Some(paths)
}

fn load_node_dumps(
    config: &ScanConfig,
    directory: Vec<ChipDirectoryEntry>,
    diags: &mut Diagnostics,
) -> Vec<RawChipPins> {
    let mut chips: Vec<RawChipPins> =
        directory.into_iter().map(|entry| RawChipPins { entry, pins: Vec::new() }).collect();

    let Some(files) = list_dir(&config.node_dump_dir(), |p| p.is_file(), diags) else {
        return chips;
    };

    for path in files {
        let Some(text) = read_source(&path, diags) else {
            continue;
        };
        let name = source_name(&path);
        let Some(dump) = parse_node_dump(&text, &name, config.max_pins_per_chip, diags) else {
            continue;
        };

        match chips.iter_mut().find(|c| c.entry.chip_name == dump.header.chip_name) {
            Some(chip) => {
                if chip.entry.base_offset != dump.header.base_offset {
                    warn!(
                        chip = %chip.entry.chip_name,
                        directory = chip.entry.base_offset,
                        dump = dump.header.base_offset,
                        "base offset differs between chip directory and node dump; using dump"
                    );
                    chip.entry.base_offset = dump.header.base_offset;
                }
                if chip.entry.controller_name.is_empty() {
                    chip.entry.controller_name = dump.header.controller_name;
                }
                merge_capped(chip, dump.pins, config.max_pins_per_chip, diags);
            }
            None => {
                debug!(chip = %dump.header.chip_name, source = %name, "chip only in node dump");
                chips.push(RawChipPins { entry: dump.header, pins: dump.pins });
            }
        }
    }
    chips
}

/// Append pins from a further dump of `chip`, holding the per-chip ceiling
/// across files.
fn merge_capped(
    chip: &mut RawChipPins,
    mut pins: Vec<PinRecord>,
    max_pins: usize,
    diags: &mut Diagnostics,
) {
    let room = max_pins.saturating_sub(chip.pins.len());
    if pins.len() > room {
        let dropped = pins.len() - room;
        pins.truncate(room);
        diags.push(Diagnostic::CapacityExceeded {
            what: format!("{}: pins", chip.entry.chip_name),
            limit: max_pins,
            dropped,
        });
    }
    chip.pins.extend(pins);
}

/// Raw text of one pinctrl device directory.
struct PinctrlDevice {
    name: String,
    pins: String,
    pinmux: Option<String>,
}

fn load_pinctrl(
    config: &ScanConfig,
    directory: Vec<ChipDirectoryEntry>,
    diags: &mut Diagnostics,
) -> Vec<RawChipPins> {
    let devices: Vec<PinctrlDevice> = list_dir(&config.pinctrl_dir(), |p| p.is_dir(), diags)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|dir| {
            let pins = read_source(&dir.join("pins"), diags)?;
            let pinmux = read_source(&dir.join("pinmux-pins"), diags);
            Some(PinctrlDevice { name: source_name(&dir), pins, pinmux })
        })
        .collect();

    directory
        .into_iter()
        .map(|entry| {
            let dialect = PinctrlPinsDialect::new(entry.controller_name.clone());
            let mut pins = Vec::new();
            for device in &devices {
                let room = config.max_pins_per_chip.saturating_sub(pins.len());
                let source = format!("{}/pins", device.name);
                let mut found = parse_pin_lines(&dialect, &device.pins, &source, room, diags);
                if found.is_empty() {
                    continue;
                }
                if let Some(pinmux) = &device.pinmux {
                    apply_pinmux(&mut found, pinmux, &format!("{}/pinmux-pins", device.name));
                }
                pins.extend(found);
            }
            RawChipPins { entry, pins }
        })
        .collect()
}

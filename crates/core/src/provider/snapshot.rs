//! In-memory chips, optionally loaded from a JSON file, for running without
//! hardware.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{KernelChip, KernelLine};
use crate::provider::{chip_path_from_id, ChipReader, LineInfoProvider, ProviderError, DEV_DIR};

/// Serializable description of a set of chips.
///
/// ```json
/// {"chips": [{"name": "gpiochip0", "label": "ctrl", "lines": [{"name": "LED0"}]}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub chips: Vec<SnapshotChip>,
}

/// One chip in a snapshot. Line offsets are taken from list position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotChip {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub lines: Vec<KernelLine>,
}

impl SnapshotChip {
    /// Chip whose lines carry the given names, in offset order.
    pub fn with_line_names(name: impl Into<String>, names: &[&str]) -> Self {
        let lines = names
            .iter()
            .enumerate()
            .map(|(offset, n)| {
                let line = KernelLine::new(offset as u32);
                if n.is_empty() {
                    line
                } else {
                    line.named(*n)
                }
            })
            .collect();
        Self { name: name.into(), label: String::new(), lines }
    }
}

/// In-memory line metadata provider.
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: Snapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a JSON snapshot from disk.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot at {}", path.display()))?;
        let snapshot: Snapshot =
            serde_json::from_str(&body).context("Failed to parse snapshot JSON")?;
        Ok(Self::new(snapshot))
    }

    fn chip_by_path(&self, path: &Path) -> Option<&SnapshotChip> {
        let name = path.file_name()?.to_str()?;
        self.snapshot.chips.iter().find(|c| c.name == name)
    }
}

impl LineInfoProvider for SnapshotProvider {
    fn chip_paths(&self, scope: Option<&str>) -> Result<Vec<PathBuf>, ProviderError> {
        match scope {
            Some(id) => {
                let path = chip_path_from_id(id);
                match self.chip_by_path(&path) {
                    Some(chip) => Ok(vec![Path::new(DEV_DIR).join(&chip.name)]),
                    None => Err(ProviderError::NoSuchChip(id.to_string())),
                }
            }
            None => {
                Ok(self.snapshot.chips.iter().map(|c| Path::new(DEV_DIR).join(&c.name)).collect())
            }
        }
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ChipReader + '_>, ProviderError> {
        match self.chip_by_path(path) {
            Some(chip) => Ok(Box::new(SnapshotChipReader { chip })),
            None => Err(ProviderError::Open {
                path: path.to_path_buf(),
                reason: "no such chip in snapshot".to_string(),
            }),
        }
    }
}

struct SnapshotChipReader<'a> {
    chip: &'a SnapshotChip,
}

impl ChipReader for SnapshotChipReader<'_> {
    fn info(&self) -> Result<KernelChip, ProviderError> {
        Ok(KernelChip {
            name: self.chip.name.clone(),
            label: self.chip.label.clone(),
            num_lines: self.chip.lines.len() as u32,
        })
    }

    fn line_info(&self, offset: u32) -> Result<KernelLine, ProviderError> {
        let line = self.chip.lines.get(offset as usize).ok_or_else(|| ProviderError::LineInfo {
            chip: self.chip.name.clone(),
            offset,
            reason: "offset out of range".to_string(),
        })?;
        Ok(KernelLine { offset, ..line.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SnapshotProvider {
        SnapshotProvider::new(Snapshot {
            chips: vec![
                SnapshotChip::with_line_names("gpiochip0", &["A", ""]),
                SnapshotChip::with_line_names("gpiochip4", &["B"]),
            ],
        })
    }

    /// A chip scope narrows enumeration to that one chip.
    #[test]
    fn scope_selects_one_chip() {
        let p = provider();
        assert_eq!(p.chip_paths(None).unwrap().len(), 2);
        assert_eq!(p.chip_paths(Some("4")).unwrap(), [PathBuf::from("/dev/gpiochip4")]);
        assert!(matches!(p.chip_paths(Some("7")), Err(ProviderError::NoSuchChip(_))));
    }

    /// Snapshot lines get their offset from their position in the list.
    #[test]
    fn lines_take_offsets_from_position() {
        let p = provider();
        let chip = p.open(Path::new("/dev/gpiochip0")).unwrap();
        assert_eq!(chip.info().unwrap().num_lines, 2);
        let line = chip.line_info(1).unwrap();
        assert_eq!(line.offset, 1);
        assert_eq!(line.name, None);
        assert!(chip.line_info(2).is_err());
    }

    #[test]
    fn parses_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        std::fs::write(
            &path,
            r#"{"chips":[{"name":"gpiochip1","lines":[{"name":"LED","direction":"output","used":true,"consumer":"leds"}]}]}"#,
        )
        .unwrap();
        let p = SnapshotProvider::from_json_file(&path).unwrap();
        let chip = p.open(Path::new("/dev/gpiochip1")).unwrap();
        let line = chip.line_info(0).unwrap();
        assert_eq!(line.consumer.as_deref(), Some("leds"));
        assert_eq!(line.direction, crate::model::LineDirection::Output);
    }
}

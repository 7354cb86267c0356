//! Line metadata from the GPIO character devices via `gpiocdev`.

use std::path::{Path, PathBuf};

use gpiocdev::chip::Chip;
use gpiocdev::line::{Bias, Direction, Drive, EdgeDetection};

use crate::model::{KernelChip, KernelLine, LineBias, LineDirection, LineDrive, LineEdges};
use crate::provider::{chip_number, chip_path_from_id, ChipReader, LineInfoProvider, ProviderError};

/// Line metadata read from the kernel GPIO character devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CdevProvider;

impl LineInfoProvider for CdevProvider {
    fn chip_paths(&self, scope: Option<&str>) -> Result<Vec<PathBuf>, ProviderError> {
        match scope {
            Some(id) => {
                let path = chip_path_from_id(id);
                if !path.exists() {
                    return Err(ProviderError::NoSuchChip(id.to_string()));
                }
                Ok(vec![path])
            }
            None => {
                let mut paths = gpiocdev::chip::chips()
                    .map_err(|e| ProviderError::Enumerate(e.to_string()))?;
                paths.sort_by_key(|p| chip_number(p));
                Ok(paths)
            }
        }
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ChipReader + '_>, ProviderError> {
        let chip = Chip::from_path(path).map_err(|e| ProviderError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(CdevChip { chip, path: path.to_path_buf() }))
    }
}

struct CdevChip {
    chip: Chip,
    path: PathBuf,
}

impl ChipReader for CdevChip {
    fn info(&self) -> Result<KernelChip, ProviderError> {
        let info = self.chip.info().map_err(|e| ProviderError::ChipInfo {
            chip: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(KernelChip { name: info.name, label: info.label, num_lines: info.num_lines })
    }

    fn line_info(&self, offset: u32) -> Result<KernelLine, ProviderError> {
        let li = self.chip.line_info(offset).map_err(|e| ProviderError::LineInfo {
            chip: self.path.display().to_string(),
            offset,
            reason: e.to_string(),
        })?;
        Ok(KernelLine {
            offset,
            name: non_empty(li.name),
            consumer: non_empty(li.consumer),
            used: li.used,
            direction: match li.direction {
                Direction::Input => LineDirection::Input,
                Direction::Output => LineDirection::Output,
            },
            active_low: li.active_low,
            bias: li.bias.map(|b| match b {
                Bias::PullUp => LineBias::PullUp,
                Bias::PullDown => LineBias::PullDown,
                Bias::Disabled => LineBias::Disabled,
            }),
            drive: li.drive.map(|d| match d {
                Drive::PushPull => LineDrive::PushPull,
                Drive::OpenDrain => LineDrive::OpenDrain,
                Drive::OpenSource => LineDrive::OpenSource,
            }),
            edges: li.edge_detection.map(|e| match e {
                EdgeDetection::RisingEdge => LineEdges::Rising,
                EdgeDetection::FallingEdge => LineEdges::Falling,
                EdgeDetection::BothEdges => LineEdges::Both,
            }),
            debounce_us: li.debounce_period.map(|d| d.as_micros() as u64),
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

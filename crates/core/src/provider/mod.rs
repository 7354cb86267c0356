//! The line metadata capability: enumerating GPIO chips and reading per-line
//! metadata from them.
//!
//! `CdevProvider` talks to the kernel through the GPIO character device.
//! `SnapshotProvider` serves chips from memory (or a JSON snapshot) so the
//! rest of the crate can be exercised without hardware.

#[cfg(feature = "cdev")]
pub mod cdev;
pub mod snapshot;

#[cfg(feature = "cdev")]
pub use cdev::CdevProvider;
pub use snapshot::{Snapshot, SnapshotChip, SnapshotProvider};

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{KernelChip, KernelLine};

/// Directory holding the GPIO character devices.
pub const DEV_DIR: &str = "/dev";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("cannot find GPIO chip character device '{0}'")]
    NoSuchChip(String),

    #[error("unable to enumerate GPIO chips: {0}")]
    Enumerate(String),

    #[error("unable to open chip '{path}': {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("unable to read info from chip {chip}: {reason}")]
    ChipInfo { chip: String, reason: String },

    #[error("unable to read info for line {offset} from {chip}: {reason}")]
    LineInfo { chip: String, offset: u32, reason: String },
}

/// An opened chip.
pub trait ChipReader {
    fn info(&self) -> Result<KernelChip, ProviderError>;

    fn line_info(&self, offset: u32) -> Result<KernelLine, ProviderError>;
}

/// Source of chips and their line metadata.
pub trait LineInfoProvider {
    /// Chip paths to scan, in scan order. With a scope only that chip is
    /// returned, or `NoSuchChip` when it does not exist.
    fn chip_paths(&self, scope: Option<&str>) -> Result<Vec<PathBuf>, ProviderError>;

    fn open(&self, path: &Path) -> Result<Box<dyn ChipReader + '_>, ProviderError>;
}

/// Map a user chip id to a device path: `4` is `/dev/gpiochip4`, anything
/// with a `/` is a path, any other word is a name under `/dev`.
pub fn chip_path_from_id(id: &str) -> PathBuf {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Path::new(DEV_DIR).join(format!("gpiochip{id}"))
    } else if id.contains('/') {
        PathBuf::from(id)
    } else {
        Path::new(DEV_DIR).join(id)
    }
}

/// Sort key putting `gpiochip2` before `gpiochip10`.
pub(crate) fn chip_number(path: &Path) -> (u32, String) {
    let name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let number = name
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(u32::MAX);
    (number, name)
}

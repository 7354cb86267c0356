use std::path::Path;

use anyhow::Result;
use pinmap_core::config::{load_config, DialectSelection, ScanConfig};

/// Build the scan config: defaults or the file at `config_path`, then the
/// environment, then explicit flags.
pub fn load_scan_config(
    config_path: Option<&Path>,
    debugfs: Option<&Path>,
    dialect: Option<DialectSelection>,
) -> Result<ScanConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ScanConfig::default(),
    };
    config.apply_env();
    if let Some(root) = debugfs {
        config.debugfs_root = root.to_path_buf();
    }
    if let Some(dialect) = dialect {
        config.dialect = dialect;
    }
    Ok(config)
}

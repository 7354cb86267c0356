//! Scan configuration: where the debugfs dumps live, which dialect to read
//! and the safety ceilings applied while parsing.
//!
//! Values are layered: defaults, then an optional JSON/YAML file, then the
//! `GPIO_PINMAP_DEBUGFS` environment variable. Front-ends apply their own
//! flags on top.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the debugfs mount point.
pub const DEBUGFS_ENV: &str = "GPIO_PINMAP_DEBUGFS";

pub const DEFAULT_DEBUGFS_ROOT: &str = "/sys/kernel/debug";
pub const DEFAULT_MAX_CHIPS: usize = 100;
pub const DEFAULT_MAX_PINS_PER_CHIP: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown dialect '{0}'. Allowed: auto, node-dump, pinctrl")]
    UnknownDialect(String),

    #[error("Unsupported config format '{0}'. Allowed: json, yaml, yml")]
    UnsupportedFormat(String),
}

/// A concrete debug-text dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// `<debugfs>/gpio_debug/*`: `PinNode: ... PinName: ...` files.
    NodeDump,
    /// `<debugfs>/pinctrl/*/{pins,pinmux-pins}`.
    Pinctrl,
}

/// Dialect as configured, possibly left to detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectSelection {
    #[default]
    Auto,
    NodeDump,
    Pinctrl,
}

impl FromStr for DialectSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DialectSelection::Auto),
            "node-dump" => Ok(DialectSelection::NodeDump),
            "pinctrl" => Ok(DialectSelection::Pinctrl),
            other => Err(ConfigError::UnknownDialect(other.to_string())),
        }
    }
}

/// Settings for loading enrichment sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// debugfs mount point.
    pub debugfs_root: PathBuf,
    pub dialect: DialectSelection,
    /// Ceiling on chips read from the chip directory.
    pub max_chips: usize,
    /// Ceiling on pin records kept per chip.
    pub max_pins_per_chip: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            debugfs_root: PathBuf::from(DEFAULT_DEBUGFS_ROOT),
            dialect: DialectSelection::Auto,
            max_chips: DEFAULT_MAX_CHIPS,
            max_pins_per_chip: DEFAULT_MAX_PINS_PER_CHIP,
        }
    }
}

impl ScanConfig {
    /// Defaults for a given debugfs root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { debugfs_root: root.into(), ..Self::default() }
    }

    /// System-wide GPIO summary.
    pub fn chip_directory_path(&self) -> PathBuf {
        self.debugfs_root.join("gpio")
    }

    /// Directory of node-dump files, one per controller.
    pub fn node_dump_dir(&self) -> PathBuf {
        self.debugfs_root.join("gpio_debug")
    }

    /// Directory of pinctrl devices.
    pub fn pinctrl_dir(&self) -> PathBuf {
        self.debugfs_root.join("pinctrl")
    }

    /// Settle `Auto`: node dumps when their directory exists, pinctrl otherwise.
    pub fn resolve_dialect(&self) -> Dialect {
        match self.dialect {
            DialectSelection::NodeDump => Dialect::NodeDump,
            DialectSelection::Pinctrl => Dialect::Pinctrl,
            DialectSelection::Auto if self.node_dump_dir().is_dir() => Dialect::NodeDump,
            DialectSelection::Auto => Dialect::Pinctrl,
        }
    }

    /// Apply `GPIO_PINMAP_DEBUGFS` if set.
    pub fn apply_env(&mut self) {
        if let Some(root) = std::env::var_os(DEBUGFS_ENV) {
            debug!(root = ?root, "debugfs root from environment");
            self.debugfs_root = PathBuf::from(root);
        }
    }
}

/// Load a config file, choosing JSON or YAML by extension.
pub fn load_config(path: &Path) -> Result<ScanConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: ScanConfig = match ext {
        "json" => serde_json::from_str(&body).context("Failed to parse config JSON")?,
        "yaml" | "yml" => serde_yaml::from_str(&body).context("Failed to parse config YAML")?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string()).into()),
    };
    Ok(config)
}

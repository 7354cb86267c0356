use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use gpio_pinmap::commands::{info_command, InfoOptions};
use gpio_pinmap::init_tracing;
use pinmap_core::config::DialectSelection;

/// List GPIO lines enriched with pin-mux data scraped from debugfs.
///
/// Without LINE arguments every line of every chip is listed with a per-chip
/// banner. With LINE arguments only the matching lines are printed, each
/// prefixed with its chip and offset.
#[derive(Parser, Debug)]
#[command(name = "gpio-pinmap", version, about, long_about = None)]
struct Cli {
    /// Line names, or offsets when `--chip` is given.
    #[arg(value_name = "LINE")]
    lines: Vec<String>,

    /// Treat every LINE as a name, even if it looks like an offset.
    #[arg(long)]
    by_name: bool,

    /// Restrict the scan to one chip (number, name under /dev, or path).
    #[arg(short, long, value_name = "CHIP")]
    chip: Option<String>,

    /// Check every chip and fail when a name matches more than one line.
    #[arg(short, long)]
    strict: bool,

    /// Print line names and consumers without quotes.
    #[arg(long)]
    unquoted: bool,

    /// Emit rows as a JSON array.
    #[arg(long)]
    json: bool,

    /// Pin descriptor format to read: auto, node-dump or pinctrl.
    #[arg(long, value_name = "DIALECT")]
    dialect: Option<DialectSelection>,

    /// debugfs mount point. Overrides GPIO_PINMAP_DEBUGFS and the config file.
    #[arg(long, value_name = "DIR")]
    debugfs: Option<PathBuf>,

    /// JSON or YAML config file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read line metadata from a JSON snapshot instead of /dev/gpiochip*.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Log at debug level unless GPIO_PINMAP_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = InfoOptions {
        lines: cli.lines,
        chip: cli.chip,
        by_name: cli.by_name,
        strict: cli.strict,
        unquoted: cli.unquoted,
        json: cli.json,
        dialect: cli.dialect,
        debugfs: cli.debugfs,
        config: cli.config,
        snapshot: cli.snapshot,
    };

    if info_command(&opts)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

//! Row rendering: the human-readable table and the JSON array.

use std::fmt::Write as _;
use std::io::{self, Write};

use pinmap_core::config::Dialect;
use pinmap_core::model::{ChipDirectoryEntry, KernelChip, KernelLine, PinDescriptor};
use pinmap_core::scan::{LineRow, RowSink};

/// Names this short or shorter are padded so columns line up.
const NAME_PAD_LIMIT: usize = 14;
const NAME_COLUMN: usize = 16;
const UNQUOTED_NAME_COLUMN: usize = 5;

/// Text rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub unquoted: bool,
    /// Rows answer explicit requests: no banners, `<chip> <offset>` prefix.
    pub resolve_mode: bool,
    /// Decides the pin columns named in the heading.
    pub dialect: Dialect,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { unquoted: false, resolve_mode: false, dialect: Dialect::NodeDump }
    }
}

/// Per-chip banner: `gpiochip4 - 8 lines: @platform/31000000.gpio: @GPIOs 498-505`.
pub fn format_banner(chip: &KernelChip, entry: Option<&ChipDirectoryEntry>) -> String {
    let mut out = format!("{} - {} lines:", chip.name, chip.num_lines);
    if let Some(entry) = entry {
        let _ = write!(out, " @{}: @{}", entry.parent, entry.line_range_label);
    }
    out
}

/// Column heading printed under each banner.
pub fn format_heading(dialect: Dialect) -> String {
    let pins = match dialect {
        Dialect::NodeDump => format!("{:<20} {:<16} {}", "[PinName]", "[PinNode]", "[PinNum]"),
        Dialect::Pinctrl => format!("{:<20} {:<6} {}", "[PinName]", "[PinNum]", "[Mode]"),
    };
    format!(
        "\t{:<9}\t{:<width$}\t[Status]\t{pins}",
        "[Number]",
        "[GpioName]",
        width = NAME_COLUMN
    )
}

pub fn format_name(name: Option<&str>, unquoted: bool) -> String {
    match name {
        None => format!("{:<width$}", "unnamed", width = NAME_COLUMN),
        Some(name) if unquoted => format!("{name:<width$}", width = UNQUOTED_NAME_COLUMN),
        Some(name) => {
            let quoted = format!("\"{name}\"");
            if name.chars().count() <= NAME_PAD_LIMIT {
                format!("{quoted:<width$}", width = NAME_COLUMN)
            } else {
                quoted
            }
        }
    }
}

pub fn format_consumer(line: &KernelLine, unquoted: bool) -> String {
    let consumer = match (&line.consumer, line.used) {
        (Some(consumer), _) => consumer.as_str(),
        (None, true) => "kernel",
        (None, false) => return "unused".to_string(),
    };
    if unquoted {
        consumer.to_string()
    } else {
        format!("\"{consumer}\"")
    }
}

/// Space-separated line attributes, direction first.
pub fn format_attributes(line: &KernelLine) -> String {
    let mut attrs = vec![line.direction.as_str().to_string()];
    if line.active_low {
        attrs.push("active-low".to_string());
    }
    if let Some(bias) = line.bias {
        attrs.push(format!("bias={}", bias.as_str()));
    }
    if let Some(drive) = line.drive {
        attrs.push(format!("drive={}", drive.as_str()));
    }
    if let Some(edges) = line.edges {
        attrs.push(format!("edges={}", edges.as_str()));
    }
    if let Some(us) = line.debounce_us {
        attrs.push(format!("debounce-period={us}us"));
    }
    attrs.join(" ")
}

/// Node-dump pins show `[PinName] [PinNode] [PinNum]`, pinctrl pins
/// `[PinName] [PinNum] [Mode]`.
pub fn format_pin(pin: &PinDescriptor) -> String {
    match &pin.node {
        Some(node) => format!("{:<20} {:<16} {}", pin.pin_name, node, pin.absolute_pin_number),
        None => format!("{:<20} {:<6} {}", pin.pin_name, pin.absolute_pin_number, pin.function()),
    }
}

pub fn format_row(row: &LineRow<'_>, style: TextStyle) -> String {
    let line = &row.line;
    let mut out = if style.resolve_mode {
        format!("{} {}", row.chip.name, line.offset)
    } else {
        format!("\tline {:>3}:", line.offset)
    };
    let _ = write!(
        out,
        "\t{}\t{} {}",
        format_name(line.name.as_deref(), style.unquoted),
        format_consumer(line, style.unquoted),
        format_attributes(line)
    );
    if let Some(pin) = row.pin {
        let _ = write!(out, "\t{}", format_pin(pin));
    }
    out.truncate(out.trim_end().len());
    out
}

/// Writes text rows as they arrive. The first write error stops output and
/// is returned by [`TextSink::finish`].
pub struct TextSink<W: Write> {
    out: W,
    style: TextStyle,
    error: Option<io::Error>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, style: TextStyle) -> Self {
        Self { out, style, error: None }
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_none() {
            if let Err(e) = writeln!(self.out, "{text}") {
                self.error = Some(e);
            }
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RowSink for TextSink<W> {
    fn begin_chip(&mut self, chip: &KernelChip, entry: Option<&ChipDirectoryEntry>) {
        if !self.style.resolve_mode {
            self.emit(&format_banner(chip, entry));
            self.emit(&format_heading(self.style.dialect));
        }
    }

    fn row(&mut self, row: &LineRow<'_>) {
        let text = format_row(row, self.style);
        self.emit(&text);
    }
}

/// Collects rows as JSON values; written out once the scan is over.
#[derive(Debug, Default)]
pub struct JsonSink {
    rows: Vec<serde_json::Value>,
    error: Option<serde_json::Error>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[serde_json::Value] {
        &self.rows
    }

    pub fn write_to<W: Write>(self, mut out: W) -> anyhow::Result<()> {
        if let Some(e) = self.error {
            return Err(e.into());
        }
        serde_json::to_writer_pretty(&mut out, &self.rows)?;
        writeln!(out)?;
        Ok(())
    }
}

impl RowSink for JsonSink {
    fn row(&mut self, row: &LineRow<'_>) {
        match serde_json::to_value(row) {
            Ok(value) => self.rows.push(value),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
    }
}

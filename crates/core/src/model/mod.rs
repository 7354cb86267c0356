//! Core data model for chips, kernel lines and pin descriptors.
//!
//! Two families of types live here:
//! - What the kernel reports through the GPIO character device (`KernelChip`,
//!   `KernelLine` and the attribute enums).
//! - What the debugfs dumps tell us about the physical pins behind those
//!   lines (`ChipDirectoryEntry`, `PinRecord`, `PinDescriptor`,
//!   `ChipPinTable`).

use serde::{Deserialize, Serialize};

/// Marker used when a pin-mux dump names no function for a pin.
pub const DEFAULT_FUNCTION: &str = "Default";

/// One chip as listed in the system-wide GPIO summary (`<debugfs>/gpio`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDirectoryEntry {
    /// Kernel chip name, e.g. `gpiochip4`.
    pub chip_name: String,
    /// Controller label the chip belongs to, e.g. `aon_gpio_porta`.
    pub controller_name: String,
    /// First absolute line number owned by the chip.
    pub base_offset: u32,
    /// Raw range text (`GPIOs 498-505`), kept for display only.
    pub line_range_label: String,
    /// Parent device path as printed (`platform/31000000.gpio`).
    pub parent: String,
}

impl ChipDirectoryEntry {
    /// Last path component of the parent device (`31000000.gpio`).
    pub fn parent_device(&self) -> &str {
        self.parent.rsplit('/').next().unwrap_or(&self.parent)
    }
}

/// A pin as parsed from one debug-text line, before correlation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRecord {
    pub pin_name: String,
    pub controller_name: String,
    /// Zero-based offset within the owning controller.
    pub line_number: u32,
    /// Composite node identifier (node-dump dialect only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Active mux function, filled in by the pinmux pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_function: Option<String>,
}

impl PinRecord {
    pub fn new(
        pin_name: impl Into<String>,
        controller_name: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self {
            pin_name: pin_name.into(),
            controller_name: controller_name.into(),
            line_number,
            node: None,
            current_function: None,
        }
    }

    /// Builder-style helper to attach the composite node identifier.
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }
}

/// A correlated pin: a `PinRecord` placed at its absolute pin number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDescriptor {
    /// Upper-cased pin name.
    pub pin_name: String,
    pub controller_name: String,
    pub line_number: u32,
    /// `line_number + base_offset` of the owning chip.
    pub absolute_pin_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_function: Option<String>,
}

impl PinDescriptor {
    /// Active function, or the `Default` marker when none was reported.
    pub fn function(&self) -> &str {
        self.current_function.as_deref().unwrap_or(DEFAULT_FUNCTION)
    }
}

/// Final per-chip pin table produced by the correlator.
///
/// `pins` is sorted by `line_number` with no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipPinTable {
    pub chip_name: String,
    pub controller_name: String,
    pub base_offset: u32,
    pub pins: Vec<PinDescriptor>,
}

impl ChipPinTable {
    /// Look up the descriptor for a line offset.
    pub fn pin(&self, line_number: u32) -> Option<&PinDescriptor> {
        self.pins
            .binary_search_by_key(&line_number, |p| p.line_number)
            .ok()
            .map(|idx| &self.pins[idx])
    }
}

/// Chip-level metadata as reported by the line metadata provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelChip {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub num_lines: u32,
}

/// Direction of a kernel line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDirection {
    #[default]
    Input,
    Output,
}

/// Bias configured on a kernel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineBias {
    PullUp,
    PullDown,
    Disabled,
}

/// Output drive of a kernel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineDrive {
    PushPull,
    OpenDrain,
    OpenSource,
}

/// Edge detection configured on a kernel line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEdges {
    Rising,
    Falling,
    Both,
}

impl LineDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LineDirection::Input => "input",
            LineDirection::Output => "output",
        }
    }
}

impl LineBias {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBias::PullUp => "pull-up",
            LineBias::PullDown => "pull-down",
            LineBias::Disabled => "disabled",
        }
    }
}

impl LineDrive {
    pub fn as_str(self) -> &'static str {
        match self {
            LineDrive::PushPull => "push-pull",
            LineDrive::OpenDrain => "open-drain",
            LineDrive::OpenSource => "open-source",
        }
    }
}

impl LineEdges {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEdges::Rising => "rising",
            LineEdges::Falling => "falling",
            LineEdges::Both => "both",
        }
    }
}

/// Per-line metadata as reported by the line metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelLine {
    #[serde(default)]
    pub offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<String>,
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub direction: LineDirection,
    #[serde(default)]
    pub active_low: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<LineBias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive: Option<LineDrive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<LineEdges>,
    /// Debounce period in microseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_us: Option<u64>,
}

impl KernelLine {
    pub fn new(offset: u32) -> Self {
        Self { offset, ..Self::default() }
    }

    /// Builder-style helper to set the reported line name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

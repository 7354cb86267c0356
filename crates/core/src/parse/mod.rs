//! Parsers for the debugfs text dumps.
//!
//! - `directory`: the system-wide GPIO summary listing every chip.
//! - `dialect`: the shared line-by-line pin parsing capability.
//! - `node_dump`: the composite-node dialect (`PinNode: ... PinName: ...`).
//! - `pinctrl`: the pinctrl dialect (`pins` and `pinmux-pins`).

pub mod dialect;
pub mod directory;
pub mod node_dump;
pub mod pinctrl;

pub use dialect::{parse_pin_lines, PinDialect};
pub use directory::{parse_chip_directory, parse_chip_header, ChipHeader};
pub use node_dump::{parse_node_dump, NodeDump, NodeDumpDialect};
pub use pinctrl::{apply_pinmux, extract_function, PinctrlPinsDialect};

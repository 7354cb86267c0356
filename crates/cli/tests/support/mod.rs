//! Fixture trees shared by the CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const CHIP_DIRECTORY: &str = "\
gpiochip0: GPIOs 466-497, parent: platform/32150000.gpio, dsp_gpio_porta:
gpiochip4: GPIOs 498-505, parent: platform/31000000.gpio, aon_gpio_porta:
";

pub const SNAPSHOT: &str = r#"{
  "chips": [
    {
      "name": "gpiochip0",
      "label": "dsp_gpio_porta",
      "lines": [
        {"name": "LED0", "direction": "output", "used": true, "consumer": "led"},
        {"name": "DUP"},
        {}
      ]
    },
    {
      "name": "gpiochip4",
      "label": "aon_gpio_porta",
      "lines": [
        {"name": "PWR_KEY", "bias": "pull-up"},
        {}, {}, {}, {}, {}, {"name": "DUP"},
        {"name": "UART_TX", "direction": "output"}
      ]
    }
  ]
}"#;

pub fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, body).expect("write fixture");
}

/// A temp tree holding `debugfs/` and `snapshot.json`.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn debugfs(&self) -> PathBuf {
        self.dir.path().join("debugfs")
    }

    pub fn snapshot(&self) -> PathBuf {
        self.dir.path().join("snapshot.json")
    }
}

fn base() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    write(&dir.path().join("snapshot.json"), SNAPSHOT);
    write(&dir.path().join("debugfs/gpio"), CHIP_DIRECTORY);
    Fixture { dir }
}

/// Node-dump debugfs: `gpio_debug/` describes the aon controller.
pub fn node_dump_fixture() -> Fixture {
    let fixture = base();
    write(
        &fixture.debugfs().join("gpio_debug/aon_gpio"),
        "gpiochip4: GPIOs 498-505, parent: platform/31000000.gpio\n\
         PinNode: aon_gpio_porta_7 PinName: UART_TX\n\
         PinNode: aon_gpio_porta_0 PinName: pwr_key\n",
    );
    fixture
}

/// Pinctrl debugfs: `pinctrl/<dev>/pins` plus `pinmux-pins`.
pub fn pinctrl_fixture() -> Fixture {
    let fixture = base();
    let dev = fixture.debugfs().join("pinctrl/31000000.pinctrl");
    write(
        &dev.join("pins"),
        "registered pins: 2\n\
         pin 0 (pwr_key) 0:aon_gpio_porta 31000000.pinctrl\n\
         pin 7 (uart_tx) 7:aon_gpio_porta 31000000.pinctrl\n",
    );
    write(
        &dev.join("pinmux-pins"),
        "Pinmux settings per pin\n\
         pin 7 (uart_tx): device 31040000.uart function uart group uart0_grp\n",
    );
    fixture
}

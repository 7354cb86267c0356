//! Pinctrl dialect, read from `<debugfs>/pinctrl/<device>/`.
//!
//! The `pins` file lists `pin <n> (<name>) <gpio>:<controller> ...`; only rows
//! owned by the chip's controller are kept. The `pinmux-pins` file lists
//! `pin <n> (<name>): <rest>` and only updates the mux function of pins that
//! `pins` already produced.

use tracing::debug;

use crate::model::{PinRecord, DEFAULT_FUNCTION};
use crate::parse::dialect::PinDialect;

/// Controller marker the kernel prints for pins with no GPIO range.
const UNKNOWN_CONTROLLER: &str = "?";

/// Line parser for the `pins` file, bound to one controller.
#[derive(Debug, Clone)]
pub struct PinctrlPinsDialect {
    controller: String,
}

impl PinctrlPinsDialect {
    pub fn new(controller: impl Into<String>) -> Self {
        Self { controller: controller.into() }
    }
}

impl PinDialect for PinctrlPinsDialect {
    fn name(&self) -> &'static str {
        "pinctrl"
    }

    fn parse_line(&self, line: &str) -> Option<PinRecord> {
        let (line_number, pin_name, rest) = split_pin_prefix(line)?;
        let owner = rest.split_whitespace().next()?;
        let controller = owner.split_once(':').map_or(owner, |(_, label)| label);
        if controller == UNKNOWN_CONTROLLER || controller != self.controller {
            return None;
        }
        Some(PinRecord::new(pin_name, controller, line_number))
    }
}

/// Split `pin <n> (<name>)<rest>` into its parts. `rest` keeps whatever
/// follows the closing parenthesis.
fn split_pin_prefix(line: &str) -> Option<(u32, &str, &str)> {
    let rest = line.trim_start().strip_prefix("pin ")?;
    let (number, rest) = rest.split_once(' ')?;
    let line_number = number.parse().ok()?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let (name, rest) = rest.split_once(')')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((line_number, name, rest))
}

/// Pick the mux function out of the text after `pin <n> (<name>):`.
///
/// 1. The token after `group`.
/// 2. Otherwise the token just before a `<addr>.gpio:<n>` owner token, with
///    surrounding parentheses trimmed.
/// 3. Otherwise [`DEFAULT_FUNCTION`].
pub fn extract_function(rest: &str) -> String {
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    if let Some(group) = tokens.windows(2).find(|w| w[0] == "group").map(|w| w[1]) {
        return group.to_string();
    }

    let preceding = tokens
        .iter()
        .position(|t| is_gpio_owner(t))
        .and_then(|idx| idx.checked_sub(1))
        .map(|idx| tokens[idx].trim_matches(|c| c == '(' || c == ')'))
        .filter(|t| !t.is_empty());
    match preceding {
        Some(token) => token.to_string(),
        None => DEFAULT_FUNCTION.to_string(),
    }
}

/// `31000000.gpio:7`: a hex address, `.gpio:`, then a decimal line.
fn is_gpio_owner(token: &str) -> bool {
    let Some((addr, line)) = token.split_once(".gpio:") else {
        return false;
    };
    !addr.is_empty()
        && addr.bytes().all(|b| b.is_ascii_hexdigit())
        && !line.is_empty()
        && line.bytes().all(|b| b.is_ascii_digit())
}

/// Apply a `pinmux-pins` dump to already-parsed pins.
///
/// Only pins whose name matches (ignoring case) are updated; rows for unknown
/// pins never create records. Returns how many rows updated a pin.
pub fn apply_pinmux(pins: &mut [PinRecord], text: &str, source_name: &str) -> usize {
    let mut updated = 0usize;
    for line in text.lines() {
        let Some((_, name, rest)) = split_pin_prefix(line) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix(':') else {
            continue;
        };
        let Some(pin) = pins.iter_mut().find(|p| p.pin_name.eq_ignore_ascii_case(name)) else {
            continue;
        };
        pin.current_function = Some(extract_function(rest));
        updated += 1;
    }
    debug!(source = source_name, updated, "applied pinmux functions");
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Only pins owned by the requested controller are kept; `?` owners never are.
    #[test]
    fn pins_rows_filter_by_controller() {
        let dialect = PinctrlPinsDialect::new("aon_gpio_porta");
        let pin = dialect.parse_line("pin 7 (UART_TX) 7:aon_gpio_porta 31000000.pinctrl").unwrap();
        assert_eq!(pin.line_number, 7);
        assert_eq!(pin.pin_name, "UART_TX");
        assert_eq!(pin.controller_name, "aon_gpio_porta");

        assert!(dialect.parse_line("pin 8 (I2C_SDA) 0:other_ctrl").is_none());
        assert!(dialect.parse_line("pin 9 (NC) 0:?").is_none());
        assert!(dialect.parse_line("registered pins: 64").is_none());
        assert!(dialect.parse_line("pin x (BAD) 1:aon_gpio_porta").is_none());
    }

    /// The `group` token names the function when present.
    #[test]
    fn function_prefers_group_token() {
        assert_eq!(
            extract_function(" device a500e000.pwm function pwm group pwm0_grp"),
            "pwm0_grp"
        );
    }

    /// Without a group, the token before `<addr>.gpio:<n>` is used.
    #[test]
    fn function_falls_back_to_token_before_gpio_owner() {
        assert_eq!(extract_function(" (MUX UNCLAIMED) 31000000.gpio:7"), "UNCLAIMED");
        assert_eq!(extract_function(" uart1 a6003000.gpio:12 extra"), "uart1");
    }

    #[test]
    fn function_defaults_without_group_or_owner() {
        assert_eq!(extract_function(" UNCLAIMED"), DEFAULT_FUNCTION);
        assert_eq!(extract_function(" 31000000.gpio:7"), DEFAULT_FUNCTION);
        assert_eq!(extract_function(" foo zz.gpio:7"), DEFAULT_FUNCTION);
    }

    /// The pinmux pass updates existing pins and never creates new ones.
    #[test]
    fn pinmux_only_updates_known_pins() {
        let mut pins = vec![PinRecord::new("uart_tx", "aon", 7)];
        let text = "Pinmux settings per pin\n\
                    pin 7 (UART_TX): device 31040000.uart function uart group uart0_grp\n\
                    pin 9 (GHOST): device x function y group z\n";
        let updated = apply_pinmux(&mut pins, text, "pinmux-pins");
        assert_eq!(updated, 1);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].current_function.as_deref(), Some("uart0_grp"));
    }
}

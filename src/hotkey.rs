//! Human-readable rendering of hotkey key codes and modifier masks.
//!
//! Key codes are macOS virtual key codes; modifier bits follow the Carbon
//! event manager layout.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const CMD_KEY: u32 = 0x0100;
pub const SHIFT_KEY: u32 = 0x0200;
pub const OPTION_KEY: u32 = 0x0800;
pub const CONTROL_KEY: u32 = 0x1000;

/// Display order of modifier symbols
const MODIFIER_SYMBOLS: &[(u32, &str)] = &[
    (CMD_KEY, "⌘"),
    (OPTION_KEY, "⌥"),
    (CONTROL_KEY, "⌃"),
    (SHIFT_KEY, "⇧"),
];

pub const KEY_F1: u32 = 0x7A;

/// Render a key code and modifier mask, e.g. `⌘⌥F1`
pub fn encode(key_code: u32, modifiers: u32) -> String {
    let mut out: String = MODIFIER_SYMBOLS
        .iter()
        .filter(|(bit, _)| modifiers & bit != 0)
        .map(|(_, symbol)| *symbol)
        .collect();
    out.push_str(&key_name(key_code));
    out
}

/// Name of a single key; unknown codes render as `Key<N>`
pub fn key_name(key_code: u32) -> String {
    match key_symbol(key_code) {
        Some(symbol) => symbol.to_string(),
        None => format!("Key{}", key_code),
    }
}

fn key_symbol(key_code: u32) -> Option<&'static str> {
    let symbol = match key_code {
        // Function keys
        0x7A => "F1",
        0x78 => "F2",
        0x63 => "F3",
        0x76 => "F4",
        0x60 => "F5",
        0x61 => "F6",
        0x62 => "F7",
        0x64 => "F8",
        0x65 => "F9",
        0x6D => "F10",
        0x67 => "F11",
        0x6F => "F12",

        // Letters
        0x00 => "A",
        0x0B => "B",
        0x08 => "C",
        0x02 => "D",
        0x0E => "E",
        0x03 => "F",
        0x05 => "G",
        0x04 => "H",
        0x22 => "I",
        0x26 => "J",
        0x28 => "K",
        0x25 => "L",
        0x2E => "M",
        0x2D => "N",
        0x1F => "O",
        0x23 => "P",
        0x0C => "Q",
        0x0F => "R",
        0x01 => "S",
        0x11 => "T",
        0x20 => "U",
        0x09 => "V",
        0x0D => "W",
        0x07 => "X",
        0x10 => "Y",
        0x06 => "Z",

        // Digits
        0x1D => "0",
        0x12 => "1",
        0x13 => "2",
        0x14 => "3",
        0x15 => "4",
        0x17 => "5",
        0x16 => "6",
        0x1A => "7",
        0x1C => "8",
        0x19 => "9",

        // Special keys
        0x31 => "Space",
        0x24 => "Return",
        0x30 => "Tab",
        0x33 => "Delete",
        0x35 => "Esc",
        0x7B => "←",
        0x7C => "→",
        0x7D => "↓",
        0x7E => "↑",
        0x73 => "Home",
        0x77 => "End",
        0x74 => "PageUp",
        0x79 => "PageDown",

        // Punctuation
        0x27 => "'",
        0x2A => "\\",
        0x2B => ",",
        0x2C => "/",
        0x2F => ".",
        0x29 => ";",
        0x18 => "=",
        0x21 => "[",
        0x1E => "]",
        0x1B => "-",
        0x32 => "`",

        // Numpad
        0x52 => "Num0",
        0x53 => "Num1",
        0x54 => "Num2",
        0x55 => "Num3",
        0x56 => "Num4",
        0x57 => "Num5",
        0x58 => "Num6",
        0x59 => "Num7",
        0x5B => "Num8",
        0x5C => "Num9",
        0x43 => "Num*",
        0x45 => "Num+",
        0x4B => "Num/",
        0x4E => "Num-",
        0x41 => "Num.",
        0x4C => "NumEnter",

        _ => return None,
    };
    Some(symbol)
}

/// A key code plus modifier mask
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotkey {
    pub key_code: u32,
    pub modifiers: u32,
}

impl Hotkey {
    pub fn new(key_code: u32, modifiers: u32) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    pub fn has_modifier(&self, bit: u32) -> bool {
        self.modifiers & bit != 0
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self::new(KEY_F1, CMD_KEY | OPTION_KEY)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self.key_code, self.modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hotkey() {
        assert_eq!(Hotkey::default().to_string(), "⌘⌥F1");
    }

    #[test]
    fn test_modifier_order_is_canonical() {
        let all = SHIFT_KEY | CONTROL_KEY | OPTION_KEY | CMD_KEY;
        assert_eq!(encode(0x00, all), "⌘⌥⌃⇧A");
        assert_eq!(encode(0x31, SHIFT_KEY | CMD_KEY), "⌘⇧Space");
    }

    #[test]
    fn test_no_modifiers() {
        assert_eq!(encode(0x35, 0), "Esc");
        assert_eq!(encode(0x4C, 0), "NumEnter");
    }

    #[test]
    fn test_unknown_key_code() {
        assert_eq!(encode(0xFF, CONTROL_KEY), "⌃Key255");
        assert_eq!(key_name(1000), "Key1000");
    }

    #[test]
    fn test_unrelated_bits_are_ignored() {
        assert_eq!(encode(0x7A, 0x0001 | CMD_KEY), "⌘F1");
    }

    #[test]
    fn test_has_modifier() {
        let hotkey = Hotkey::default();
        assert!(hotkey.has_modifier(CMD_KEY));
        assert!(!hotkey.has_modifier(SHIFT_KEY));
    }
}

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Modifier mask of a hotkey. Values match the Win32 `MOD_*` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(pub u32);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const ALT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const SHIFT: Modifiers = Modifiers(4);
    pub const META: Modifiers = Modifiers(8);

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0
    }
}

/// An immutable request for one global shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub id: i32,
    pub modifiers: Modifiers,
    pub key_code: u32,
}

impl Hotkey {
    pub fn new(id: i32, modifiers: Modifiers, key_code: u32) -> Self {
        Self {
            id,
            modifiers,
            key_code,
        }
    }

    /// Parses a combination such as `ctrl + shift + o`.
    pub fn parse(id: i32, value: &str) -> Option<Self> {
        let value = value.to_ascii_lowercase().replace(' ', "");
        let mut modifiers = Modifiers::NONE;
        let mut code = 0;
        for v in value.split('+') {
            match v {
                "alt" => modifiers |= Modifiers::ALT,
                "ctrl" | "control" => modifiers |= Modifiers::CTRL,
                "shift" => modifiers |= Modifiers::SHIFT,
                "win" | "meta" => modifiers |= Modifiers::META,
                _ => {
                    if code != 0 {
                        return None;
                    }
                    code = key_code_of(v)?;
                }
            }
        }
        if code == 0 {
            return None;
        }
        Some(Self::new(id, modifiers, code))
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hotkey[ID: {}, ", self.id)?;
        for (flag, name) in [
            (Modifiers::ALT, "Alt"),
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::META, "Meta"),
        ] {
            if self.modifiers.contains(flag) {
                write!(f, "{name}+")?;
            }
        }
        match self.key_code {
            // VK_F1..VK_F24
            0x70..=0x87 => write!(f, "F{}]", self.key_code - 0x6f),
            code @ (0x30..=0x39 | 0x41..=0x5a) => write!(f, "{}]", code as u8 as char),
            code => write!(f, "{code:#04x}]"),
        }
    }
}

/// Windows virtual-key code of a key name.
fn key_code_of(name: &str) -> Option<u32> {
    let code = match name {
        "backspace" => 0x08,
        "tab" => 0x09,
        "clear" => 0x0c,
        "enter" => 0x0d,
        "pause" => 0x13,
        "capslock" => 0x14,
        "escape" | "esc" => 0x1b,
        "space" => 0x20,
        "pageup" => 0x21,
        "pagedown" => 0x22,
        "end" => 0x23,
        "home" => 0x24,
        "left" => 0x25,
        "up" => 0x26,
        "right" => 0x27,
        "down" => 0x28,
        "select" => 0x29,
        "print" => 0x2a,
        "printscreen" => 0x2c,
        "insert" => 0x2d,
        "delete" => 0x2e,

        "f1" => 0x70,
        "f2" => 0x71,
        "f3" => 0x72,
        "f4" => 0x73,
        "f5" => 0x74,
        "f6" => 0x75,
        "f7" => 0x76,
        "f8" => 0x77,
        "f9" => 0x78,
        "f10" => 0x79,
        "f11" => 0x7a,
        "f12" => 0x7b,
        "numlock" => 0x90,
        "scrolllock" => 0x91,

        ":" | ";" => 0xba,
        "=" => 0xbb,
        "<" | "," => 0xbc,
        "-" | "_" => 0xbd,
        ">" | "." => 0xbe,
        "?" | "/" => 0xbf,
        "~" | "`" => 0xc0,
        "{" | "[" => 0xdb,
        "|" | "\\" => 0xdc,
        "}" | "]" => 0xdd,
        "\"" | "'" => 0xde,

        _ => {
            // digits and letters share their ASCII upper-case code
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
                _ => return None,
            }
        }
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_orders_modifiers() {
        let hotkey = Hotkey::new(1, Modifiers::CTRL | Modifiers::ALT, 'O' as u32);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 1, Alt+Ctrl+O]");

        let hotkey = Hotkey::new(
            7,
            Modifiers::META | Modifiers::SHIFT | Modifiers::CTRL | Modifiers::ALT,
            'Z' as u32,
        );
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 7, Alt+Ctrl+Shift+Meta+Z]");

        let hotkey = Hotkey::new(2, Modifiers(3), 'O' as u32);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 2, Alt+Ctrl+O]");
    }

    #[test]
    fn test_display_non_printable_key() {
        let hotkey = Hotkey::new(3, Modifiers::SHIFT, 0x70);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 3, Shift+F1]");
        let hotkey = Hotkey::parse(5, "win+f4").unwrap();
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 5, Meta+F4]");
        let hotkey = Hotkey::new(6, Modifiers::CTRL, 0x87);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 6, Ctrl+F24]");
        // numpad keys share the lower-case ASCII range
        let hotkey = Hotkey::new(7, Modifiers::ALT, 0x61);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 7, Alt+0x61]");
        let hotkey = Hotkey::new(4, Modifiers::NONE, 0x1b);
        assert_eq!(hotkey.to_string(), "Hotkey[ID: 4, 0x1b]");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Hotkey::parse(1, "alt + `"),
            Some(Hotkey::new(1, Modifiers::ALT, 0xc0))
        );
        assert_eq!(
            Hotkey::parse(2, "Ctrl+Shift+O"),
            Some(Hotkey::new(2, Modifiers::CTRL | Modifiers::SHIFT, 'O' as u32))
        );
        assert_eq!(
            Hotkey::parse(3, "win+f4"),
            Some(Hotkey::new(3, Modifiers::META, 0x73))
        );
        assert_eq!(
            Hotkey::parse(4, "ctrl+alt+7"),
            Some(Hotkey::new(4, Modifiers::CTRL | Modifiers::ALT, '7' as u32))
        );
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(Hotkey::parse(1, "ctrl+alt"), None);
        assert_eq!(Hotkey::parse(1, "ctrl+a+b"), None);
        assert_eq!(Hotkey::parse(1, "hyper+a"), None);
        assert_eq!(Hotkey::parse(1, ""), None);
    }
}

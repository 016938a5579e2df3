//! Keypad input state.
use std::{
    fmt::{self, Formatter},
    str::FromStr,
};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyCode {
    Key0 = 0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF = 0xF,
}

impl KeyCode {
    /// Every key, indexed by its hexadecimal value.
    #[rustfmt::skip]
    pub const ALL: [KeyCode; KEY_COUNT as usize] = [
        Self::Key0, Self::Key1, Self::Key2, Self::Key3,
        Self::Key4, Self::Key5, Self::Key6, Self::Key7,
        Self::Key8, Self::Key9, Self::KeyA, Self::KeyB,
        Self::KeyC, Self::KeyD, Self::KeyE, Self::KeyF,
    ];

    #[inline(always)]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// Keys are labelled with their hexadecimal digit on the keypad.
impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.as_u8())
    }
}

impl From<KeyCode> for u8 {
    fn from(keycode: KeyCode) -> Self {
        keycode.as_u8()
    }
}

impl TryFrom<u8> for KeyCode {
    type Error = InvalidKeyCode;

    fn try_from(key_id: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(key_id as usize)
            .copied()
            .ok_or_else(|| InvalidKeyCode(key_id.to_string()))
    }
}

/// Parses a single hexadecimal digit, either case.
impl FromStr for KeyCode {
    type Err = InvalidKeyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next().and_then(|c| c.to_digit(16)), chars.next()) {
            (Some(digit), None) => Ok(Self::ALL[digit as usize]),
            _ => Err(InvalidKeyCode(s.to_string())),
        }
    }
}

/// Key that is not on the 16 key hexadecimal keypad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKeyCode(pub String);

impl std::error::Error for InvalidKeyCode {}

impl fmt::Display for InvalidKeyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "no key {} on the keypad, expected a digit 0-F", self.0)
    }
}

/// Pressed state of the 16 hexadecimal keys.
///
/// Written by the host input device, only read by the interpreter.
/// Pressed is a 1 bit, released is a 0 bit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad(u16);

impl Keypad {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.0 |= 1 << key.as_u8();
        } else {
            self.0 &= !(1 << key.as_u8());
        }
    }

    /// Programs can ask for any register value, so only the low nibble is
    /// used to select the key.
    #[inline]
    pub fn is_pressed(&self, key_id: u8) -> bool {
        self.0 & (1 << (key_id & 0xF)) != 0
    }

    /// Check whether any key is pressed down.
    #[inline(always)]
    pub fn any(&self) -> bool {
        self.0 != 0
    }

    /// Retrieve the lowest numbered key that is pressed down.
    #[inline]
    pub fn first_pressed(&self) -> Option<u8> {
        if self.any() {
            (0..KEY_COUNT).find(|k| self.is_pressed(*k))
        } else {
            None
        }
    }

    /// Set all keys to up.
    #[inline(always)]
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

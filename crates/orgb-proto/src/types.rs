//! Plain wire types: colors and the 32-bit enums embedded in description
//! records.
//!
//! Every enum here is serialized as a little-endian `u32`. Unknown values are
//! rejected during deserialization; `from_u32` returns `None` rather than
//! panicking so callers can surface a structured error.

use crate::errors::{ProtocolError, Result};

/// A single RGB color as carried on the wire.
///
/// Serialized as 4 bytes `{r, g, b, 0}`; the fourth byte is padding and is
/// ignored on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Serialized size (3 channels + 1 padding byte)
    pub const WIRE_SIZE: usize = 4;

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Type of device a controller represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceType {
    /// Motherboard RGB headers
    Motherboard = 0,
    /// Memory module
    Dram = 1,
    /// Graphics card
    Gpu = 2,
    /// CPU or case cooler
    Cooler = 3,
    /// Addressable LED strip
    LedStrip = 4,
    /// Keyboard
    Keyboard = 5,
    /// Mouse
    Mouse = 6,
    /// Mouse mat
    MouseMat = 7,
    /// Headset
    Headset = 8,
    /// Headset stand
    HeadsetStand = 9,
    /// Gamepad
    Gamepad = 10,
    /// Anything the daemon could not classify
    Unknown = 11,
}

impl DeviceType {
    /// Convert to the raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the raw wire value.
    ///
    /// Returns `None` for values outside the recognised range.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Motherboard),
            1 => Some(Self::Dram),
            2 => Some(Self::Gpu),
            3 => Some(Self::Cooler),
            4 => Some(Self::LedStrip),
            5 => Some(Self::Keyboard),
            6 => Some(Self::Mouse),
            7 => Some(Self::MouseMat),
            8 => Some(Self::Headset),
            9 => Some(Self::HeadsetStand),
            10 => Some(Self::Gamepad),
            11 => Some(Self::Unknown),
            _ => None,
        }
    }

    pub(crate) fn decode(value: u32) -> Result<Self> {
        Self::from_u32(value)
            .ok_or(ProtocolError::InvalidEnum { kind: "DeviceType", value })
    }
}

/// Direction of a mode's color effect
///
/// Only meaningful when the mode's flags declare one of the direction
/// capabilities; the field is present on the wire either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Direction {
    /// Effect moves left
    Left = 0,
    /// Effect moves right
    Right = 1,
    /// Effect moves up
    Up = 2,
    /// Effect moves down
    Down = 3,
    /// Effect moves horizontally
    Horizontal = 4,
    /// Effect moves vertically
    Vertical = 5,
}

impl Direction {
    /// Convert to the raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the raw wire value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Up),
            3 => Some(Self::Down),
            4 => Some(Self::Horizontal),
            5 => Some(Self::Vertical),
            _ => None,
        }
    }

    pub(crate) fn decode(value: u32) -> Result<Self> {
        Self::from_u32(value)
            .ok_or(ProtocolError::InvalidEnum { kind: "Direction", value })
    }
}

/// How a mode's colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ColorMode {
    /// Mode has no colors
    None = 0,
    /// Mode has per-LED colors
    PerLed = 1,
    /// Mode has its own specific colors
    ModeSpecific = 2,
    /// Mode picks colors at random
    Random = 3,
}

impl ColorMode {
    /// Convert to the raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the raw wire value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::PerLed),
            2 => Some(Self::ModeSpecific),
            3 => Some(Self::Random),
            _ => None,
        }
    }

    pub(crate) fn decode(value: u32) -> Result<Self> {
        Self::from_u32(value)
            .ok_or(ProtocolError::InvalidEnum { kind: "ColorMode", value })
    }
}

/// Shape of an LED zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ZoneType {
    /// One logical LED
    Single = 0,
    /// A strip of LEDs
    Linear = 1,
    /// A two-dimensional grid of LEDs
    Matrix = 2,
}

impl ZoneType {
    /// Convert to the raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the raw wire value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Single),
            1 => Some(Self::Linear),
            2 => Some(Self::Matrix),
            _ => None,
        }
    }

    pub(crate) fn decode(value: u32) -> Result<Self> {
        Self::from_u32(value)
            .ok_or(ProtocolError::InvalidEnum { kind: "ZoneType", value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_round_trip() {
        for value in 0..=11 {
            let parsed = DeviceType::from_u32(value).expect("value in range");
            assert_eq!(parsed.to_u32(), value);
        }
        assert_eq!(DeviceType::from_u32(12), None);
        assert_eq!(DeviceType::from_u32(u32::MAX), None);
    }

    #[test]
    fn direction_round_trip() {
        for value in 0..=5 {
            let parsed = Direction::from_u32(value).expect("value in range");
            assert_eq!(parsed.to_u32(), value);
        }
        assert_eq!(Direction::from_u32(6), None);
    }

    #[test]
    fn color_mode_round_trip() {
        for value in 0..=3 {
            let parsed = ColorMode::from_u32(value).expect("value in range");
            assert_eq!(parsed.to_u32(), value);
        }
        assert_eq!(ColorMode::from_u32(4), None);
    }

    #[test]
    fn zone_type_round_trip() {
        for value in 0..=2 {
            let parsed = ZoneType::from_u32(value).expect("value in range");
            assert_eq!(parsed.to_u32(), value);
        }
        assert_eq!(ZoneType::from_u32(3), None);
    }

    #[test]
    fn invalid_enum_error_names_the_kind() {
        let err = DeviceType::decode(99).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidEnum { kind: "DeviceType", value: 99 });
    }
}

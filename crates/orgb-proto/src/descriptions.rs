//! Structured description records embedded in protocol messages.
//!
//! A controller's reply to a data request carries a tree of these records:
//! the device itself, its modes, its zones, its LEDs, and the current color
//! of every LED. Each record knows its exact serialized size
//! (`calc_size`), how to write itself to an output cursor (`serialize`), and
//! how to read itself back (`deserialize`).
//!
//! Records are immutable once materialised from a reply; a fresh fetch
//! replaces the whole tree.

use crate::{
    ModeFlags,
    codec::{BufferReader, BufferWriter, color_list_wire_size, string_wire_size},
    errors::{ProtocolError, Result},
    types::{Color, ColorMode, DeviceType, Direction, ZoneType},
};

/// One lighting effect supported by a controller.
///
/// Which fields are semantically meaningful is declared by `flags`: `speed`
/// and its bounds only matter under [`ModeFlags::HAS_SPEED`], `direction`
/// only when a direction bit is set, and the color list only when
/// `color_mode` is not [`ColorMode::None`]. The wire layout always carries
/// every fixed field regardless, and deserialization deliberately does not
/// cross-validate flags against field values; the server is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeDescription {
    /// Display name of the mode
    pub name: String,
    /// Device-specific mode identifier
    pub value: u32,
    /// Capability flags; unknown bits survive a round-trip
    pub flags: ModeFlags,
    /// Minimum accepted speed
    pub speed_min: u32,
    /// Maximum accepted speed
    pub speed_max: u32,
    /// Minimum number of mode colors
    pub colors_min: u32,
    /// Maximum number of mode colors
    pub colors_max: u32,
    /// Current speed
    pub speed: u32,
    /// Current effect direction
    pub direction: Direction,
    /// How this mode's colors are chosen
    pub color_mode: ColorMode,
    /// Mode-specific colors; may be empty
    pub colors: Vec<Color>,
}

impl ModeDescription {
    /// Exact number of bytes `serialize` will produce.
    #[must_use]
    pub fn calc_size(&self) -> usize {
        string_wire_size(&self.name) + 9 * 4 + color_list_wire_size(&self.colors)
    }

    /// Write the record to an output cursor.
    pub fn serialize(&self, out: &mut BufferWriter) {
        out.put_string(&self.name);
        out.put_u32(self.value);
        out.put_u32(self.flags.to_u32());
        out.put_u32(self.speed_min);
        out.put_u32(self.speed_max);
        out.put_u32(self.colors_min);
        out.put_u32(self.colors_max);
        out.put_u32(self.speed);
        out.put_u32(self.direction.to_u32());
        out.put_u32(self.color_mode.to_u32());
        out.put_color_list(&self.colors);
    }

    /// Read the record from an input cursor.
    pub fn deserialize(input: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self {
            name: input.get_string()?,
            value: input.get_u32()?,
            flags: ModeFlags::from_u32(input.get_u32()?),
            speed_min: input.get_u32()?,
            speed_max: input.get_u32()?,
            colors_min: input.get_u32()?,
            colors_max: input.get_u32()?,
            speed: input.get_u32()?,
            direction: Direction::decode(input.get_u32()?)?,
            color_mode: ColorMode::decode(input.get_u32()?)?,
            colors: input.get_color_list()?,
        })
    }
}

/// The matrix block of a matrix-shaped zone.
///
/// `values.len()` must equal `height * width`; each cell holds the LED index
/// at that grid position (or `u32::MAX` for a gap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMatrix {
    /// Number of grid rows
    pub height: u32,
    /// Number of grid columns
    pub width: u32,
    /// Row-major cell values, `height * width` entries
    pub values: Vec<u32>,
}

impl ZoneMatrix {
    /// Wire size of the block: height word, width word, and the cells.
    #[must_use]
    pub fn wire_size(&self) -> usize {
        8 + 4 * self.values.len()
    }
}

/// A contiguous or matrix-shaped partition of a controller's LED array.
///
/// The matrix block exists iff the wire's 16-bit `matrix_length` is
/// non-zero, which the `Option` models directly. When present, the declared
/// length must equal `8 + 4 * height * width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDescription {
    /// Display name of the zone
    pub name: String,
    /// Shape of the zone
    pub zone_type: ZoneType,
    /// Smallest size the zone can be resized to
    pub leds_min: u32,
    /// Largest size the zone can be resized to
    pub leds_max: u32,
    /// Current number of LEDs in the zone
    pub leds_count: u32,
    /// Grid layout, for matrix zones
    pub matrix: Option<ZoneMatrix>,
}

impl ZoneDescription {
    /// Exact number of bytes `serialize` will produce.
    #[must_use]
    pub fn calc_size(&self) -> usize {
        string_wire_size(&self.name)
            + 4 * 4
            + 2
            + self.matrix.as_ref().map_or(0, ZoneMatrix::wire_size)
    }

    /// Write the record to an output cursor.
    pub fn serialize(&self, out: &mut BufferWriter) {
        out.put_string(&self.name);
        out.put_u32(self.zone_type.to_u32());
        out.put_u32(self.leds_min);
        out.put_u32(self.leds_max);
        out.put_u32(self.leds_count);
        match &self.matrix {
            None => out.put_u16(0),
            Some(matrix) => {
                debug_assert_eq!(matrix.values.len() as u64,
                    u64::from(matrix.height) * u64::from(matrix.width));
                out.put_u16(matrix.wire_size() as u16);
                out.put_u32(matrix.height);
                out.put_u32(matrix.width);
                for &value in &matrix.values {
                    out.put_u32(value);
                }
            },
        }
    }

    /// Read the record from an input cursor.
    pub fn deserialize(input: &mut BufferReader<'_>) -> Result<Self> {
        let name = input.get_string()?;
        let zone_type = ZoneType::decode(input.get_u32()?)?;
        let leds_min = input.get_u32()?;
        let leds_max = input.get_u32()?;
        let leds_count = input.get_u32()?;
        let matrix_length = input.get_u16()?;

        let matrix = if matrix_length == 0 {
            None
        } else {
            let height = input.get_u32()?;
            let width = input.get_u32()?;
            let cells = u64::from(height) * u64::from(width);
            let computed = 8 + 4 * cells;
            if computed != u64::from(matrix_length) {
                return Err(ProtocolError::MatrixSizeMismatch {
                    declared: matrix_length,
                    computed,
                });
            }
            let mut values = Vec::with_capacity(cells as usize);
            for _ in 0..cells {
                values.push(input.get_u32()?);
            }
            Some(ZoneMatrix { height, width, values })
        };

        Ok(Self { name, zone_type, leds_min, leds_max, leds_count, matrix })
    }
}

/// One addressable LED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedDescription {
    /// Display name of the LED
    pub name: String,
    /// Device-specific LED identifier
    pub value: u32,
}

impl LedDescription {
    /// Exact number of bytes `serialize` will produce.
    #[must_use]
    pub fn calc_size(&self) -> usize {
        string_wire_size(&self.name) + 4
    }

    /// Write the record to an output cursor.
    pub fn serialize(&self, out: &mut BufferWriter) {
        out.put_string(&self.name);
        out.put_u32(self.value);
    }

    /// Read the record from an input cursor.
    pub fn deserialize(input: &mut BufferReader<'_>) -> Result<Self> {
        Ok(Self { name: input.get_string()?, value: input.get_u32()? })
    }
}

/// Everything the server knows about one controller.
///
/// # Invariants
///
/// Enforced during deserialization:
///
/// - `active_mode` indexes into `modes`
/// - `colors` has exactly one entry per LED
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescription {
    /// What kind of device this controller drives
    pub device_type: DeviceType,
    /// Display name
    pub name: String,
    /// Vendor name
    pub vendor: String,
    /// Free-form description
    pub description: String,
    /// Firmware or driver version
    pub version: String,
    /// Serial number
    pub serial: String,
    /// Bus location
    pub location: String,
    /// Index of the currently active mode
    pub active_mode: u32,
    /// Supported lighting modes
    pub modes: Vec<ModeDescription>,
    /// LED zones; zones partition the LED array
    pub zones: Vec<ZoneDescription>,
    /// Addressable LEDs
    pub leds: Vec<LedDescription>,
    /// Current color of every LED, parallel to `leds`
    pub colors: Vec<Color>,
}

impl DeviceDescription {
    /// Exact number of bytes `serialize` will produce.
    #[must_use]
    pub fn calc_size(&self) -> usize {
        4 + string_wire_size(&self.name)
            + string_wire_size(&self.vendor)
            + string_wire_size(&self.description)
            + string_wire_size(&self.version)
            + string_wire_size(&self.serial)
            + string_wire_size(&self.location)
            + 4
            + 2 + self.modes.iter().map(ModeDescription::calc_size).sum::<usize>()
            + 2 + self.zones.iter().map(ZoneDescription::calc_size).sum::<usize>()
            + 2 + self.leds.iter().map(LedDescription::calc_size).sum::<usize>()
            + color_list_wire_size(&self.colors)
    }

    /// Write the record to an output cursor.
    pub fn serialize(&self, out: &mut BufferWriter) {
        out.put_u32(self.device_type.to_u32());
        out.put_string(&self.name);
        out.put_string(&self.vendor);
        out.put_string(&self.description);
        out.put_string(&self.version);
        out.put_string(&self.serial);
        out.put_string(&self.location);
        out.put_u32(self.active_mode);

        out.put_u16(self.modes.len() as u16);
        for mode in &self.modes {
            mode.serialize(out);
        }
        out.put_u16(self.zones.len() as u16);
        for zone in &self.zones {
            zone.serialize(out);
        }
        out.put_u16(self.leds.len() as u16);
        for led in &self.leds {
            led.serialize(out);
        }
        out.put_color_list(&self.colors);
    }

    /// Read the record from an input cursor.
    pub fn deserialize(input: &mut BufferReader<'_>) -> Result<Self> {
        let device_type = DeviceType::decode(input.get_u32()?)?;
        let name = input.get_string()?;
        let vendor = input.get_string()?;
        let description = input.get_string()?;
        let version = input.get_string()?;
        let serial = input.get_string()?;
        let location = input.get_string()?;
        let active_mode = input.get_u32()?;

        let mode_count = usize::from(input.get_u16()?);
        let mut modes = Vec::with_capacity(mode_count);
        for _ in 0..mode_count {
            modes.push(ModeDescription::deserialize(input)?);
        }

        let zone_count = usize::from(input.get_u16()?);
        let mut zones = Vec::with_capacity(zone_count);
        for _ in 0..zone_count {
            zones.push(ZoneDescription::deserialize(input)?);
        }

        let led_count = usize::from(input.get_u16()?);
        let mut leds = Vec::with_capacity(led_count);
        for _ in 0..led_count {
            leds.push(LedDescription::deserialize(input)?);
        }

        let colors = input.get_color_list()?;

        if active_mode as usize >= modes.len() {
            return Err(ProtocolError::ActiveModeOutOfRange {
                active_mode,
                modes: modes.len(),
            });
        }
        if colors.len() != leds.len() {
            return Err(ProtocolError::ColorCountMismatch {
                colors: colors.len(),
                leds: leds.len(),
            });
        }

        Ok(Self {
            device_type,
            name,
            vendor,
            description,
            version,
            serial,
            location,
            active_mode,
            modes,
            zones,
            leds,
            colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mode() -> ModeDescription {
        ModeDescription {
            name: "Breathing".to_string(),
            value: 2,
            flags: ModeFlags::HAS_SPEED | ModeFlags::HAS_MODE_SPECIFIC_COLOR,
            speed_min: 0,
            speed_max: 100,
            colors_min: 1,
            colors_max: 2,
            speed: 50,
            direction: Direction::Left,
            color_mode: ColorMode::ModeSpecific,
            colors: vec![Color::new(255, 0, 0), Color::new(0, 0, 255)],
        }
    }

    fn sample_device() -> DeviceDescription {
        DeviceDescription {
            device_type: DeviceType::Keyboard,
            name: "Test Keyboard".to_string(),
            vendor: "Acme".to_string(),
            description: "A keyboard".to_string(),
            version: "1.0".to_string(),
            serial: "KB-001".to_string(),
            location: "/dev/hidraw0".to_string(),
            active_mode: 0,
            modes: vec![sample_mode()],
            zones: vec![ZoneDescription {
                name: "Keys".to_string(),
                zone_type: ZoneType::Matrix,
                leds_min: 2,
                leds_max: 2,
                leds_count: 2,
                matrix: Some(ZoneMatrix { height: 1, width: 2, values: vec![0, 1] }),
            }],
            leds: vec![
                LedDescription { name: "Key A".to_string(), value: 0 },
                LedDescription { name: "Key B".to_string(), value: 1 },
            ],
            colors: vec![Color::new(1, 2, 3), Color::new(4, 5, 6)],
        }
    }

    fn round_trip_mode(mode: &ModeDescription) -> ModeDescription {
        let mut out = BufferWriter::with_capacity(mode.calc_size());
        mode.serialize(&mut out);
        let bytes = out.freeze();
        assert_eq!(bytes.len(), mode.calc_size());

        let mut input = BufferReader::new(&bytes);
        let parsed = ModeDescription::deserialize(&mut input).expect("should deserialize");
        assert!(input.is_exhausted());
        parsed
    }

    #[test]
    fn mode_round_trip() {
        let mode = sample_mode();
        assert_eq!(round_trip_mode(&mode), mode);
    }

    #[test]
    fn mode_unknown_flag_bits_survive() {
        let mut mode = sample_mode();
        mode.flags = ModeFlags::from_u32(0x8000_0001);
        assert_eq!(round_trip_mode(&mode).flags.to_u32(), 0x8000_0001);
    }

    #[test]
    fn mode_empty_color_list() {
        let mut mode = sample_mode();
        mode.colors.clear();
        mode.color_mode = ColorMode::None;
        assert_eq!(round_trip_mode(&mode), mode);
    }

    #[test]
    fn mode_rejects_bad_color_mode() {
        let mode = sample_mode();
        let mut out = BufferWriter::new();
        mode.serialize(&mut out);
        let mut bytes = out.freeze().to_vec();
        // color_mode is the last u32 before the color list
        let offset = mode.calc_size() - color_list_wire_size(&mode.colors) - 4;
        bytes[offset..offset + 4].copy_from_slice(&9u32.to_le_bytes());

        let mut input = BufferReader::new(&bytes);
        let err = ModeDescription::deserialize(&mut input).unwrap_err();
        assert_eq!(err, ProtocolError::InvalidEnum { kind: "ColorMode", value: 9 });
    }

    #[test]
    fn zone_without_matrix() {
        let zone = ZoneDescription {
            name: "Strip".to_string(),
            zone_type: ZoneType::Linear,
            leds_min: 0,
            leds_max: 30,
            leds_count: 10,
            matrix: None,
        };
        let mut out = BufferWriter::new();
        zone.serialize(&mut out);
        let bytes = out.freeze();
        assert_eq!(bytes.len(), zone.calc_size());

        let mut input = BufferReader::new(&bytes);
        assert_eq!(ZoneDescription::deserialize(&mut input).unwrap(), zone);
    }

    #[test]
    fn zone_with_matrix() {
        let zone = ZoneDescription {
            name: "Grid".to_string(),
            zone_type: ZoneType::Matrix,
            leds_min: 6,
            leds_max: 6,
            leds_count: 6,
            matrix: Some(ZoneMatrix { height: 2, width: 3, values: vec![0, 1, 2, 3, 4, 5] }),
        };
        let mut out = BufferWriter::new();
        zone.serialize(&mut out);
        let bytes = out.freeze();
        assert_eq!(bytes.len(), zone.calc_size());

        let mut input = BufferReader::new(&bytes);
        let parsed = ZoneDescription::deserialize(&mut input).unwrap();
        assert_eq!(parsed, zone);
        // declared matrix_length covers dimensions plus cells
        assert_eq!(parsed.matrix.unwrap().wire_size(), 8 + 4 * 6);
    }

    #[test]
    fn zone_rejects_inconsistent_matrix_length() {
        let zone = ZoneDescription {
            name: "Grid".to_string(),
            zone_type: ZoneType::Matrix,
            leds_min: 4,
            leds_max: 4,
            leds_count: 4,
            matrix: Some(ZoneMatrix { height: 2, width: 2, values: vec![0, 1, 2, 3] }),
        };
        let mut out = BufferWriter::new();
        zone.serialize(&mut out);
        let mut bytes = out.freeze().to_vec();
        // matrix_length sits right after name + 4 u32 fields
        let offset = string_wire_size(&zone.name) + 16;
        bytes[offset..offset + 2].copy_from_slice(&25u16.to_le_bytes());

        let mut input = BufferReader::new(&bytes);
        let err = ZoneDescription::deserialize(&mut input).unwrap_err();
        assert_eq!(err, ProtocolError::MatrixSizeMismatch { declared: 25, computed: 24 });
    }

    #[test]
    fn led_round_trip() {
        let led = LedDescription { name: "LED 1".to_string(), value: 42 };
        let mut out = BufferWriter::new();
        led.serialize(&mut out);
        let bytes = out.freeze();
        assert_eq!(bytes.len(), led.calc_size());

        let mut input = BufferReader::new(&bytes);
        assert_eq!(LedDescription::deserialize(&mut input).unwrap(), led);
    }

    #[test]
    fn device_round_trip() {
        let device = sample_device();
        let mut out = BufferWriter::with_capacity(device.calc_size());
        device.serialize(&mut out);
        let bytes = out.freeze();
        assert_eq!(bytes.len(), device.calc_size());

        let mut input = BufferReader::new(&bytes);
        let parsed = DeviceDescription::deserialize(&mut input).unwrap();
        assert!(input.is_exhausted());
        assert_eq!(parsed, device);
    }

    #[test]
    fn device_rejects_active_mode_out_of_range() {
        let mut device = sample_device();
        device.active_mode = 5;
        let mut out = BufferWriter::new();
        device.serialize(&mut out);
        let bytes = out.freeze();

        let mut input = BufferReader::new(&bytes);
        let err = DeviceDescription::deserialize(&mut input).unwrap_err();
        assert_eq!(err, ProtocolError::ActiveModeOutOfRange { active_mode: 5, modes: 1 });
    }

    #[test]
    fn device_rejects_color_led_count_mismatch() {
        let mut device = sample_device();
        device.colors.pop();
        let mut out = BufferWriter::new();
        device.serialize(&mut out);
        let bytes = out.freeze();

        let mut input = BufferReader::new(&bytes);
        let err = DeviceDescription::deserialize(&mut input).unwrap_err();
        assert_eq!(err, ProtocolError::ColorCountMismatch { colors: 1, leds: 2 });
    }
}

//! Typed protocol messages.
//!
//! Each variant of [`Message`] is one protocol operation; the frame header's
//! message type code is the only dispatcher. Requests and replies share a
//! code and are distinguished by direction, so decoding is explicit about
//! which peer produced the frame: [`Message::decode_from_server`] for a
//! client consuming inbound frames, [`Message::decode_from_client`] for a
//! server (or a test double) consuming outbound ones.
//!
//! # The `data_size` mirror
//!
//! Four messages (`ReplyControllerData`, `UpdateLeds`, `UpdateZoneLeds`,
//! `UpdateMode`) open their body with a 32-bit `data_size` that repeats the
//! header's `body_size`, and the mirror itself counts toward `body_size`.
//! The rule is legacy but unconditional: encoding writes it, decoding
//! rejects any disagreement between the two fields.

use crate::{
    Frame, Header, MessageType,
    codec::{BufferReader, BufferWriter, color_list_wire_size, string_wire_size},
    descriptions::{DeviceDescription, ModeDescription},
    errors::{ProtocolError, Result},
    types::Color,
};

/// All protocol messages, requests and replies alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Ask how many controllers the server manages
    RequestControllerCount,
    /// Reply carrying the controller count
    ReplyControllerCount {
        /// Number of controllers the server manages
        count: u32,
    },
    /// Ask for one controller's full description
    RequestControllerData {
        /// Protocol version the description should be encoded for
        protocol_version: u32,
    },
    /// Reply carrying one controller's full description
    ReplyControllerData {
        /// The controller's description tree
        device: DeviceDescription,
    },
    /// Announce the client's protocol version
    RequestProtocolVersion {
        /// Highest version the client implements
        client_version: u32,
    },
    /// Reply carrying the server's protocol version
    ReplyProtocolVersion {
        /// Highest version the server implements
        server_version: u32,
    },
    /// Announce a human-readable client name
    SetClientName {
        /// Name shown in the server's client list
        name: String,
    },
    /// Server notification that its device list changed
    DeviceListUpdated,
    /// Resize an LED zone
    ResizeZone {
        /// Zone to resize
        zone_idx: u32,
        /// New LED count
        new_size: u32,
    },
    /// Set every LED color on a controller
    UpdateLeds {
        /// One color per LED, in LED array order
        colors: Vec<Color>,
    },
    /// Set every LED color within one zone
    UpdateZoneLeds {
        /// Target zone
        zone_idx: u32,
        /// One color per LED in the zone
        colors: Vec<Color>,
    },
    /// Set one LED's color
    UpdateSingleLed {
        /// Index into the controller's flat LED array
        led_idx: u32,
        /// New color
        color: Color,
    },
    /// Switch a controller to its direct-control mode
    SetCustomMode,
    /// Replace one mode's parameters
    UpdateMode {
        /// Index of the mode to update
        mode_idx: u32,
        /// Replacement parameters
        mode: ModeDescription,
    },
}

impl Message {
    /// The wire code for this message.
    #[must_use]
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::RequestControllerCount | Self::ReplyControllerCount { .. } => {
                MessageType::RequestControllerCount
            },
            Self::RequestControllerData { .. } | Self::ReplyControllerData { .. } => {
                MessageType::RequestControllerData
            },
            Self::RequestProtocolVersion { .. } | Self::ReplyProtocolVersion { .. } => {
                MessageType::RequestProtocolVersion
            },
            Self::SetClientName { .. } => MessageType::SetClientName,
            Self::DeviceListUpdated => MessageType::DeviceListUpdated,
            Self::ResizeZone { .. } => MessageType::ResizeZone,
            Self::UpdateLeds { .. } => MessageType::UpdateLeds,
            Self::UpdateZoneLeds { .. } => MessageType::UpdateZoneLeds,
            Self::UpdateSingleLed { .. } => MessageType::UpdateSingleLed,
            Self::SetCustomMode => MessageType::SetCustomMode,
            Self::UpdateMode { .. } => MessageType::UpdateMode,
        }
    }

    /// Exact body length this message serializes to, mirror field included.
    #[must_use]
    pub fn body_size(&self) -> usize {
        match self {
            Self::RequestControllerCount | Self::DeviceListUpdated | Self::SetCustomMode => 0,
            Self::ReplyControllerCount { .. }
            | Self::RequestControllerData { .. }
            | Self::RequestProtocolVersion { .. }
            | Self::ReplyProtocolVersion { .. } => 4,
            Self::ReplyControllerData { device } => 4 + device.calc_size(),
            Self::SetClientName { name } => string_wire_size(name),
            Self::ResizeZone { .. } | Self::UpdateSingleLed { .. } => 8,
            Self::UpdateLeds { colors } => 4 + color_list_wire_size(colors),
            Self::UpdateZoneLeds { colors, .. } => 8 + color_list_wire_size(colors),
            Self::UpdateMode { mode, .. } => 8 + mode.calc_size(),
        }
    }

    fn encode_body(&self, out: &mut BufferWriter) {
        let data_size = self.body_size() as u32;
        match self {
            Self::RequestControllerCount | Self::DeviceListUpdated | Self::SetCustomMode => {},
            Self::ReplyControllerCount { count } => out.put_u32(*count),
            Self::RequestControllerData { protocol_version } => out.put_u32(*protocol_version),
            Self::ReplyControllerData { device } => {
                out.put_u32(data_size);
                device.serialize(out);
            },
            Self::RequestProtocolVersion { client_version } => out.put_u32(*client_version),
            Self::ReplyProtocolVersion { server_version } => out.put_u32(*server_version),
            Self::SetClientName { name } => out.put_string(name),
            Self::ResizeZone { zone_idx, new_size } => {
                out.put_u32(*zone_idx);
                out.put_u32(*new_size);
            },
            Self::UpdateLeds { colors } => {
                out.put_u32(data_size);
                out.put_color_list(colors);
            },
            Self::UpdateZoneLeds { zone_idx, colors } => {
                out.put_u32(data_size);
                out.put_u32(*zone_idx);
                out.put_color_list(colors);
            },
            Self::UpdateSingleLed { led_idx, color } => {
                out.put_u32(*led_idx);
                out.put_color(*color);
            },
            Self::UpdateMode { mode_idx, mode } => {
                out.put_u32(data_size);
                out.put_u32(*mode_idx);
                mode.serialize(out);
            },
        }
    }

    /// Build the complete frame for this message, addressed to a device.
    ///
    /// The header's `body_size` and any `data_size` mirror are derived from
    /// the message contents, so the two can never disagree on the way out.
    #[must_use]
    pub fn to_frame(&self, device_idx: u32) -> Frame {
        let mut out = BufferWriter::with_capacity(self.body_size());
        self.encode_body(&mut out);
        debug_assert_eq!(out.len(), self.body_size());
        Frame::new(Header::new(self.message_type(), device_idx), out.freeze())
    }

    /// Decode a frame the server sent to a client.
    ///
    /// # Errors
    ///
    /// Fails on any codec error, on a `data_size` mirror mismatch, on
    /// leftover body bytes, and on codes the server never originates.
    pub fn decode_from_server(frame: &Frame) -> Result<Self> {
        let message_type = known_type(&frame.header)?;
        let mut input = BufferReader::new(&frame.body);

        let message = match message_type {
            MessageType::RequestControllerCount => {
                Self::ReplyControllerCount { count: input.get_u32()? }
            },
            MessageType::RequestControllerData => {
                check_data_size(&frame.header, input.get_u32()?)?;
                Self::ReplyControllerData {
                    device: DeviceDescription::deserialize(&mut input)?,
                }
            },
            MessageType::RequestProtocolVersion => {
                Self::ReplyProtocolVersion { server_version: input.get_u32()? }
            },
            MessageType::DeviceListUpdated => Self::DeviceListUpdated,
            other => return Err(ProtocolError::WrongDirection(other.to_u32())),
        };

        finish(input, message)
    }

    /// Decode a frame a client sent to the server.
    ///
    /// # Errors
    ///
    /// Fails on any codec error, on a `data_size` mirror mismatch, on
    /// leftover body bytes, and on codes a client never originates.
    pub fn decode_from_client(frame: &Frame) -> Result<Self> {
        let message_type = known_type(&frame.header)?;
        let mut input = BufferReader::new(&frame.body);

        let message = match message_type {
            MessageType::RequestControllerCount => Self::RequestControllerCount,
            MessageType::RequestControllerData => {
                Self::RequestControllerData { protocol_version: input.get_u32()? }
            },
            MessageType::RequestProtocolVersion => {
                Self::RequestProtocolVersion { client_version: input.get_u32()? }
            },
            MessageType::SetClientName => Self::SetClientName { name: input.get_string()? },
            MessageType::ResizeZone => Self::ResizeZone {
                zone_idx: input.get_u32()?,
                new_size: input.get_u32()?,
            },
            MessageType::UpdateLeds => {
                check_data_size(&frame.header, input.get_u32()?)?;
                Self::UpdateLeds { colors: input.get_color_list()? }
            },
            MessageType::UpdateZoneLeds => {
                check_data_size(&frame.header, input.get_u32()?)?;
                Self::UpdateZoneLeds {
                    zone_idx: input.get_u32()?,
                    colors: input.get_color_list()?,
                }
            },
            MessageType::UpdateSingleLed => Self::UpdateSingleLed {
                led_idx: input.get_u32()?,
                color: input.get_color()?,
            },
            MessageType::SetCustomMode => Self::SetCustomMode,
            MessageType::UpdateMode => {
                check_data_size(&frame.header, input.get_u32()?)?;
                Self::UpdateMode {
                    mode_idx: input.get_u32()?,
                    mode: ModeDescription::deserialize(&mut input)?,
                }
            },
            MessageType::DeviceListUpdated => {
                return Err(ProtocolError::WrongDirection(message_type.to_u32()));
            },
        };

        finish(input, message)
    }
}

fn known_type(header: &Header) -> Result<MessageType> {
    header
        .message_type_enum()
        .ok_or(ProtocolError::UnknownMessageType(header.message_type()))
}

fn check_data_size(header: &Header, data_size: u32) -> Result<()> {
    if data_size != header.body_size() {
        return Err(ProtocolError::DataSizeMismatch {
            header: header.body_size(),
            body: data_size,
        });
    }
    Ok(())
}

fn finish(input: BufferReader<'_>, message: Message) -> Result<Message> {
    if !input.is_exhausted() {
        return Err(ProtocolError::TrailingBytes(input.remaining()));
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_size_matches_encoded_length() {
        let messages = [
            Message::RequestControllerCount,
            Message::ReplyControllerCount { count: 7 },
            Message::RequestControllerData { protocol_version: 1 },
            Message::RequestProtocolVersion { client_version: 1 },
            Message::SetClientName { name: "foo".to_string() },
            Message::DeviceListUpdated,
            Message::ResizeZone { zone_idx: 1, new_size: 16 },
            Message::UpdateLeds { colors: vec![Color::new(1, 2, 3)] },
            Message::UpdateZoneLeds { zone_idx: 0, colors: vec![] },
            Message::UpdateSingleLed { led_idx: 5, color: Color::new(0xFF, 0x80, 0x00) },
            Message::SetCustomMode,
        ];
        for message in messages {
            let frame = message.to_frame(0);
            assert_eq!(frame.body.len(), message.body_size(), "{message:?}");
            assert_eq!(frame.header.body_size() as usize, message.body_size());
        }
    }

    #[test]
    fn controller_count_request_is_bare_header() {
        let frame = Message::RequestControllerCount.to_frame(0);
        let mut wire = Vec::new();
        frame.encode(&mut wire);
        assert_eq!(
            wire,
            [
                0x4F, 0x52, 0x47, 0x42, // "ORGB"
                0x00, 0x00, 0x00, 0x00, // device_idx
                0x00, 0x00, 0x00, 0x00, // message_type 0
                0x00, 0x00, 0x00, 0x00, // body_size 0
            ]
        );
    }

    #[test]
    fn update_single_led_wire_bytes() {
        let message = Message::UpdateSingleLed { led_idx: 5, color: Color::new(0xFF, 0x80, 0x00) };
        let frame = message.to_frame(2);
        assert_eq!(frame.header.device_idx(), 2);
        assert_eq!(&frame.body[..], &[0x05, 0, 0, 0, 0xFF, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn set_client_name_counts_terminator() {
        let message = Message::SetClientName { name: "foo".to_string() };
        let frame = message.to_frame(0);
        assert_eq!(frame.header.body_size(), 6);
        assert_eq!(&frame.body[..], &[0x04, 0x00, 0x66, 0x6F, 0x6F, 0x00]);
    }

    #[test]
    fn update_leds_mirrors_body_size() {
        let message = Message::UpdateLeds {
            colors: vec![Color::new(1, 2, 3), Color::new(4, 5, 6)],
        };
        let frame = message.to_frame(0);
        // data_size (4) + count (2) + 2 colors (8)
        assert_eq!(frame.header.body_size(), 14);
        assert_eq!(&frame.body[..4], &14u32.to_le_bytes());

        let decoded = Message::decode_from_client(&frame).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn tampered_data_size_is_rejected() {
        let message = Message::UpdateLeds { colors: vec![Color::new(1, 2, 3)] };
        let frame = message.to_frame(0);

        let mut body = frame.body.to_vec();
        body[0..4].copy_from_slice(&99u32.to_le_bytes());
        let tampered = Frame { header: frame.header, body: body.into() };
        assert_eq!(
            Message::decode_from_client(&tampered).unwrap_err(),
            ProtocolError::DataSizeMismatch { header: 10, body: 99 }
        );
    }

    #[test]
    fn tampered_body_size_is_rejected() {
        let message = Message::UpdateZoneLeds { zone_idx: 1, colors: vec![] };
        let mut frame = message.to_frame(0);
        // grow the header's claim without touching the mirror
        frame.header.body_size = (frame.body.len() as u32 + 4).to_le_bytes();
        assert!(matches!(
            Message::decode_from_client(&frame).unwrap_err(),
            ProtocolError::DataSizeMismatch { .. }
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let frame = Message::ReplyControllerCount { count: 1 }.to_frame(0);
        let mut body = frame.body.to_vec();
        body.extend_from_slice(&[0xEE, 0xEE]);
        let padded = Frame::new(frame.header, body);
        assert_eq!(
            Message::decode_from_server(&padded).unwrap_err(),
            ProtocolError::TrailingBytes(2)
        );
    }

    #[test]
    fn direction_matters_for_shared_codes() {
        let reply = Message::ReplyControllerCount { count: 3 }.to_frame(0);
        assert_eq!(
            Message::decode_from_server(&reply).unwrap(),
            Message::ReplyControllerCount { count: 3 }
        );

        let request = Message::RequestControllerCount.to_frame(0);
        assert_eq!(
            Message::decode_from_client(&request).unwrap(),
            Message::RequestControllerCount
        );
    }

    #[test]
    fn server_never_sends_update_leds() {
        let frame = Message::UpdateLeds { colors: vec![] }.to_frame(0);
        assert_eq!(
            Message::decode_from_server(&frame).unwrap_err(),
            ProtocolError::WrongDirection(MessageType::UpdateLeds.to_u32())
        );
    }

    #[test]
    fn client_never_sends_device_list_updated() {
        let frame = Message::DeviceListUpdated.to_frame(0);
        assert_eq!(
            Message::decode_from_client(&frame).unwrap_err(),
            ProtocolError::WrongDirection(MessageType::DeviceListUpdated.to_u32())
        );
    }
}

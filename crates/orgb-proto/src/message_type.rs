//! Message type codes for OpenRGB protocol frames.
//!
//! Each code identifies one protocol operation. Requests and their replies
//! share a code; the two are distinguished purely by direction, so a client
//! must remember what it sent to know what an inbound frame of that code
//! means.

/// Frame message type codes
///
/// Serialized as a little-endian `u32` in the frame header. `#[repr(u32)]`
/// pins the numeric values for wire compatibility.
///
/// Unknown codes MUST be treated as protocol errors, not silently ignored;
/// `from_u32` returns `None` so the caller can reject them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageType {
    /// Ask how many controllers the server manages / its reply
    RequestControllerCount = 0,
    /// Ask for one controller's full description / its reply
    RequestControllerData = 1,
    /// Announce the client's protocol version / the server's version reply
    RequestProtocolVersion = 40,
    /// Announce a human-readable client name
    SetClientName = 50,
    /// Server notification that its device list changed
    DeviceListUpdated = 100,
    /// Resize an LED zone
    ResizeZone = 1000,
    /// Set every LED color on a controller
    UpdateLeds = 1050,
    /// Set every LED color within one zone
    UpdateZoneLeds = 1051,
    /// Set one LED's color
    UpdateSingleLed = 1052,
    /// Switch a controller to its direct-control mode
    SetCustomMode = 1100,
    /// Replace one mode's parameters
    UpdateMode = 1101,
}

impl MessageType {
    /// Convert to the raw wire code.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Convert from the raw wire code.
    ///
    /// Returns `None` if the value doesn't correspond to a known code.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::RequestControllerCount),
            1 => Some(Self::RequestControllerData),
            40 => Some(Self::RequestProtocolVersion),
            50 => Some(Self::SetClientName),
            100 => Some(Self::DeviceListUpdated),
            1000 => Some(Self::ResizeZone),
            1050 => Some(Self::UpdateLeds),
            1051 => Some(Self::UpdateZoneLeds),
            1052 => Some(Self::UpdateSingleLed),
            1100 => Some(Self::SetCustomMode),
            1101 => Some(Self::UpdateMode),
            _ => None,
        }
    }

    /// Whether a request of this code is answered by a reply frame.
    #[must_use]
    pub const fn expects_reply(self) -> bool {
        matches!(
            self,
            Self::RequestControllerCount
                | Self::RequestControllerData
                | Self::RequestProtocolVersion
        )
    }

    /// Whether this code is only ever initiated by the server.
    #[must_use]
    pub const fn is_notification(self) -> bool {
        matches!(self, Self::DeviceListUpdated)
    }
}

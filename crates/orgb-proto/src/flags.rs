//! Mode capability flags.
//!
//! Flags declare which of a mode's attributes are meaningful: whether it has
//! an adjustable speed, which direction axes it supports, and how its colors
//! are chosen.

use bitflags::bitflags;

bitflags! {
    /// Mode capability flags (32 bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeFlags: u32 {
        /// The speed attribute is present
        const HAS_SPEED = 1 << 0;

        /// The direction attribute can be LEFT or RIGHT
        const HAS_DIRECTION_LR = 1 << 1;

        /// The direction attribute can be UP or DOWN
        const HAS_DIRECTION_UD = 1 << 2;

        /// The direction attribute can be HORIZONTAL or VERTICAL
        const HAS_DIRECTION_HV = 1 << 3;

        /// The brightness attribute is present
        const HAS_BRIGHTNESS = 1 << 4;

        /// The color mode can be set to per-LED
        const HAS_PER_LED_COLOR = 1 << 5;

        /// The color mode can be set to mode-specific
        const HAS_MODE_SPECIFIC_COLOR = 1 << 6;

        /// The color mode can be set to random
        const HAS_RANDOM_COLOR = 1 << 7;
    }
}

impl ModeFlags {
    /// Any of the three direction capability bits
    pub const DIRECTION_MASK: Self = Self::HAS_DIRECTION_LR
        .union(Self::HAS_DIRECTION_UD)
        .union(Self::HAS_DIRECTION_HV);

    /// Create flags from the raw wire value.
    ///
    /// This function is **infallible**: unknown bits are preserved so they
    /// survive a round-trip unchanged, but they are ignored during flag
    /// checks. Future protocol versions can define new bits without breaking
    /// older clients.
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Self::from_bits_retain(value)
    }

    /// Convert to the raw wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self.bits()
    }

    /// Whether the mode supports any direction axis.
    #[must_use]
    pub const fn has_direction(self) -> bool {
        self.intersects(Self::DIRECTION_MASK)
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

//! Interaction mode types.
//!
//! [`LocationSelection`] is the coordinate-source state machine for the add
//! form. It is a single tagged variant, so "pin dropped" and "using device
//! location" can never both hold.
//!
//! ```text
//!            request pin drop                surface tap
//!   Idle ─────────────────────▶ PinDropArmed ───────────▶ PinDropped(c)
//!    │  ▲                             ▲                        │
//!    │  │ failure / create / abandon  │ request pin drop       │ use device location
//!    ▼  │                             │                        ▼
//!   AwaitingDeviceLocation ───────────┴──────────▶ UsingDeviceLocation(c)
//!                         reading received
//! ```

use crate::domain::Coordinate;

/// Where the coordinate for a new listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationSelection {
    /// No coordinate source selected.
    #[default]
    Idle,

    /// The next map surface tap supplies the coordinate.
    PinDropArmed,

    /// A pin was dropped at this coordinate.
    PinDropped(Coordinate),

    /// A device reading was requested and has not arrived yet.
    AwaitingDeviceLocation,

    /// The device reported this coordinate.
    UsingDeviceLocation(Coordinate),
}

impl LocationSelection {
    /// The coordinate a submitted listing would use, if any.
    #[must_use]
    pub const fn selected_coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::PinDropped(c) | Self::UsingDeviceLocation(c) => Some(*c),
            Self::Idle | Self::PinDropArmed | Self::AwaitingDeviceLocation => None,
        }
    }

    /// Whether map taps are placement input rather than marker selection.
    #[must_use]
    pub const fn placement_mode(&self) -> bool {
        matches!(self, Self::PinDropArmed)
    }

    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingDeviceLocation)
    }

    /// Short state name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PinDropArmed => "pin_drop_armed",
            Self::PinDropped(_) => "pin_dropped",
            Self::AwaitingDeviceLocation => "awaiting_device_location",
            Self::UsingDeviceLocation(_) => "using_device_location",
        }
    }
}

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Map,
    List,
    Add,
}

/// Why a device reading was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPurpose {
    /// Refresh the user's position for distance ranking.
    UserPosition,
    /// Supply the coordinate for a new listing. Also refreshes the user's position.
    Placement,
}

//! Error taxonomy for location acquisition and landmark selection.
//!
//! Every variant renders as a short, actionable message meant to be shown
//! to the user as-is.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported by this device")]
    CapabilityMissing,

    #[error("Permission denied: allow location access and try again.")]
    PermissionDenied,

    #[error("Position unavailable: try again or move to an open area.")]
    PositionUnavailable,

    #[error("Timeout: unable to acquire position quickly. Try again.")]
    Timeout,

    #[error("Unable to read location: {0}")]
    Unknown(String),

    #[error("Invalid coordinate: {0}")]
    InvalidInput(String),
}

/// Stable category tags, independent of message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationErrorKind {
    CapabilityMissing,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
    InvalidInput,
}

impl LocationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationErrorKind::CapabilityMissing => "CAPABILITY_MISSING",
            LocationErrorKind::PermissionDenied => "PERMISSION_DENIED",
            LocationErrorKind::PositionUnavailable => "POSITION_UNAVAILABLE",
            LocationErrorKind::Timeout => "TIMEOUT",
            LocationErrorKind::Unknown => "UNKNOWN_LOCATION_ERROR",
            LocationErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }
}

impl LocationError {
    pub fn kind(&self) -> LocationErrorKind {
        match self {
            LocationError::CapabilityMissing => LocationErrorKind::CapabilityMissing,
            LocationError::PermissionDenied => LocationErrorKind::PermissionDenied,
            LocationError::PositionUnavailable => LocationErrorKind::PositionUnavailable,
            LocationError::Timeout => LocationErrorKind::Timeout,
            LocationError::Unknown(_) => LocationErrorKind::Unknown,
            LocationError::InvalidInput(_) => LocationErrorKind::InvalidInput,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Unknown landmark: {0}")]
    UnknownLandmark(String),

    #[error("Landmark name already in use: {0}")]
    DuplicateLandmark(String),

    #[error("Landmark name is reserved: {0}")]
    ReservedLandmarkName(String),

    #[error("At least one landmark is required")]
    NoLandmarks,

    #[error(transparent)]
    Location(#[from] LocationError),
}

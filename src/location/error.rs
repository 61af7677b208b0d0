//! Error types for the location subsystem.

use thiserror::Error;

use crate::device::DeviceError;

/// Errors that can occur in the location subsystem.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The service was started twice.
    #[error("Location service already started")]
    AlreadyStarted,

    /// A watch subscription is already live.
    #[error("Location watch already active")]
    WatchActive,

    /// Underlying device service failure.
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

/// Result type for location subsystem operations.
pub type LocationResult<T> = Result<T, LocationError>;

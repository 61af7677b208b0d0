//! Error types for device service operations.

use thiserror::Error;

/// Errors that can occur while driving platform device services.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The user denied the required location permission.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform failed to start or drive a location watch.
    #[error("Location watch failed: {0}")]
    Watch(String),

    /// The platform rejected or failed to schedule a notification.
    #[error("Failed to schedule notification: {0}")]
    Notification(String),

    /// The backend is shut down or otherwise unavailable.
    #[error("Device backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for device service operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

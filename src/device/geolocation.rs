//! Geolocation backend seam.
//!
//! The host platform owns the actual positioning hardware; the core only
//! sees a [`GeolocationBackend`] trait object that delivers fixes through
//! a channel. Mobile shells adapt their platform positioning plugin to
//! this trait; tests inject a scripted backend.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::error::DeviceResult;

/// Number of random bytes in a generated watcher id.
const WATCHER_ID_BYTES: usize = 8;

/// One raw fix from the device positioning service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    /// Latitude in decimal degrees.
    pub latitude: f64,

    /// Longitude in decimal degrees.
    pub longitude: f64,

    /// Reported horizontal accuracy in meters, when the platform has one.
    pub accuracy: Option<f64>,

    /// When the fix was captured (UTC).
    pub time: DateTime<Utc>,
}

impl RawLocation {
    /// Creates a fix captured now, without accuracy information.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            time: Utc::now(),
        }
    }
}

/// Options for a continuous watch subscription.
///
/// The background title and message feed the platform's persistent
/// "app is tracking you" notice, which several platforms require for
/// background positioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Title of the platform's background-tracking notice.
    pub background_title: String,

    /// Message of the platform's background-tracking notice.
    pub background_message: String,

    /// Whether to prompt the user when permissions are missing.
    pub request_permissions: bool,

    /// Whether cached (stale) fixes may be delivered before a fresh one.
    pub allow_stale: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            background_title: "Tracking location.".to_string(),
            background_message: "Cancel to prevent battery drain.".to_string(),
            request_permissions: true,
            allow_stale: false,
        }
    }
}

/// Opaque identifier of an active watch subscription.
///
/// Backends mint one per successful [`GeolocationBackend::watch`] call;
/// the only thing a holder can do with it is pass it back to
/// [`GeolocationBackend::unwatch`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatcherId(String);

impl WatcherId {
    /// Wraps a platform-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a random identifier, for backends that issue their own.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; WATCHER_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live watch subscription: the platform id plus the fix channel.
///
/// The sender side lives in the backend. Dropping it (usually on
/// `unwatch`) closes the channel and ends the consumer's drain loop.
#[derive(Debug)]
pub struct WatchSubscription {
    /// Identifier to pass to [`GeolocationBackend::unwatch`].
    pub id: WatcherId,

    /// Stream of fixes. `None` means the platform produced a null fix;
    /// consumers treat it as "position currently unknown".
    pub fixes: mpsc::Receiver<Option<RawLocation>>,
}

/// Continuous positioning service of the host platform.
#[async_trait]
pub trait GeolocationBackend: Send + Sync {
    /// Starts a continuous watch, requesting permissions per `options`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::PermissionDenied`](super::DeviceError::PermissionDenied)
    /// when the user refuses the location permission, or another device
    /// error when the platform cannot start the watch.
    async fn watch(&self, options: &WatchOptions) -> DeviceResult<WatchSubscription>;

    /// Stops the watch with the given id. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform fails to release the watch.
    async fn unwatch(&self, id: &WatcherId) -> DeviceResult<()>;
}

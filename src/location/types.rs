//! Location sharing types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::FriendLocation;
use crate::device::{RawLocation, WatchOptions};

/// Default period of the sync loop.
const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);

/// Default range within which a friend counts as nearby, in kilometers.
const DEFAULT_NEARBY_THRESHOLD_KM: f64 = 0.1;

/// Default upper bound on a single location push.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Snapshot of the positions a map consumer renders.
///
/// Published by the location service after every sync tick. The user's
/// own position updates even on ticks whose push fails; the friend list
/// only changes when a push succeeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    /// Last known device position, if any fix has arrived.
    pub user_location: Option<RawLocation>,

    /// Friends' latest reported samples from the most recent successful
    /// sync.
    pub friend_locations: Vec<FriendLocation>,
}

/// Tunables for the location service.
///
/// # Defaults
///
/// | Setting | Value |
/// |---------|-------|
/// | `sync_interval` | 10 s |
/// | `nearby_threshold_km` | 0.1 |
/// | `request_timeout` | 10 s |
/// | `watch` | [`WatchOptions::default`] |
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Period of the sync loop. The first tick fires one full period
    /// after activation.
    pub sync_interval: Duration,

    /// Range within which a friend counts as nearby, in kilometers.
    pub nearby_threshold_km: f64,

    /// Upper bound on a single location push. Also bounds how long a
    /// service shutdown can wait for an in-flight push.
    pub request_timeout: Duration,

    /// Options handed to the geolocation backend when watching starts.
    pub watch: WatchOptions,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            sync_interval: DEFAULT_SYNC_INTERVAL,
            nearby_threshold_km: DEFAULT_NEARBY_THRESHOLD_KM,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            watch: WatchOptions::default(),
        }
    }
}

impl LocationSettings {
    /// Sets the sync period.
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Sets the nearby threshold in kilometers.
    #[must_use]
    pub const fn with_nearby_threshold_km(mut self, threshold_km: f64) -> Self {
        self.nearby_threshold_km = threshold_km;
        self
    }

    /// Sets the per-push timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the watch options handed to the geolocation backend.
    #[must_use]
    pub fn with_watch(mut self, watch: WatchOptions) -> Self {
        self.watch = watch;
        self
    }
}

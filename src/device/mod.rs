//! Device service seams.
//!
//! The core never calls platform APIs directly. The host shell injects
//! implementations of these traits at startup and the services drive
//! them through trait objects:
//!
//! | Seam | Trait | Consumed by |
//! |------|-------|-------------|
//! | Positioning | [`GeolocationBackend`] | `location::LocationWatcher` |
//! | Notifications | [`NotificationBackend`] | `location::LocationService` |
//!
//! Tests use the scripted backends in [`testing`].

pub mod error;
pub mod geolocation;
pub mod notifications;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{DeviceError, DeviceResult};
pub use geolocation::{
    GeolocationBackend, RawLocation, WatchOptions, WatcherId, WatchSubscription,
};
pub use notifications::{LocalNotification, NotificationBackend};

//! Location sharing for TrainFriends.
//!
//! Everything between the device's positioning service and the friend
//! map lives here:
//!
//! - [`LocationWatcher`] keeps the single live watch subscription and a
//!   last-write-wins cell with the latest fix
//! - [`LocationService`] runs the periodic sync loop: push the fix,
//!   receive friends' samples, publish [`LocationState`]
//! - [`nearby`] computes which friends are within the proximity
//!   threshold and which ones just entered it
//! - [`alerts`] turns new entrants into a local notification
//!
//! # Behavior Summary
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | Sharing disabled | No watch subscription, no loop |
//! | Signed out | Loop runs, every tick skips before the remote call |
//! | No fix yet | Tick skips silently |
//! | Push fails | User position still updates; friends unchanged; retry next tick |
//! | Friend enters 0.1 km | One notification naming exactly the entrants |
//! | Friend leaves | No notification; stored set still updates |
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use trainfriends_core::location::{LocationService, LocationSettings};
//!
//! let service = LocationService::new(api, notifier, geolocation,
//!     auth.subscribe(), prefs, LocationSettings::default());
//! service.start().await?;
//!
//! let mut positions = service.subscribe();
//! while positions.changed().await.is_ok() {
//!     let state = positions.borrow().clone();
//!     println!("{} friends visible", state.friend_locations.len());
//! }
//! ```

pub mod alerts;
pub mod distance;
pub mod error;
pub mod nearby;
pub mod service;
pub mod types;
pub mod watcher;

pub use error::{LocationError, LocationResult};
pub use nearby::NearbySet;
pub use service::LocationService;
pub use types::{LocationSettings, LocationState};
pub use watcher::LocationWatcher;

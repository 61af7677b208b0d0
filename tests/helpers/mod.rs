//! Reusable test helpers for location service integration tests.
//!
//! These build a fully wired location service over scripted backends:
//! the fake server scripts the friend samples every sync returns, and
//! the fake geolocation backend delivers fixes on demand. No network or
//! platform access is involved; each rig gets its own temporary
//! preference directory.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;

use trainfriends_core::api::testing::FakeServerApi;
use trainfriends_core::api::{Coordinates, Credentials, FriendLocation, ServerApi};
use trainfriends_core::auth::AuthManager;
use trainfriends_core::device::testing::{FakeGeolocation, FakeNotifications};
use trainfriends_core::device::{
    GeolocationBackend, LocalNotification, NotificationBackend, RawLocation,
};
use trainfriends_core::location::{LocationService, LocationSettings};
use trainfriends_core::prefs::PreferenceStore;

/// Sync period used by [`rig`]: fast enough for tests, slow enough that
/// assertions between ticks are meaningful.
pub const SYNC_PERIOD: Duration = Duration::from_millis(20);

/// How long the polling helpers wait before declaring a test failed.
const WAIT_DEADLINE: Duration = Duration::from_secs(5);

/// Poll step for the waiting helpers.
const WAIT_STEP: Duration = Duration::from_millis(5);

/// A fully wired location service over scripted backends.
///
/// The temp directory backing the preference store is dropped with the
/// rig, so every test starts from default preferences.
pub struct TestRig {
    pub api: Arc<FakeServerApi>,
    pub geo: Arc<FakeGeolocation>,
    pub notifier: Arc<FakeNotifications>,
    pub auth: AuthManager,
    pub service: LocationService,
    _data_dir: TempDir,
}

impl TestRig {
    /// Signs in through the auth manager so the sync loop starts pushing.
    pub async fn sign_in(&self, username: &str) {
        self.auth
            .login(&Credentials::new(username, "pw"))
            .await
            .expect("should sign in");
    }
}

/// Builds a rig with a [`SYNC_PERIOD`] sync interval.
pub fn rig() -> TestRig {
    rig_with(
        LocationSettings::default()
            .with_sync_interval(SYNC_PERIOD)
            .with_request_timeout(Duration::from_secs(1)),
    )
}

/// Builds a rig with the given settings.
pub fn rig_with(settings: LocationSettings) -> TestRig {
    let api = Arc::new(FakeServerApi::new());
    let geo = Arc::new(FakeGeolocation::new());
    let notifier = Arc::new(FakeNotifications::new());
    let auth = AuthManager::new(Arc::clone(&api) as Arc<dyn ServerApi>);
    let data_dir = TempDir::new().expect("should create temp dir");
    let prefs = Arc::new(PreferenceStore::open(data_dir.path()));

    let service = LocationService::new(
        Arc::clone(&api) as Arc<dyn ServerApi>,
        Arc::clone(&notifier) as Arc<dyn NotificationBackend>,
        Arc::clone(&geo) as Arc<dyn GeolocationBackend>,
        auth.subscribe(),
        prefs,
        settings,
    );

    TestRig {
        api,
        geo,
        notifier,
        auth,
        service,
        _data_dir: data_dir,
    }
}

/// A friend sample reported just now.
pub fn sample(username: &str, latitude: f64, longitude: f64) -> FriendLocation {
    FriendLocation {
        username: username.to_string(),
        location: Coordinates::new(latitude, longitude),
        ts: Utc::now(),
    }
}

/// A device fix.
pub fn fix(latitude: f64, longitude: f64) -> RawLocation {
    RawLocation::new(latitude, longitude)
}

/// Polls `condition` until it holds, panicking with `what` on timeout.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT_DEADLINE;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return;
        }
        tokio::time::sleep(WAIT_STEP).await;
    }
    panic!("timed out waiting for {what}");
}

/// Waits until at least `count` alerts were scheduled, returning them.
pub async fn wait_for_alerts(
    notifier: &FakeNotifications,
    count: usize,
) -> Vec<LocalNotification> {
    let deadline = tokio::time::Instant::now() + WAIT_DEADLINE;
    while tokio::time::Instant::now() < deadline {
        let scheduled = notifier.scheduled().await;
        if scheduled.len() >= count {
            return scheduled;
        }
        tokio::time::sleep(WAIT_STEP).await;
    }
    panic!("timed out waiting for {count} scheduled alerts");
}

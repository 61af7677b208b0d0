//! Application core wiring.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiResult, HttpApi, ServerApi};
use crate::auth::AuthManager;
use crate::device::{GeolocationBackend, NotificationBackend};
use crate::location::{LocationResult, LocationService, LocationSettings};
use crate::prefs::PreferenceStore;

/// Configuration for [`TrainFriendsCore`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Base URL of the TrainFriends backend.
    pub base_url: String,

    /// Directory for locally persisted state (preferences).
    pub data_dir: PathBuf,

    /// Location service tunables.
    pub settings: LocationSettings,
}

impl CoreConfig {
    /// Creates a configuration with default location settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            data_dir: data_dir.into(),
            settings: LocationSettings::default(),
        }
    }

    /// Overrides the location settings.
    #[must_use]
    pub fn with_settings(mut self, settings: LocationSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Core interface for TrainFriends functionality.
///
/// The host shell constructs one instance at startup, injecting its
/// platform geolocation and notification backends, and then drives
/// everything through [`auth`](Self::auth), [`location`](Self::location)
/// and [`api`](Self::api).
///
/// # Example
///
/// ```rust,ignore
/// use trainfriends_core::{CoreConfig, TrainFriendsCore};
///
/// let config = CoreConfig::new("https://trainfriends.example.com/api", data_dir);
/// let core = TrainFriendsCore::new(&config, geolocation, notifications)?;
/// core.start().await?;
/// ```
pub struct TrainFriendsCore {
    api: Arc<HttpApi>,
    auth: AuthManager,
    location: LocationService,
}

impl TrainFriendsCore {
    /// Wires the HTTP client, preference store, auth manager, and
    /// location service together.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(
        config: &CoreConfig,
        geolocation: Arc<dyn GeolocationBackend>,
        notifications: Arc<dyn NotificationBackend>,
    ) -> ApiResult<Self> {
        let api = Arc::new(HttpApi::new(&config.base_url)?);
        let server_api: Arc<dyn ServerApi> = Arc::clone(&api) as Arc<dyn ServerApi>;

        let prefs = Arc::new(PreferenceStore::open(&config.data_dir));
        let auth = AuthManager::new(Arc::clone(&server_api));
        let location = LocationService::new(
            server_api,
            notifications,
            geolocation,
            auth.subscribe(),
            prefs,
            config.settings.clone(),
        );

        Ok(Self {
            api,
            auth,
            location,
        })
    }

    /// Boots the core: revalidates any existing session, then starts
    /// the location service.
    ///
    /// A failed session refresh is logged and ignored; the user simply
    /// starts signed out.
    ///
    /// # Errors
    ///
    /// Returns an error when the location service was already started.
    pub async fn start(&self) -> LocationResult<()> {
        if let Err(e) = self.auth.refresh().await {
            warn!(error = %e, "session refresh failed at startup");
        }
        self.location.start().await
    }

    /// Stops background work. Idempotent.
    pub async fn shutdown(&self) {
        self.location.stop().await;
    }

    /// The session manager.
    #[must_use]
    pub const fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// The location service.
    #[must_use]
    pub const fn location(&self) -> &LocationService {
        &self.location
    }

    /// The raw backend client, for calls the services do not wrap
    /// (friend listing and the friend-request flows).
    #[must_use]
    pub const fn api(&self) -> &Arc<HttpApi> {
        &self.api
    }
}

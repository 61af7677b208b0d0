//! Location sync service.
//!
//! Owns the periodic loop that reports the device position and reacts to
//! friends' positions:
//!
//! ```text
//!  geolocation backend ──fixes──▶ LocationWatcher ──latest fix──▶ tick
//!                                                                  │
//!                           POST /location  ◀──────────────────────┤
//!                           friend samples  ───▶ nearby diff ──▶ alert
//!                                          └───▶ LocationState (watch)
//! ```
//!
//! # Gating
//!
//! The watch subscription and the loop run only while sharing is
//! enabled; toggling the preference starts and stops both. Inside the
//! loop every tick additionally checks the authentication signal, so an
//! unauthenticated session never causes a remote call.
//!
//! # Tick discipline
//!
//! Ticks are serialized: a tick finishes, including its remote call,
//! before the next one can fire. A push that outlives the interval
//! delays later ticks, and missed ticks collapse instead of bursting.
//! The first tick fires one full period after activation.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{Coordinates, ServerApi};
use crate::auth::AuthState;
use crate::device::{DeviceError, GeolocationBackend, NotificationBackend};
use crate::prefs::PreferenceStore;

use super::alerts::proximity_alert;
use super::error::{LocationError, LocationResult};
use super::nearby::NearbySet;
use super::types::{LocationSettings, LocationState};
use super::watcher::LocationWatcher;

/// Periodically reports the device position to the backend and raises
/// alerts when friends newly come into range.
///
/// One instance exists per app session, owned by the composition root.
/// Consumers read positions through [`state`](Self::state) or
/// [`subscribe`](Self::subscribe) and control sharing through
/// [`set_location_enabled`](Self::set_location_enabled).
pub struct LocationService {
    api: Arc<dyn ServerApi>,
    notifier: Arc<dyn NotificationBackend>,
    watcher: Arc<LocationWatcher>,
    auth: watch::Receiver<AuthState>,
    prefs: Arc<PreferenceStore>,
    settings: LocationSettings,
    state: Arc<watch::Sender<LocationState>>,
    lifecycle: Mutex<Lifecycle>,
}

#[derive(Default)]
struct Lifecycle {
    started: bool,
    run: Option<RunningLoop>,
}

struct RunningLoop {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl LocationService {
    /// Creates a service. Nothing runs until [`start`](Self::start).
    #[must_use]
    pub fn new(
        api: Arc<dyn ServerApi>,
        notifier: Arc<dyn NotificationBackend>,
        geolocation: Arc<dyn GeolocationBackend>,
        auth: watch::Receiver<AuthState>,
        prefs: Arc<PreferenceStore>,
        settings: LocationSettings,
    ) -> Self {
        let watcher = Arc::new(LocationWatcher::new(geolocation, settings.watch.clone()));
        let (state, _) = watch::channel(LocationState::default());

        Self {
            api,
            notifier,
            watcher,
            auth,
            prefs,
            settings,
            state: Arc::new(state),
            lifecycle: Mutex::new(Lifecycle::default()),
        }
    }

    /// Starts the service.
    ///
    /// With sharing enabled this activates the watch subscription and
    /// the sync loop; with sharing disabled the service idles until
    /// [`set_location_enabled`](Self::set_location_enabled) re-enables
    /// it. A denied location permission is reported in the log and is
    /// not fatal: the loop runs but every tick skips for lack of a fix.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::AlreadyStarted`] when called on a
    /// service that is already started.
    pub async fn start(&self) -> LocationResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.started {
            return Err(LocationError::AlreadyStarted);
        }
        lifecycle.started = true;

        if self.prefs.location_enabled() {
            self.activate(&mut lifecycle).await;
        } else {
            debug!("location sharing disabled, service idle");
        }
        Ok(())
    }

    /// Stops the service and releases the watch subscription. Idempotent.
    ///
    /// Waits for an in-flight push to finish or time out; its result is
    /// discarded rather than applied to torn-down state.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if !lifecycle.started {
            return;
        }
        lifecycle.started = false;
        self.deactivate(&mut lifecycle).await;
    }

    /// Returns whether location sharing is enabled (persisted preference).
    #[must_use]
    pub fn location_enabled(&self) -> bool {
        self.prefs.location_enabled()
    }

    /// Enables or disables sharing, persists the choice, and starts or
    /// stops the watch and sync loop when the service is running.
    pub async fn set_location_enabled(&self, enabled: bool) {
        self.prefs.set_location_enabled(enabled);

        let mut lifecycle = self.lifecycle.lock().await;
        if !lifecycle.started {
            return;
        }

        if enabled {
            self.activate(&mut lifecycle).await;
        } else {
            self.deactivate(&mut lifecycle).await;
            info!("location sharing disabled");
        }
    }

    /// Returns a snapshot of the current positions.
    #[must_use]
    pub fn state(&self) -> LocationState {
        self.state.borrow().clone()
    }

    /// Subscribes to position snapshots.
    ///
    /// The receiver immediately holds the current value; `changed()`
    /// resolves after every tick that modified it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LocationState> {
        self.state.subscribe()
    }

    /// Returns whether the sync loop is currently running.
    pub async fn is_active(&self) -> bool {
        self.lifecycle.lock().await.run.is_some()
    }

    async fn activate(&self, lifecycle: &mut Lifecycle) {
        if lifecycle.run.is_some() {
            return;
        }

        match self.watcher.start().await {
            Ok(()) => {}
            Err(LocationError::Device(DeviceError::PermissionDenied)) => {
                // Terminal for this activation: no retry, the loop will
                // skip every tick for lack of a fix.
                warn!("location permission denied, syncing without a position");
            }
            Err(e) => warn!(error = %e, "failed to start location watch"),
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_sync_loop(SyncLoop {
            api: Arc::clone(&self.api),
            notifier: Arc::clone(&self.notifier),
            watcher: Arc::clone(&self.watcher),
            auth: self.auth.clone(),
            state: Arc::clone(&self.state),
            settings: self.settings.clone(),
            shutdown: shutdown_rx,
        }));

        lifecycle.run = Some(RunningLoop { shutdown, task });
        info!(
            interval_ms = self.settings.sync_interval.as_millis(),
            "location sync started"
        );
    }

    async fn deactivate(&self, lifecycle: &mut Lifecycle) {
        let Some(run) = lifecycle.run.take() else {
            return;
        };

        let _ = run.shutdown.send(true);
        if let Err(e) = run.task.await {
            warn!(error = %e, "sync loop task failed");
        }
        self.watcher.stop().await;
    }
}

/// Everything the loop task owns. Plain ownership keeps the spawned
/// future `'static` and the service free to drop independently.
struct SyncLoop {
    api: Arc<dyn ServerApi>,
    notifier: Arc<dyn NotificationBackend>,
    watcher: Arc<LocationWatcher>,
    auth: watch::Receiver<AuthState>,
    state: Arc<watch::Sender<LocationState>>,
    settings: LocationSettings,
    shutdown: watch::Receiver<bool>,
}

async fn run_sync_loop(mut ctx: SyncLoop) {
    let period = ctx.settings.sync_interval;
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Previous tick's nearby set, kept only for the entry diff.
    let mut nearby = NearbySet::new();

    loop {
        tokio::select! {
            changed = ctx.shutdown.changed() => {
                if changed.is_err() || *ctx.shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                run_tick(&mut ctx, &mut nearby).await;
                if *ctx.shutdown.borrow() {
                    break;
                }
            }
        }
    }

    debug!("sync loop stopped");
}

async fn run_tick(ctx: &mut SyncLoop, nearby: &mut NearbySet) {
    // Skip silently while signed out; the loop stays alive so a later
    // sign-in resumes syncing without restarting anything.
    if !ctx.auth.borrow().is_authenticated() {
        return;
    }

    // Skip silently when no fix has arrived yet (or the platform
    // cleared it). The previous nearby set is left untouched, so nobody
    // spuriously "leaves" while the position is unknown.
    let Some(fix) = ctx.watcher.latest_fix() else {
        return;
    };

    // The user's own position updates even when the push later fails.
    ctx.state.send_if_modified(|state| {
        if state.user_location == Some(fix) {
            false
        } else {
            state.user_location = Some(fix);
            true
        }
    });

    let position = Coordinates::new(fix.latitude, fix.longitude);
    let push = ctx.api.push_location(position);
    let samples = match tokio::time::timeout(ctx.settings.request_timeout, push).await {
        Ok(Ok(samples)) => samples,
        Ok(Err(e)) => {
            warn!(error = %e, "location sync failed");
            return;
        }
        Err(_) => {
            warn!(
                timeout_ms = ctx.settings.request_timeout.as_millis(),
                "location sync timed out"
            );
            return;
        }
    };

    // The service may have begun tearing down while the push was in
    // flight; discard the response instead of mutating dying state.
    if *ctx.shutdown.borrow() {
        return;
    }

    let next = NearbySet::within(position, &samples, ctx.settings.nearby_threshold_km);
    if next != *nearby {
        debug!(nearby = ?next.members(), "nearby friends changed");
    }

    let entered = next.entered_since(nearby);
    if let Some(alert) = proximity_alert(&entered) {
        info!(friends = ?entered, "friends newly nearby");
        if let Err(e) = ctx.notifier.schedule(alert).await {
            warn!(error = %e, "failed to schedule proximity alert");
        }
    }
    // Replace unconditionally: a shrinking set must not re-alert when
    // the remaining members stay in range.
    *nearby = next;

    ctx.state.send_if_modified(|state| {
        if state.friend_locations == samples {
            false
        } else {
            state.friend_locations = samples;
            true
        }
    });
}

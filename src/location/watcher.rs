//! Continuous location watch with a last-write-wins fix cell.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::device::{GeolocationBackend, RawLocation, WatchOptions, WatcherId};

use super::error::{LocationError, LocationResult};

/// Owns the single live watch subscription and the latest fix.
///
/// The backend delivers fixes through a channel; a drain task moves each
/// delivery into a single-slot cell, so only the most recent complete
/// fix is ever retained. A null delivery clears the cell. The cell
/// survives `stop`/`start` cycles: the last fix stays available while
/// the subscription is being re-established.
///
/// At most one subscription is live per watcher. Lifecycle transitions
/// are serialized behind an async mutex, so a `stop` racing a
/// still-pending `start` (for example during a permission prompt) waits
/// for it and releases the subscription exactly once.
pub struct LocationWatcher {
    backend: Arc<dyn GeolocationBackend>,
    options: WatchOptions,
    latest: Arc<watch::Sender<Option<RawLocation>>>,
    active: Mutex<Option<ActiveWatch>>,
}

struct ActiveWatch {
    id: WatcherId,
    drain: JoinHandle<()>,
}

impl LocationWatcher {
    /// Creates a watcher over `backend`. No subscription is made until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(backend: Arc<dyn GeolocationBackend>, options: WatchOptions) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            backend,
            options,
            latest: Arc::new(latest),
            active: Mutex::new(None),
        }
    }

    /// Starts the watch subscription and the drain task.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::WatchActive`] if a subscription is
    /// already live, or the device error when the backend refuses the
    /// watch (denied permissions included).
    pub async fn start(&self) -> LocationResult<()> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Err(LocationError::WatchActive);
        }

        let subscription = self.backend.watch(&self.options).await?;
        let id = subscription.id;
        let mut fixes = subscription.fixes;
        debug!(watch = %id, "location watch started");

        let latest = Arc::clone(&self.latest);
        let drain = tokio::spawn(async move {
            while let Some(fix) = fixes.recv().await {
                latest.send_replace(fix);
            }
        });

        *active = Some(ActiveWatch { id, drain });
        Ok(())
    }

    /// Stops the subscription and the drain task. Idempotent.
    ///
    /// The latest fix is kept so consumers briefly between subscriptions
    /// still see the last known position.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        let Some(active_watch) = active.take() else {
            return;
        };

        if let Err(e) = self.backend.unwatch(&active_watch.id).await {
            warn!(watch = %active_watch.id, error = %e, "failed to release location watch");
        }
        active_watch.drain.abort();
        debug!(watch = %active_watch.id, "location watch stopped");
    }

    /// Returns the most recent complete fix, if any.
    #[must_use]
    pub fn latest_fix(&self) -> Option<RawLocation> {
        *self.latest.borrow()
    }

    /// Subscribes to fix updates in the cell.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<RawLocation>> {
        self.latest.subscribe()
    }

    /// Returns whether a subscription is currently live.
    pub async fn is_watching(&self) -> bool {
        self.active.lock().await.is_some()
    }
}

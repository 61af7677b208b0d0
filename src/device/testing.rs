//! Scripted device backends for tests.
//!
//! Compiled only for tests and the `test-utils` feature. The fakes track
//! call counts and active subscriptions so tests can assert on resource
//! lifecycles, not just on outcomes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use super::error::{DeviceError, DeviceResult};
use super::geolocation::{
    GeolocationBackend, RawLocation, WatchOptions, WatcherId, WatchSubscription,
};
use super::notifications::{LocalNotification, NotificationBackend};

/// Channel capacity for scripted fix delivery.
const FIX_CHANNEL_CAPACITY: usize = 8;

/// In-memory positioning backend driven by the test.
#[derive(Default)]
pub struct FakeGeolocation {
    watches: Mutex<HashMap<WatcherId, mpsc::Sender<Option<RawLocation>>>>,
    deny_permission: AtomicBool,
    watch_calls: AtomicU64,
    unwatch_calls: AtomicU64,
}

impl FakeGeolocation {
    /// Creates a backend that grants permission and delivers nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `watch` call fail with a permission denial.
    pub fn deny_permission(&self) {
        self.deny_permission.store(true, Ordering::SeqCst);
    }

    /// Delivers a fix (or a null fix) to every active subscription.
    pub async fn push_fix(&self, fix: Option<RawLocation>) {
        let watches = self.watches.lock().await;
        for sender in watches.values() {
            // A closed receiver just means the watch is being torn down.
            let _ = sender.send(fix).await;
        }
    }

    /// Number of currently active subscriptions.
    pub async fn active_watches(&self) -> usize {
        self.watches.lock().await.len()
    }

    /// Number of `watch` calls that reached the backend.
    #[must_use]
    pub fn watch_calls(&self) -> u64 {
        self.watch_calls.load(Ordering::SeqCst)
    }

    /// Number of `unwatch` calls that reached the backend.
    #[must_use]
    pub fn unwatch_calls(&self) -> u64 {
        self.unwatch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationBackend for FakeGeolocation {
    async fn watch(&self, _options: &WatchOptions) -> DeviceResult<WatchSubscription> {
        self.watch_calls.fetch_add(1, Ordering::SeqCst);

        if self.deny_permission.load(Ordering::SeqCst) {
            return Err(DeviceError::PermissionDenied);
        }

        let (sender, fixes) = mpsc::channel(FIX_CHANNEL_CAPACITY);
        let id = WatcherId::random();
        self.watches.lock().await.insert(id.clone(), sender);

        Ok(WatchSubscription { id, fixes })
    }

    async fn unwatch(&self, id: &WatcherId) -> DeviceResult<()> {
        self.unwatch_calls.fetch_add(1, Ordering::SeqCst);
        self.watches.lock().await.remove(id);
        Ok(())
    }
}

/// Notification backend that records what was scheduled.
#[derive(Default)]
pub struct FakeNotifications {
    scheduled: Mutex<Vec<LocalNotification>>,
    fail: AtomicBool,
}

impl FakeNotifications {
    /// Creates a backend that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `schedule` call fail.
    pub fn fail_scheduling(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Everything scheduled so far, in order.
    pub async fn scheduled(&self) -> Vec<LocalNotification> {
        self.scheduled.lock().await.clone()
    }

    /// Titles scheduled so far, in order.
    pub async fn titles(&self) -> Vec<String> {
        self.scheduled
            .lock()
            .await
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationBackend for FakeNotifications {
    async fn schedule(&self, notification: LocalNotification) -> DeviceResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeviceError::Notification("scripted failure".to_string()));
        }
        self.scheduled.lock().await.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn watch_and_unwatch_track_active_subscriptions() {
        let backend = FakeGeolocation::new();
        assert_eq!(backend.active_watches().await, 0);

        let subscription = backend.watch(&WatchOptions::default()).await.unwrap();
        assert_eq!(backend.active_watches().await, 1);
        assert_eq!(backend.watch_calls(), 1);

        backend.unwatch(&subscription.id).await.unwrap();
        assert_eq!(backend.active_watches().await, 0);
        assert_eq!(backend.unwatch_calls(), 1);
    }

    #[tokio::test]
    async fn push_fix_reaches_subscriber() {
        let backend = FakeGeolocation::new();
        let mut subscription = backend.watch(&WatchOptions::default()).await.unwrap();

        let fix = RawLocation::new(48.1384, 11.5855);
        backend.push_fix(Some(fix)).await;

        let delivered = subscription.fixes.recv().await.unwrap();
        assert_eq!(delivered, Some(fix));
    }

    #[tokio::test]
    async fn unwatch_closes_the_fix_channel() {
        let backend = FakeGeolocation::new();
        let mut subscription = backend.watch(&WatchOptions::default()).await.unwrap();

        backend.unwatch(&subscription.id).await.unwrap();

        assert_eq!(subscription.fixes.recv().await, None);
    }

    #[tokio::test]
    async fn denied_permission_fails_watch() {
        let backend = FakeGeolocation::new();
        backend.deny_permission();

        let result = backend.watch(&WatchOptions::default()).await;

        assert!(matches!(result, Err(DeviceError::PermissionDenied)));
        assert_eq!(backend.active_watches().await, 0);
    }

    #[tokio::test]
    async fn notifications_record_in_order() {
        let backend = FakeNotifications::new();

        backend
            .schedule(LocalNotification::with_id(1, "first", ""))
            .await
            .unwrap();
        backend
            .schedule(LocalNotification::with_id(2, "second", ""))
            .await
            .unwrap();

        assert_eq!(backend.titles().await, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_notifications_reject_scheduling() {
        let backend = FakeNotifications::new();
        backend.fail_scheduling();

        let result = backend.schedule(LocalNotification::new("t", "")).await;

        assert!(matches!(result, Err(DeviceError::Notification(_))));
        assert!(backend.scheduled().await.is_empty());
    }
}

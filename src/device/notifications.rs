//! Local notification seam.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::DeviceResult;

/// A device-local notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    /// Platform notification id. Pseudo-random; these notifications are
    /// ephemeral advisories, so an id collision only replaces an older
    /// advisory and is tolerated.
    pub id: i32,

    /// Title line.
    pub title: String,

    /// Body text. Often empty for one-line advisories.
    pub body: String,
}

impl LocalNotification {
    /// Creates a notification with a pseudo-random 32-bit id.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: rand::thread_rng().gen(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Creates a notification with a caller-chosen id.
    #[must_use]
    pub fn with_id(id: i32, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Local notification scheduling service of the host platform.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Schedules a notification for immediate delivery.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform refuses the notification.
    async fn schedule(&self, notification: LocalNotification) -> DeviceResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_title_and_body() {
        let notification = LocalNotification::new("Friend alice is nearby.", "");

        assert_eq!(notification.title, "Friend alice is nearby.");
        assert_eq!(notification.body, "");
    }

    #[test]
    fn with_id_sets_id() {
        let notification = LocalNotification::with_id(42, "title", "body");

        assert_eq!(notification.id, 42);
        assert_eq!(notification.title, "title");
        assert_eq!(notification.body, "body");
    }

    #[test]
    fn serializes_all_fields() {
        let notification = LocalNotification::with_id(7, "t", "b");
        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "t");
        assert_eq!(json["body"], "b");
    }
}

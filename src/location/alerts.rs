//! Proximity alert construction.

use crate::device::LocalNotification;

/// Builds the notification announcing friends that just came into range.
///
/// Returns `None` when nobody newly entered: an unchanged or shrinking
/// nearby set never alerts. The title names exactly the entrants, in the
/// order given; the body stays empty.
///
/// # Examples
///
/// ```
/// use trainfriends_core::location::alerts::proximity_alert;
///
/// let alert = proximity_alert(&["alice".to_string()]).unwrap();
/// assert_eq!(alert.title, "Friend alice is nearby.");
///
/// let alert = proximity_alert(&["alice".to_string(), "bob".to_string()]).unwrap();
/// assert_eq!(alert.title, "Friends alice, bob are nearby.");
///
/// assert!(proximity_alert(&[]).is_none());
/// ```
#[must_use]
pub fn proximity_alert(entered: &[String]) -> Option<LocalNotification> {
    match entered {
        [] => None,
        [single] => Some(LocalNotification::new(
            format!("Friend {single} is nearby."),
            "",
        )),
        many => Some(LocalNotification::new(
            format!("Friends {} are nearby.", many.join(", ")),
            "",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_alert_for_no_entrants() {
        assert!(proximity_alert(&[]).is_none());
    }

    #[test]
    fn single_entrant_uses_singular_form() {
        let alert = proximity_alert(&["alice".to_string()]).unwrap();

        assert_eq!(alert.title, "Friend alice is nearby.");
        assert_eq!(alert.body, "");
    }

    #[test]
    fn multiple_entrants_use_plural_form() {
        let entered = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
        let alert = proximity_alert(&entered).unwrap();

        assert_eq!(alert.title, "Friends alice, bob, carol are nearby.");
        assert_eq!(alert.body, "");
    }

    #[test]
    fn alerts_carry_distinct_random_ids() {
        // Ids are pseudo-random; three consecutive alerts all colliding
        // would point at a broken generator, not at bad luck.
        let ids: Vec<i32> = (0..3)
            .map(|_| proximity_alert(&["alice".to_string()]).unwrap().id)
            .collect();

        assert!(ids[0] != ids[1] || ids[1] != ids[2]);
    }
}

//! Nearby-friend set computation.

use serde::{Deserialize, Serialize};

use crate::api::{Coordinates, FriendLocation};

use super::distance::haversine_km;

/// Sorted, de-duplicated set of usernames currently within range.
///
/// The set is recomputed from scratch on every sync tick; the previous
/// tick's set is kept only long enough to diff against the next one.
/// Sorting and de-duplication make the computation deterministic: equal
/// inputs always produce an identical set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NearbySet(Vec<String>);

impl NearbySet {
    /// The empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds the set of friends within `threshold_km` of `position`.
    ///
    /// Membership is one-sided: it uses each friend's last reported
    /// position against the local one, with no freshness requirement on
    /// either side.
    #[must_use]
    pub fn within(position: Coordinates, friends: &[FriendLocation], threshold_km: f64) -> Self {
        let mut members: Vec<String> = friends
            .iter()
            .filter(|friend| haversine_km(position, friend.location) <= threshold_km)
            .map(|friend| friend.username.clone())
            .collect();

        members.sort_unstable();
        members.dedup();
        Self(members)
    }

    /// Members of `self` that are absent from `previous`.
    ///
    /// This is the "who just came into range" diff: members that left are
    /// deliberately not reported.
    #[must_use]
    pub fn entered_since(&self, previous: &Self) -> Vec<String> {
        self.0
            .iter()
            .filter(|member| !previous.contains(member))
            .cloned()
            .collect()
    }

    /// Returns whether `username` is in the set.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        // Members are sorted, so a binary search is exact.
        self.0.binary_search_by(|m| m.as_str().cmp(username)).is_ok()
    }

    /// Returns the members in sorted order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for NearbySet {
    /// Normalizes an arbitrary member list into a set.
    fn from(mut members: Vec<String>) -> Self {
        members.sort_unstable();
        members.dedup();
        Self(members)
    }
}

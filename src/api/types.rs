//! Wire types for the TrainFriends backend.
//!
//! Field names and nesting follow the backend's JSON exactly; Rust-side
//! names are mapped with serde renames where the wire uses camelCase.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minutes after which a friend's sample no longer reflects a live position.
const STALE_AFTER_MINUTES: i64 = 15;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees (-90.0 to 90.0).
    pub latitude: f64,
    /// Longitude in decimal degrees (-180.0 to 180.0).
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair, clamping invalid input to the origin.
    ///
    /// Latitude must be finite and within -90.0 to 90.0, longitude finite
    /// and within -180.0 to 180.0. Out-of-range or non-finite components
    /// fall back to 0.0 so corrupted device readings never reach the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use trainfriends_core::api::Coordinates;
    ///
    /// let position = Coordinates::new(48.1384, 11.5855);
    /// assert_eq!(position.latitude, 48.1384);
    ///
    /// let garbage = Coordinates::new(f64::NAN, 200.0);
    /// assert_eq!(garbage.latitude, 0.0);
    /// assert_eq!(garbage.longitude, 0.0);
    /// ```
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let latitude = if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
            latitude
        } else {
            0.0
        };
        let longitude = if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) {
            longitude
        } else {
            0.0
        };

        Self {
            latitude,
            longitude,
        }
    }
}

/// Request body for `POST /location`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPush {
    /// The device's current position.
    pub location: Coordinates,
}

/// One friend's latest reported position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendLocation {
    /// The friend's username.
    pub username: String,
    /// Where the friend last reported from.
    pub location: Coordinates,
    /// When the friend reported it.
    ///
    /// The backend emits offset-less ISO-8601 timestamps that are
    /// always UTC; values with an explicit offset are accepted too.
    #[serde(deserialize_with = "deserialize_utc_timestamp")]
    pub ts: DateTime<Utc>,
}

impl FriendLocation {
    /// Returns whether this sample is older than 15 minutes.
    ///
    /// Stale samples still count for proximity (the backend is the
    /// authority on what it returns); map consumers use this to fade or
    /// drop markers for friends that stopped reporting.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        Utc::now().signed_duration_since(self.ts) > Duration::minutes(STALE_AFTER_MINUTES)
    }
}

/// Parses a timestamp that may or may not carry a UTC offset.
///
/// RFC 3339 input keeps its offset; a bare `YYYY-MM-DDTHH:MM:SS[.ffffff]`
/// is interpreted as UTC, matching how the backend stamps samples.
fn deserialize_utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
}

/// Generic acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Identifier of a created resource, when the endpoint creates one.
    ///
    /// The backend mints these as uuid hex strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl GenericResponse {
    /// A bare success acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
            id: None,
        }
    }
}

/// Request body for `POST /login` and `POST /signup`.
///
/// The password is wiped from memory when the value is dropped and never
/// appears in `Debug` output.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// The account username.
    pub username: String,
    /// The account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response body for `GET /auth-check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCheckResponse {
    /// Username attached to the current session.
    pub username: String,
}

/// Request body for `POST /friend-request/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestCreate {
    /// Username the request is addressed to.
    #[serde(rename = "friendUsername")]
    pub friend_username: String,
}

/// One pending friend request, as listed by `GET /friend-requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    /// Uuid-hex request identifier, used to accept, reject, or cancel it.
    pub id: String,
    /// The other party's username.
    #[serde(rename = "friendName")]
    pub friend_name: String,
}

/// Response body for `GET /friend-requests`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestsResponse {
    /// Requests other users sent to the current user.
    #[serde(rename = "requestsToYou")]
    pub requests_to_you: Vec<FriendRequest>,

    /// Requests the current user sent and may still cancel.
    #[serde(rename = "requestsFromYou")]
    pub requests_from_you: Vec<FriendRequest>,
}

/// Response body for `GET /friends`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendsResponse {
    /// Usernames of all accepted friends.
    pub friends: Vec<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn coordinates_accepts_valid_boundaries() {
        let north_pole = Coordinates::new(90.0, 0.0);
        assert_eq!(north_pole.latitude, 90.0);

        let south_pole = Coordinates::new(-90.0, 0.0);
        assert_eq!(south_pole.latitude, -90.0);

        let date_line = Coordinates::new(0.0, 180.0);
        assert_eq!(date_line.longitude, 180.0);

        let neg_date_line = Coordinates::new(0.0, -180.0);
        assert_eq!(neg_date_line.longitude, -180.0);
    }

    #[test]
    fn coordinates_rejects_nan_and_infinity() {
        let nan_lat = Coordinates::new(f64::NAN, 11.5855);
        assert_eq!(nan_lat.latitude, 0.0);
        assert_eq!(nan_lat.longitude, 11.5855);

        let inf_lon = Coordinates::new(48.1384, f64::INFINITY);
        assert_eq!(inf_lon.latitude, 48.1384);
        assert_eq!(inf_lon.longitude, 0.0);
    }

    #[test]
    fn coordinates_rejects_out_of_range() {
        let bad_lat = Coordinates::new(91.0, 11.5855);
        assert_eq!(bad_lat.latitude, 0.0);

        let bad_lon = Coordinates::new(48.1384, -181.0);
        assert_eq!(bad_lon.longitude, 0.0);
    }

    #[test]
    fn location_push_nests_coordinates() {
        let push = LocationPush {
            location: Coordinates::new(48.1384, 11.5855),
        };
        let json = serde_json::to_value(&push).unwrap();

        assert_eq!(json["location"]["latitude"], 48.1384);
        assert_eq!(json["location"]["longitude"], 11.5855);
    }

    #[test]
    fn friend_location_wire_shape() {
        let json = r#"{
            "username": "alice",
            "location": { "latitude": 48.1384, "longitude": 11.5855 },
            "ts": "2024-01-27T12:34:56Z"
        }"#;
        let sample: FriendLocation = serde_json::from_str(json).unwrap();

        assert_eq!(sample.username, "alice");
        assert_eq!(sample.location.latitude, 48.1384);
        assert_eq!(sample.location.longitude, 11.5855);
    }

    #[test]
    fn friend_location_accepts_offsetless_timestamps() {
        // The backend stamps samples with `datetime.utcnow().isoformat()`,
        // which carries microseconds and no offset.
        let json = r#"{
            "username": "alice",
            "location": { "latitude": 48.1384, "longitude": 11.5855 },
            "ts": "2026-08-25T14:02:03.123456"
        }"#;
        let sample: FriendLocation = serde_json::from_str(json).unwrap();

        let expected = Utc.with_ymd_and_hms(2026, 8, 25, 14, 2, 3).unwrap()
            + Duration::microseconds(123_456);
        assert_eq!(sample.ts, expected);
    }

    #[test]
    fn friend_location_accepts_whole_second_timestamps() {
        // `isoformat()` drops the fractional part when it is zero.
        let json = r#"{
            "username": "bob",
            "location": { "latitude": 0.0, "longitude": 0.0 },
            "ts": "2026-08-25T14:02:03"
        }"#;
        let sample: FriendLocation = serde_json::from_str(json).unwrap();

        let expected = Utc.with_ymd_and_hms(2026, 8, 25, 14, 2, 3).unwrap();
        assert_eq!(sample.ts, expected);
    }

    #[test]
    fn friend_location_rejects_garbage_timestamps() {
        let json = r#"{
            "username": "alice",
            "location": { "latitude": 0.0, "longitude": 0.0 },
            "ts": "yesterday"
        }"#;
        let result = serde_json::from_str::<FriendLocation>(json);

        let error = result.expect_err("should reject an unparseable ts");
        assert!(error.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn friend_location_staleness() {
        let fresh = FriendLocation {
            username: "alice".to_string(),
            location: Coordinates::new(48.1384, 11.5855),
            ts: Utc::now(),
        };
        assert!(!fresh.is_stale());

        let stale = FriendLocation {
            username: "bob".to_string(),
            location: Coordinates::new(48.1384, 11.5855),
            ts: Utc::now() - Duration::minutes(16),
        };
        assert!(stale.is_stale());
    }

    #[test]
    fn generic_response_optional_fields_default() {
        let response: GenericResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();

        assert!(response.success);
        assert_eq!(response.message, None);
        assert_eq!(response.id, None);
    }

    #[test]
    fn generic_response_carries_uuid_hex_ids() {
        // Literal shape of the backend's friend-request create response.
        let json =
            r#"{"success":true,"message":"Request created","id":"a3f4b2c1d4e5f60718293a4b5c6d7e8f"}"#;
        let response: GenericResponse = serde_json::from_str(json).unwrap();

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Request created"));
        assert_eq!(
            response.id.as_deref(),
            Some("a3f4b2c1d4e5f60718293a4b5c6d7e8f")
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let debug_str = format!("{credentials:?}");

        assert!(debug_str.contains("alice"));
        assert!(debug_str.contains("<redacted>"));
        assert!(!debug_str.contains("hunter2"));
    }

    #[test]
    fn credentials_serialize_both_fields() {
        let credentials = Credentials::new("alice", "hunter2");
        let json = serde_json::to_value(&credentials).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["password"], "hunter2");
    }

    #[test]
    fn friend_request_create_uses_camel_case() {
        let body = FriendRequestCreate {
            friend_username: "bob".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains("friendUsername"));
        assert!(!json.contains("friend_username"));
    }

    #[test]
    fn friend_requests_response_wire_shape() {
        let json = r#"{
            "requestsToYou": [{ "id": "9f3c2a1d5e6b708192a3b4c5d6e7f801", "friendName": "alice" }],
            "requestsFromYou": [{ "id": "0b1c2d3e4f5a69788796a5b4c3d2e1f0", "friendName": "bob" }]
        }"#;
        let response: FriendRequestsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.requests_to_you.len(), 1);
        assert_eq!(
            response.requests_to_you[0].id,
            "9f3c2a1d5e6b708192a3b4c5d6e7f801"
        );
        assert_eq!(response.requests_to_you[0].friend_name, "alice");
        assert_eq!(response.requests_from_you[0].friend_name, "bob");
    }

    #[test]
    fn friends_response_wire_shape() {
        let response: FriendsResponse =
            serde_json::from_str(r#"{"friends": ["alice", "bob"]}"#).unwrap();
        assert_eq!(response.friends, vec!["alice", "bob"]);
    }
}

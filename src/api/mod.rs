//! REST client for the TrainFriends backend.
//!
//! The backend is a small session-based HTTP API: the server sets a
//! session cookie on login and every later call replays it. This module
//! provides the typed surface of that API plus the HTTP implementation.
//!
//! # Endpoints
//!
//! | Operation | Method and path |
//! |-----------|-----------------|
//! | `signup` | `POST /signup` |
//! | `login` | `POST /login` |
//! | `logout` | `POST /logout` |
//! | `auth_check` | `GET /auth-check` |
//! | `push_location` | `POST /location` |
//! | `friends` | `GET /friends` |
//! | `friend_requests` | `GET /friend-requests` |
//! | `create_friend_request` | `POST /friend-request/create` |
//! | `accept_friend_request` | `POST /friend-request/{id}/accept` |
//! | `reject_friend_request` | `POST /friend-request/{id}/reject` |
//! | `cancel_friend_request` | `POST /friend-request/{id}/cancel` |
//!
//! Services depend on the [`ServerApi`] trait rather than on
//! [`HttpApi`] directly, so tests can substitute a scripted backend.

use async_trait::async_trait;

mod client;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod types;

pub use client::HttpApi;
pub use error::{ApiError, ApiResult};
pub use types::{
    AuthCheckResponse, Coordinates, Credentials, FriendLocation, FriendRequest,
    FriendRequestCreate, FriendRequestsResponse, FriendsResponse, GenericResponse, LocationPush,
};

/// Remote procedure interface of the TrainFriends backend.
///
/// All calls are session-scoped: endpoints other than `signup` and
/// `login` answer 401 until a session is established.
#[async_trait]
pub trait ServerApi: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is taken or the request fails.
    async fn signup(&self, credentials: &Credentials) -> ApiResult<GenericResponse>;

    /// Establishes a session for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns a 401 status error for invalid credentials.
    async fn login(&self, credentials: &Credentials) -> ApiResult<GenericResponse>;

    /// Ends the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn logout(&self) -> ApiResult<GenericResponse>;

    /// Validates the current session and returns its username.
    ///
    /// # Errors
    ///
    /// Returns a 401 status error when no valid session exists.
    async fn auth_check(&self) -> ApiResult<AuthCheckResponse>;

    /// Reports the device position and returns friends' latest samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the request fails.
    async fn push_location(&self, position: Coordinates) -> ApiResult<Vec<FriendLocation>>;

    /// Lists accepted friends.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the request fails.
    async fn friends(&self) -> ApiResult<FriendsResponse>;

    /// Lists pending friend requests in both directions.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or the request fails.
    async fn friend_requests(&self) -> ApiResult<FriendRequestsResponse>;

    /// Sends a friend request to `friend_username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target does not exist or the request fails.
    async fn create_friend_request(&self, friend_username: &str) -> ApiResult<GenericResponse>;

    /// Accepts a friend request addressed to the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request id is unknown or the call fails.
    async fn accept_friend_request(&self, id: &str) -> ApiResult<GenericResponse>;

    /// Rejects a friend request addressed to the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request id is unknown or the call fails.
    async fn reject_friend_request(&self, id: &str) -> ApiResult<GenericResponse>;

    /// Cancels a friend request the current user sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the request id is unknown or the call fails.
    async fn cancel_friend_request(&self, id: &str) -> ApiResult<GenericResponse>;
}

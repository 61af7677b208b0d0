//! HTTP implementation of the backend API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::types::{
    AuthCheckResponse, Coordinates, Credentials, FriendLocation, FriendRequestCreate,
    FriendRequestsResponse, FriendsResponse, GenericResponse, LocationPush,
};
use super::ServerApi;

/// Default timeout for a single backend request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body shape the backend uses for failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the TrainFriends backend.
///
/// Sessions are cookie-based: the server sets a session cookie on login
/// and the client's cookie jar replays it on every later request, so a
/// single `HttpApi` instance carries the session for its lifetime.
///
/// # Example
///
/// ```rust,ignore
/// use trainfriends_core::api::{Credentials, HttpApi, ServerApi};
///
/// let api = HttpApi::new("https://trainfriends.example.com/api")?;
/// api.login(&Credentials::new("alice", "hunter2")).await?;
/// let friends = api.friends().await?;
/// ```
#[derive(Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Creates a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = Self::parse_base_url(base_url)?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Parses and normalizes the base URL.
    ///
    /// A trailing slash is enforced so endpoint paths join under the
    /// configured prefix instead of replacing its last segment.
    fn parse_base_url(raw: &str) -> ApiResult<Url> {
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        let url = Url::parse(&normalized)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;

        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{raw}: not a base URL"
            )));
        }

        Ok(url)
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let url = self.endpoint(path)?;
        debug!(endpoint = path, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })?;

        Self::decode(path, response).await
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> ApiResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!(endpoint = path, "POST");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })?;

        Self::decode(path, response).await
    }

    async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        let url = self.endpoint(path)?;
        debug!(endpoint = path, "POST");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })?;

        Self::decode(path, response).await
    }

    /// Turns a response into the expected type, mapping non-success
    /// statuses to [`ApiError::Status`] with the backend's `detail`
    /// message when one is present.
    async fn decode<R: DeserializeOwned>(path: &str, response: Response) -> ApiResult<R> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map_or(body, |parsed| parsed.detail);

            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        response.json().await.map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ServerApi for HttpApi {
    async fn signup(&self, credentials: &Credentials) -> ApiResult<GenericResponse> {
        self.post_json("signup", credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<GenericResponse> {
        self.post_json("login", credentials).await
    }

    async fn logout(&self) -> ApiResult<GenericResponse> {
        self.post_empty("logout").await
    }

    async fn auth_check(&self) -> ApiResult<AuthCheckResponse> {
        self.get_json("auth-check").await
    }

    async fn push_location(&self, position: Coordinates) -> ApiResult<Vec<FriendLocation>> {
        let body = LocationPush { location: position };
        self.post_json("location", &body).await
    }

    async fn friends(&self) -> ApiResult<FriendsResponse> {
        self.get_json("friends").await
    }

    async fn friend_requests(&self) -> ApiResult<FriendRequestsResponse> {
        self.get_json("friend-requests").await
    }

    async fn create_friend_request(&self, friend_username: &str) -> ApiResult<GenericResponse> {
        let body = FriendRequestCreate {
            friend_username: friend_username.to_string(),
        };
        self.post_json("friend-request/create", &body).await
    }

    async fn accept_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        self.post_empty(&format!("friend-request/{id}/accept")).await
    }

    async fn reject_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        self.post_empty(&format!("friend-request/{id}/reject")).await
    }

    async fn cancel_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        self.post_empty(&format!("friend-request/{id}/cancel")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = HttpApi::new("not a url");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn new_rejects_non_base_url() {
        let result = HttpApi::new("mailto:alice@example.com");
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn new_accepts_http_and_https() {
        assert!(HttpApi::new("http://localhost:8000").is_ok());
        assert!(HttpApi::new("https://trainfriends.example.com/api").is_ok());
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let api = HttpApi::new("https://example.com/api").unwrap();
        let url = api.endpoint("location").unwrap();

        assert_eq!(url.as_str(), "https://example.com/api/location");
    }

    #[test]
    fn endpoint_preserves_trailing_slash_base() {
        let api = HttpApi::new("https://example.com/api/").unwrap();
        let url = api.endpoint("friend-requests").unwrap();

        assert_eq!(url.as_str(), "https://example.com/api/friend-requests");
    }

    #[test]
    fn endpoint_builds_friend_request_action_paths() {
        let api = HttpApi::new("https://example.com").unwrap();
        let id = "a3f4b2c1d4e5f60718293a4b5c6d7e8f";
        let url = api.endpoint(&format!("friend-request/{id}/accept")).unwrap();

        assert_eq!(
            url.as_str(),
            "https://example.com/friend-request/a3f4b2c1d4e5f60718293a4b5c6d7e8f/accept"
        );
    }
}

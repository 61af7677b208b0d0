//! Scripted backend for tests.
//!
//! [`FakeServerApi`] stands in for the real backend: tests script its
//! responses up front and inspect what the code under test sent. It is
//! compiled only for tests and the `test-utils` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::{Mutex, Semaphore};

use super::error::{ApiError, ApiResult};
use super::types::{
    AuthCheckResponse, Coordinates, Credentials, FriendLocation, FriendRequest,
    FriendRequestsResponse, FriendsResponse, GenericResponse,
};
use super::ServerApi;

/// Scriptable state behind the fake.
#[derive(Default)]
struct Script {
    /// Samples returned by every `push_location` call.
    samples: Vec<FriendLocation>,
    /// When set, `push_location` fails with a transport error.
    push_failure: Option<String>,
    /// Username attached to the current session, if any.
    session_user: Option<String>,
    /// When set, `login` answers 401 regardless of credentials.
    reject_logins: bool,
    /// When set, `signup` answers 400 with this detail.
    reject_signups: Option<String>,
    /// When set, `logout` fails with a transport error.
    fail_logouts: bool,
    /// When set, `auth_check` fails with a transport error.
    fail_auth_checks: bool,
    /// Positions the code under test pushed, in order.
    pushed: Vec<Coordinates>,
    /// Scripted friend-request listing.
    requests: FriendRequestsResponse,
    /// Scripted friends listing.
    friends: Vec<String>,
}

/// In-memory [`ServerApi`] with scriptable responses and call recording.
#[derive(Default)]
pub struct FakeServerApi {
    script: Mutex<Script>,
    push_calls: AtomicU64,
    /// When present, `push_location` holds until a permit is released.
    push_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeServerApi {
    /// Creates a fake with no session and no scripted samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the samples every later `push_location` call returns.
    pub async fn set_samples(&self, samples: Vec<FriendLocation>) {
        self.script.lock().await.samples = samples;
    }

    /// Makes every later `push_location` call fail in transport.
    pub async fn fail_pushes(&self, reason: &str) {
        self.script.lock().await.push_failure = Some(reason.to_string());
    }

    /// Clears a scripted push failure.
    pub async fn clear_push_failure(&self) {
        self.script.lock().await.push_failure = None;
    }

    /// Pretends a session exists (or not) without going through `login`.
    pub async fn set_session(&self, username: Option<&str>) {
        self.script.lock().await.session_user = username.map(str::to_string);
    }

    /// Makes every later `login` answer 401.
    pub async fn reject_logins(&self) {
        self.script.lock().await.reject_logins = true;
    }

    /// Makes every later `signup` answer 400 with the given detail.
    pub async fn reject_signups(&self, detail: &str) {
        self.script.lock().await.reject_signups = Some(detail.to_string());
    }

    /// Makes every later `logout` fail in transport.
    pub async fn fail_logouts(&self) {
        self.script.lock().await.fail_logouts = true;
    }

    /// Makes every later `auth_check` fail in transport.
    pub async fn fail_auth_checks(&self) {
        self.script.lock().await.fail_auth_checks = true;
    }

    /// Scripts the friend-request listing.
    pub async fn set_friend_requests(&self, requests: FriendRequestsResponse) {
        self.script.lock().await.requests = requests;
    }

    /// Scripts the friends listing.
    pub async fn set_friends(&self, friends: Vec<String>) {
        self.script.lock().await.friends = friends;
    }

    /// Number of `push_location` calls started so far.
    #[must_use]
    pub fn push_count(&self) -> u64 {
        self.push_calls.load(Ordering::SeqCst)
    }

    /// Positions pushed so far, in call order.
    pub async fn pushed_positions(&self) -> Vec<Coordinates> {
        self.script.lock().await.pushed.clone()
    }

    /// Gates `push_location`: every call holds until the returned
    /// semaphore hands it a permit. Used to observe in-flight behavior.
    pub async fn gate_pushes(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.push_gate.lock().await = Some(Arc::clone(&gate));
        gate
    }

    /// Mints a request id in the backend's uuid-hex format.
    fn mint_request_id() -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn transport(endpoint: &str, reason: &str) -> ApiError {
        ApiError::Transport {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    fn unauthorized(endpoint: &str) -> ApiError {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status: 401,
            detail: "Unauthorized".to_string(),
        }
    }
}

#[async_trait]
impl ServerApi for FakeServerApi {
    async fn signup(&self, _credentials: &Credentials) -> ApiResult<GenericResponse> {
        let script = self.script.lock().await;
        match &script.reject_signups {
            Some(detail) => Err(ApiError::Status {
                endpoint: "signup".to_string(),
                status: 400,
                detail: detail.clone(),
            }),
            None => Ok(GenericResponse::ok()),
        }
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        if script.reject_logins {
            return Err(Self::unauthorized("login"));
        }
        script.session_user = Some(credentials.username.clone());
        Ok(GenericResponse::ok())
    }

    async fn logout(&self) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        if script.fail_logouts {
            return Err(Self::transport("logout", "connection reset"));
        }
        script.session_user = None;
        Ok(GenericResponse::ok())
    }

    async fn auth_check(&self) -> ApiResult<AuthCheckResponse> {
        let script = self.script.lock().await;
        if script.fail_auth_checks {
            return Err(Self::transport("auth-check", "connection reset"));
        }
        script.session_user.as_ref().map_or_else(
            || Err(Self::unauthorized("auth-check")),
            |username| {
                Ok(AuthCheckResponse {
                    username: username.clone(),
                })
            },
        )
    }

    async fn push_location(&self, position: Coordinates) -> ApiResult<Vec<FriendLocation>> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.push_gate.lock().await.clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let mut script = self.script.lock().await;
        if let Some(reason) = script.push_failure.clone() {
            return Err(Self::transport("location", &reason));
        }
        script.pushed.push(position);
        Ok(script.samples.clone())
    }

    async fn friends(&self) -> ApiResult<FriendsResponse> {
        let script = self.script.lock().await;
        Ok(FriendsResponse {
            friends: script.friends.clone(),
        })
    }

    async fn friend_requests(&self) -> ApiResult<FriendRequestsResponse> {
        Ok(self.script.lock().await.requests.clone())
    }

    async fn create_friend_request(&self, friend_username: &str) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        let id = Self::mint_request_id();
        script.requests.requests_from_you.push(FriendRequest {
            id: id.clone(),
            friend_name: friend_username.to_string(),
        });
        Ok(GenericResponse {
            success: true,
            message: None,
            id: Some(id),
        })
    }

    async fn accept_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        if let Some(index) = script
            .requests
            .requests_to_you
            .iter()
            .position(|r| r.id == id)
        {
            let accepted = script.requests.requests_to_you.remove(index);
            script.friends.push(accepted.friend_name);
        }
        Ok(GenericResponse::ok())
    }

    async fn reject_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        script.requests.requests_to_you.retain(|r| r.id != id);
        Ok(GenericResponse::ok())
    }

    async fn cancel_friend_request(&self, id: &str) -> ApiResult<GenericResponse> {
        let mut script = self.script.lock().await;
        script.requests.requests_from_you.retain(|r| r.id != id);
        Ok(GenericResponse::ok())
    }
}

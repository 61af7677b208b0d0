//! Authentication state types.

use serde::{Deserialize, Serialize};

/// Authentication state of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthState {
    /// A user is signed in.
    Authenticated {
        /// Username attached to the session.
        username: String,
    },

    /// No valid session.
    #[default]
    Anonymous,
}

impl AuthState {
    /// Creates an authenticated state for `username`.
    #[must_use]
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self::Authenticated {
            username: username.into(),
        }
    }

    /// Returns whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the signed-in username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username } => Some(username),
            Self::Anonymous => None,
        }
    }
}

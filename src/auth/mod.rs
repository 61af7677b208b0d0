//! Session authentication for TrainFriends.
//!
//! One [`AuthManager`] owns the session state. Consumers never mutate it
//! directly: they call `login`/`logout`/`refresh` and observe the
//! resulting [`AuthState`] through a watch channel. The location service
//! uses that signal to decide whether a sync tick may call the backend.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use types::AuthState;

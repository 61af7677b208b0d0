//! Persisted user preferences.
//!
//! A single small JSON file under the app data directory. Loading is
//! lenient: a missing file means first launch and a malformed one is
//! replaced by defaults on the next write, so preference corruption can
//! never keep the app from starting.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Preference file name under the data directory.
const PREFS_FILE: &str = "prefs.json";

const fn default_location_enabled() -> bool {
    true
}

/// User preferences persisted across launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether the device shares its location with friends.
    #[serde(default = "default_location_enabled")]
    pub location_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            location_enabled: true,
        }
    }
}

/// Errors that can occur while persisting preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Preferences could not be encoded.
    #[error("Failed to encode preferences: {0}")]
    Encode(String),

    /// The preferences file could not be written.
    #[error("Failed to write {path}: {reason}")]
    Write {
        /// The file that failed to write.
        path: String,
        /// The I/O failure.
        reason: String,
    },
}

/// File-backed preference store.
///
/// Reads happen once at open; afterwards the in-memory copy is
/// authoritative and every mutation writes through. Write failures are
/// logged by the mutating helpers and the in-memory value stands, so a
/// full disk degrades to session-only preferences.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    current: Mutex<Preferences>,
}

impl PreferenceStore {
    /// Opens the store rooted at `data_dir`, creating the directory when
    /// missing and loading the preference file when one exists.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            warn!(path = %data_dir.display(), error = %e, "failed to create preferences directory");
        }

        let path = data_dir.join(PREFS_FILE);
        let current = Self::load(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    fn load(path: &Path) -> Preferences {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Preferences::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read preferences, using defaults");
                return Preferences::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(preferences) => preferences,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed preferences, using defaults");
                Preferences::default()
            }
        }
    }

    /// Returns a snapshot of the current preferences.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.lock().clone()
    }

    /// Returns whether location sharing is enabled.
    #[must_use]
    pub fn location_enabled(&self) -> bool {
        self.lock().location_enabled
    }

    /// Sets and persists the sharing flag.
    ///
    /// A failed write keeps the in-memory value and logs the failure.
    pub fn set_location_enabled(&self, enabled: bool) {
        self.lock().location_enabled = enabled;

        if let Err(e) = self.save() {
            warn!(error = %e, "failed to persist preferences");
        }
    }

    /// Writes the current preferences to disk.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding or the file write fails.
    pub fn save(&self) -> Result<(), PrefsError> {
        let preferences = self.preferences();
        let json = serde_json::to_string_pretty(&preferences)
            .map_err(|e| PrefsError::Encode(e.to_string()))?;

        std::fs::write(&self.path, json).map_err(|e| PrefsError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Preferences> {
        // A poisoned lock only means a writer panicked mid-assignment of
        // a bool; the value is still usable.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

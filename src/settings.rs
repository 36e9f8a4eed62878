//! Reader preferences carried inside the saved session.
//!
//! The session store treats settings as an opaque blob; this module is the
//! only place that gives it a shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Words per minute when neither the command line nor a saved session sets one.
pub const DEFAULT_SPEED: u64 = 250;
/// Words per chunk when neither the command line nor a saved session sets one.
pub const DEFAULT_CHUNK_SIZE: usize = 1;

/// Display speed and chunking.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Words per minute.
    pub speed: u64,
    /// Words shown at once.
    pub chunk_size: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ReaderSettings {
    /// Settings with speed and chunk size floored at 1.
    #[must_use]
    pub fn new(speed: u64, chunk_size: usize) -> Self {
        Self {
            speed: speed.max(1),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Read settings from a stored blob. Missing or malformed fields keep
    /// their defaults.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let speed = value
            .get("speed")
            .and_then(Value::as_u64)
            .unwrap_or(defaults.speed);
        let chunk_size = value
            .get("chunk_size")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(defaults.chunk_size);
        Self::new(speed, chunk_size)
    }

    /// Blob form for [`crate::Session::settings`].
    #[must_use]
    pub fn to_value(self) -> Value {
        serde_json::json!({ "speed": self.speed, "chunk_size": self.chunk_size })
    }

    /// Priority: command line > stored session > defaults.
    #[must_use]
    pub fn resolve(speed: Option<u64>, chunk_size: Option<usize>, stored: Option<&Value>) -> Self {
        let base = stored.map(Self::from_value).unwrap_or_default();
        Self::new(
            speed.unwrap_or(base.speed),
            chunk_size.unwrap_or(base.chunk_size),
        )
    }

    /// Time each chunk stays on screen.
    #[must_use]
    pub fn word_delay(self) -> Duration {
        Duration::from_millis(60_000 / self.speed.max(1))
    }
}

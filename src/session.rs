//! Single-slot session persistence.
//!
//! [`SessionStore`] keeps exactly one [`SessionRecord`] under [`SESSION_KEY`]
//! in a [`KeyValueStorage`] host. Saving, loading and clearing never fail
//! outward: errors go to a [`DiagnosticSink`] and the caller gets `false` or
//! `None`. Existence checks and summaries treat failures as "no session" and
//! report nothing.

use crate::error::{SessionError, SessionResult};
use crate::reading_session::{Session, SessionRecord, SessionSummary, StoredSession};
use crate::storage::KeyValueStorage;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error};

/// Storage key of the session slot.
pub const SESSION_KEY: &str = "rsvp-reader-session";

/// Receiver for failure reports from save, load and clear.
pub trait DiagnosticSink {
    /// Report a failed operation.
    fn report(&self, message: &str, error: &SessionError);
}

/// Sink that emits reports as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str, error: &SessionError) {
        error!(error = %error, "{message}");
    }
}

/// Persists the reading session in a single storage slot.
#[derive(Debug)]
pub struct SessionStore<S, D = TracingSink> {
    storage: S,
    sink: D,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Create a store that reports failures through `tracing`.
    pub fn new(storage: S) -> Self {
        Self::with_sink(storage, TracingSink)
    }
}

impl<S: KeyValueStorage, D: DiagnosticSink> SessionStore<S, D> {
    /// Create a store with a custom failure sink.
    pub fn with_sink(storage: S, sink: D) -> Self {
        Self { storage, sink }
    }

    /// The underlying storage host.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The failure sink.
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Stamp `session` with the current time and write it, replacing any
    /// stored session. Returns the save time in epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn try_save(&self, session: &Session) -> SessionResult<i64> {
        let saved_at = Utc::now().timestamp_millis();
        let content = serde_json::to_string(&StoredSession::stamp(session, saved_at))?;
        self.storage.set(SESSION_KEY, &content)?;
        debug!(
            word = session.current_word_index,
            total = session.total_words,
            "saved reading session"
        );
        Ok(saved_at)
    }

    /// Read and parse the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if storage access fails or the stored text is not a
    /// JSON object. A stored `null` reads as no session.
    pub fn try_load(&self) -> SessionResult<Option<SessionRecord>> {
        let Some(content) = self.storage.get(SESSION_KEY)? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&content)?;
        match value {
            Value::Null => Ok(None),
            Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            _ => Err(SessionError::Serialization(serde::de::Error::custom(
                "stored session is not a JSON object",
            ))),
        }
    }

    /// Save the session. Returns whether it was written.
    pub fn save(&self, session: &Session) -> bool {
        match self.try_save(session) {
            Ok(_) => true,
            Err(e) => {
                self.sink.report("failed to save reading session", &e);
                false
            }
        }
    }

    /// Load the full stored session, or `None` when nothing usable is stored.
    pub fn load(&self) -> Option<SessionRecord> {
        self.try_load().unwrap_or_else(|e| {
            self.sink.report("failed to load reading session", &e);
            None
        })
    }

    /// Whether the slot is occupied. The contents are not parsed.
    pub fn has_session(&self) -> bool {
        matches!(self.storage.get(SESSION_KEY), Ok(Some(_)))
    }

    /// Remove the stored session. Clearing an empty slot succeeds.
    pub fn clear_session(&self) -> bool {
        match self.storage.remove(SESSION_KEY) {
            Ok(()) => {
                debug!("cleared reading session");
                true
            }
            Err(e) => {
                self.sink
                    .report("failed to clear reading session", &SessionError::from(e));
                false
            }
        }
    }

    /// Position and save time of the stored session, without its text.
    pub fn session_summary(&self) -> Option<SessionSummary> {
        self.try_load().ok().flatten().map(|record| record.summary())
    }
}

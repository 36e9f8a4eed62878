//! RSVP speed reader with a resumable reading session.
//!
//! - **Session store** ([`session`]) - one saved session in a key-value slot
//! - **Storage hosts** ([`storage`]) - memory and file backed slots
//! - **Progress** ([`progress`]) - word index and percentage conversions
//! - **Reader** ([`interface`]) - the terminal front end
//!
//! ```rust
//! use rsvp::{MemoryStorage, Session, SessionStore};
//!
//! let store = SessionStore::new(MemoryStorage::new());
//! let session = Session {
//!     text: "to be or not to be".to_string(),
//!     current_word_index: 3,
//!     total_words: 6,
//!     settings: serde_json::Value::Null,
//! };
//! assert!(store.save(&session));
//! assert_eq!(store.session_summary().and_then(|s| s.word_index()), Some(3));
//! ```

pub mod error;
pub mod interface;
pub mod progress;
pub mod reading_session;
pub mod session;
pub mod settings;
pub mod storage;
pub mod utilities;

pub use error::{SessionError, SessionResult, StorageError, StorageResult};
pub use progress::{percentage_to_word_index, word_index_to_percentage};
pub use reading_session::{Session, SessionRecord, SessionSummary};
pub use session::{DiagnosticSink, SessionStore, TracingSink, SESSION_KEY};
pub use settings::ReaderSettings;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

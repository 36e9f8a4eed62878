use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reading progress handed to the store for saving.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub text: String,
    pub current_word_index: i64,
    pub total_words: i64,
    /// Reader settings. The store keeps this verbatim and never looks inside.
    #[serde(default)]
    pub settings: Value,
}

/// The persisted snapshot as it was found in storage.
///
/// Fields are kept exactly as stored: a record written by another tool may
/// hold a fractional position, a string, or nothing at all, and it is
/// returned unchanged. Missing fields read as `null`. Use the typed
/// accessors to interpret them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default)]
    pub text: Value,
    #[serde(default)]
    pub current_word_index: Value,
    #[serde(default)]
    pub total_words: Value,
    #[serde(default)]
    pub settings: Value,
    /// Epoch milliseconds, stamped by the store.
    #[serde(default)]
    pub saved_at: Value,
}

impl SessionRecord {
    /// The stored text, or `""` when it is not a string.
    #[must_use]
    pub fn text_str(&self) -> &str {
        self.text.as_str().unwrap_or_default()
    }

    /// Stored position as an integer, truncating fractions.
    #[must_use]
    pub fn word_index(&self) -> Option<i64> {
        as_integer(&self.current_word_index)
    }

    /// Stored word count as an integer, truncating fractions.
    #[must_use]
    pub fn word_count(&self) -> Option<i64> {
        as_integer(&self.total_words)
    }

    #[must_use]
    pub fn saved_at_millis(&self) -> Option<i64> {
        as_integer(&self.saved_at)
    }

    /// Save time as a UTC timestamp, if `saved_at` is a number in chrono's range.
    #[must_use]
    pub fn saved_at_utc(&self) -> Option<DateTime<Utc>> {
        self.saved_at_millis()
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Strip the text, keeping only what a status check needs.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            current_word_index: self.current_word_index.clone(),
            total_words: self.total_words.clone(),
            saved_at: self.saved_at.clone(),
            has_text: is_truthy(&self.text),
        }
    }

    /// Back to a caller-facing session, when every field has its usual type.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        let current_word_index = self.current_word_index.as_i64()?;
        let total_words = self.total_words.as_i64()?;
        let Value::String(text) = self.text else {
            return None;
        };
        Some(Session {
            text,
            current_word_index,
            total_words,
            settings: self.settings,
        })
    }
}

/// Borrowed view used when writing, so saving never clones the text.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredSession<'a> {
    pub text: &'a str,
    pub current_word_index: i64,
    pub total_words: i64,
    pub settings: &'a Value,
    pub saved_at: i64,
}

impl<'a> StoredSession<'a> {
    pub(crate) fn stamp(session: &'a Session, saved_at: i64) -> Self {
        Self {
            text: &session.text,
            current_word_index: session.current_word_index,
            total_words: session.total_words,
            settings: &session.settings,
            saved_at,
        }
    }
}

/// Lightweight view of the stored session without its text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub current_word_index: Value,
    pub total_words: Value,
    pub saved_at: Value,
    pub has_text: bool,
}

impl SessionSummary {
    #[must_use]
    pub fn word_index(&self) -> Option<i64> {
        as_integer(&self.current_word_index)
    }

    #[must_use]
    pub fn word_count(&self) -> Option<i64> {
        as_integer(&self.total_words)
    }

    #[must_use]
    pub fn saved_at_utc(&self) -> Option<DateTime<Utc>> {
        as_integer(&self.saved_at).and_then(DateTime::from_timestamp_millis)
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Truthiness of a stored value: empty strings, zero, `false` and `null` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stored_layout() {
        let session = Session {
            text: "one two".to_string(),
            current_word_index: 1,
            total_words: 2,
            settings: json!({ "speed": 300 }),
        };
        let value = serde_json::to_value(StoredSession::stamp(&session, 42)).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "one two",
                "currentWordIndex": 1,
                "totalWords": 2,
                "settings": { "speed": 300 },
                "savedAt": 42
            })
        );
    }

    #[test]
    fn test_missing_fields_read_as_null() {
        let record: SessionRecord = serde_json::from_str(r#"{"currentWordIndex":3}"#).unwrap();
        assert_eq!(record.text, Value::Null);
        assert_eq!(record.total_words, Value::Null);
        assert_eq!(record.word_index(), Some(3));
        assert_eq!(record.word_count(), None);
        assert!(record.saved_at_utc().is_none());
        assert!(!record.summary().has_text);
        assert!(record.into_session().is_none());
    }

    #[test]
    fn test_odd_positions_pass_through() {
        let record: SessionRecord = serde_json::from_str(
            r#"{"text":"a b","currentWordIndex":1.5,"totalWords":"2","savedAt":5}"#,
        )
        .unwrap();
        assert_eq!(record.current_word_index, json!(1.5));
        assert_eq!(record.total_words, json!("2"));
        assert_eq!(record.word_index(), Some(1));
        assert_eq!(record.word_count(), None);

        let summary = record.summary();
        assert_eq!(summary.current_word_index, json!(1.5));
        assert!(summary.has_text);
    }

    #[test]
    fn test_negative_position_passes_through() {
        let record: SessionRecord = serde_json::from_str(
            r#"{"text":"a","currentWordIndex":-5,"totalWords":2,"savedAt":0}"#,
        )
        .unwrap();
        assert_eq!(record.word_index(), Some(-5));
        assert_eq!(record.into_session().unwrap().current_word_index, -5);
    }

    #[test]
    fn test_has_text_follows_truthiness() {
        let has_text = |text: Value| {
            SessionRecord {
                text,
                ..SessionRecord::default()
            }
            .summary()
            .has_text
        };
        assert!(has_text(json!("x")));
        assert!(has_text(json!(7)));
        assert!(has_text(json!([])));
        assert!(!has_text(json!("")));
        assert!(!has_text(json!(0)));
        assert!(!has_text(json!(false)));
        assert!(!has_text(Value::Null));
    }

    #[test]
    fn test_saved_at_utc() {
        let record = SessionRecord {
            saved_at: json!(1_700_000_000_000_i64),
            ..SessionRecord::default()
        };
        let ts = record.saved_at_utc().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(record.summary().saved_at_utc(), Some(ts));
    }
}

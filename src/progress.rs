//! Conversions between a word position and a completion percentage.

/// Word index at `percentage` of a text with `total_words` words.
///
/// The percentage is clamped to `[0, 100]` and the result floored, so the
/// index lies in `[0, total_words]`. Empty texts (`total_words <= 0`) and a
/// NaN percentage map to 0.
#[must_use]
pub fn percentage_to_word_index(percentage: f64, total_words: i64) -> i64 {
    if total_words <= 0 || percentage.is_nan() {
        return 0;
    }
    let clamped = percentage.clamp(0.0, 100.0);
    (clamped / 100.0 * total_words as f64).floor() as i64
}

/// Percentage of a `total_words` text that lies before `word_index`, rounded
/// to the nearest integer (halves round up).
///
/// `word_index` is not clamped: indices past the end give more than 100 and
/// negative indices give negative percentages. Empty texts map to 0.
#[must_use]
pub fn word_index_to_percentage(word_index: i64, total_words: i64) -> i64 {
    if total_words <= 0 {
        return 0;
    }
    let percentage = word_index as f64 / total_words as f64 * 100.0;
    (percentage + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_to_word_index() {
        assert_eq!(percentage_to_word_index(0.0, 1000), 0);
        assert_eq!(percentage_to_word_index(50.0, 1000), 500);
        assert_eq!(percentage_to_word_index(100.0, 1000), 1000);
        assert_eq!(percentage_to_word_index(33.3, 10), 3);
        assert_eq!(percentage_to_word_index(99.99, 7), 6);
    }

    #[test]
    fn test_percentage_is_clamped() {
        assert_eq!(percentage_to_word_index(150.0, 1000), 1000);
        assert_eq!(percentage_to_word_index(-10.0, 1000), 0);
        assert_eq!(percentage_to_word_index(f64::INFINITY, 40), 40);
        assert_eq!(percentage_to_word_index(f64::NAN, 40), 0);
    }

    #[test]
    fn test_empty_text_maps_to_zero() {
        assert_eq!(percentage_to_word_index(50.0, 0), 0);
        assert_eq!(percentage_to_word_index(50.0, -3), 0);
        assert_eq!(word_index_to_percentage(500, 0), 0);
        assert_eq!(word_index_to_percentage(500, -3), 0);
    }

    #[test]
    fn test_word_index_to_percentage() {
        assert_eq!(word_index_to_percentage(500, 1000), 50);
        assert_eq!(word_index_to_percentage(0, 1000), 0);
        assert_eq!(word_index_to_percentage(1000, 1000), 100);
        assert_eq!(word_index_to_percentage(1, 3), 33);
        assert_eq!(word_index_to_percentage(2, 3), 67);
        assert_eq!(word_index_to_percentage(1, 8), 13);
    }

    #[test]
    fn test_word_index_is_not_clamped() {
        assert_eq!(word_index_to_percentage(1200, 1000), 120);
        assert_eq!(word_index_to_percentage(-100, 1000), -10);
        // Halves round toward positive infinity.
        assert_eq!(word_index_to_percentage(-1, 200), 0);
    }
}

use std::path::Path;

/// Read a text file for reading.
pub fn load_text(path: impl AsRef<Path>) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Split text into words on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(String::from).collect()
}

/// Words `[index, index + size)` joined by spaces, clipped to the text.
pub fn chunk(words: &[String], index: usize, size: usize) -> String {
    let start = index.min(words.len());
    let end = index.saturating_add(size).min(words.len());
    words[start..end].join(" ")
}

/// Up to `radius` words either side of the chunk at `index`, for the pause view.
pub fn context(words: &[String], index: usize, size: usize, radius: usize) -> (String, String) {
    let start = index.min(words.len());
    let end = index.saturating_add(size).min(words.len());
    let before = words[start.saturating_sub(radius)..start].join(" ");
    let after = words[end..end.saturating_add(radius).min(words.len())].join(" ");
    (before, after)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  one\ttwo\n\nthree "), vec!["one", "two", "three"]);
        assert!(tokenize(" \n ").is_empty());
    }

    #[test]
    fn test_chunk() {
        let w = words("a b c d e");
        assert_eq!(chunk(&w, 0, 1), "a");
        assert_eq!(chunk(&w, 1, 3), "b c d");
        assert_eq!(chunk(&w, 3, 5), "d e");
        assert_eq!(chunk(&w, 9, 2), "");
    }

    #[test]
    fn test_context() {
        let w = words("a b c d e f g");
        assert_eq!(
            context(&w, 3, 1, 2),
            ("b c".to_string(), "e f".to_string())
        );
        assert_eq!(context(&w, 0, 2, 5), (String::new(), "c d e f g".to_string()));
        assert_eq!(context(&w, 7, 1, 2), ("f g".to_string(), String::new()));
    }

    #[test]
    fn test_load_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(&path, "call me ishmael").unwrap();
        assert_eq!(tokenize(&load_text(&path).unwrap()).len(), 3);
        assert!(load_text(dir.path().join("missing.txt")).is_err());
    }
}

// ABOUTME: Ready-made string transforms: identity, trim, lowercase normalize and truncate.

use super::{preprocessor, Preprocessor};

/// Returns the value unchanged.
pub fn identity() -> impl Preprocessor {
    preprocessor(|value| value)
}

/// Strips leading and trailing whitespace.
pub fn trim() -> impl Preprocessor {
    preprocessor(|value| value.trim().to_string())
}

/// Lowercases the value.
pub fn normalize() -> impl Preprocessor {
    preprocessor(|value| value.to_lowercase())
}

/// Keeps at most `length` characters.
pub fn truncate(length: usize) -> impl Preprocessor {
    preprocessor(move |value: String| match value.char_indices().nth(length) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(p: impl Preprocessor, value: &str) -> String {
        p.process(value.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn identity_passes_through() {
        assert_eq!(run(identity(), " As Is ").await, " As Is ");
    }

    #[tokio::test]
    async fn trim_strips_whitespace() {
        assert_eq!(run(trim(), "\n  Title \t").await, "Title");
    }

    #[tokio::test]
    async fn normalize_lowercases() {
        assert_eq!(run(normalize(), "HeLLo World").await, "hello world");
    }

    #[tokio::test]
    async fn truncate_bounds_length() {
        assert_eq!(run(truncate(5), "abcdefgh").await, "abcde");
        assert_eq!(run(truncate(10), "short").await, "short");
        assert_eq!(run(truncate(0), "gone").await, "");
    }

    #[tokio::test]
    async fn truncate_counts_characters() {
        assert_eq!(run(truncate(3), "héllo").await, "hél");
    }
}

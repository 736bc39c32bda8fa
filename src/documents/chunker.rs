//! Fixed-size text chunking.
//!
//! Splits on character counts only. Word and sentence boundaries are ignored,
//! so a chunk may end mid-word; splits never land inside a UTF-8 sequence.

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2000;

/// Split `text` into consecutive slices of at most `max_chunk_size` characters.
///
/// Concatenating the result reproduces `text`. Every slice but the last has
/// exactly `max_chunk_size` characters. Empty input yields no chunks. A size
/// of zero is treated as one.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<&str> {
    let size = max_chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_chunking_invariants(text: &str, size: usize) {
        let chunks = chunk_text(text, size);
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks.is_empty(), text.is_empty());

        if let Some((last, rest)) = chunks.split_last() {
            for chunk in rest {
                assert_eq!(chunk.chars().count(), size);
            }
            let last_len = last.chars().count();
            assert!(last_len > 0 && last_len <= size);
        }
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_text("", 1).is_empty());
        assert!(chunk_text("", DEFAULT_MAX_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_exact_and_ragged_splits() {
        assert_eq!(chunk_text("abcd", 2), vec!["ab", "cd"]);
        assert_eq!(chunk_text("abcde", 2), vec!["ab", "cd", "e"]);
        assert_eq!(chunk_text("abc", 10), vec!["abc"]);
    }

    #[test]
    fn test_splits_mid_word() {
        assert_eq!(chunk_text("hello world", 4), vec!["hell", "o wo", "rld"]);
    }

    #[test]
    fn test_multibyte_characters_are_never_split() {
        let text = "héllo wörld ✓✓✓ 日本語テキスト 🦀🦀";
        for size in 1..=8 {
            assert_chunking_invariants(text, size);
        }
        assert_eq!(chunk_text("日本語", 2), vec!["日本", "語"]);
    }

    #[test]
    fn test_invariants_over_sizes() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(97);
        for size in [1, 2, 3, 7, 64, 2000, 10_000] {
            assert_chunking_invariants(&text, size);
        }
    }

    #[test]
    fn test_default_size_chunk_count() {
        let text = "x".repeat(4500);
        let chunks = chunk_text(&text, DEFAULT_MAX_CHUNK_SIZE);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn test_zero_size_treated_as_one() {
        assert_eq!(chunk_text("abc", 0), vec!["a", "b", "c"]);
    }
}

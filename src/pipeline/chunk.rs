//! Greedy token-budget packing of whole pages into chunks.
//!
//! The packer walks the page list once, accumulating pages into a buffer
//! until adding the next page would push the running token count past the
//! target, at which point the buffer is flushed as one chunk. Pages are
//! atomic: a page is never split across chunks, so a single page larger than
//! the whole budget simply becomes its own oversized chunk. The flush check
//! runs *before* the append and only when the buffer is non-empty, which
//! gives the packer its key invariant: a chunk can exceed the budget only
//! when it consists of exactly one page.
//!
//! Token counts come from the fixed `cl100k_base` encoding and are used for
//! sizing only — the token ids themselves are discarded.

use crate::error::ReportError;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Token counter over the fixed `cl100k_base` encoding.
pub struct TokenCounter {
    bpe: CoreBPE,
}

impl TokenCounter {
    /// Initialise the encoder. The vocabulary is embedded in the binary, so
    /// this is infallible in practice but surfaces any init failure cleanly.
    pub fn new() -> Result<Self, ReportError> {
        let bpe = cl100k_base()
            .map_err(|e| ReportError::Internal(format!("tokenizer init failed: {}", e)))?;
        Ok(Self { bpe })
    }

    /// Number of tokens in `text` under `cl100k_base`.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

/// Pack pages into chunks bounded by `target_tokens`, using the production
/// [`TokenCounter`].
pub fn pack_pages(
    pages: &[String],
    target_tokens: usize,
    counter: &TokenCounter,
) -> Vec<String> {
    pack_pages_with(pages, target_tokens, |text| counter.count(text))
}

/// Pack pages into chunks bounded by `target_tokens`, with a caller-supplied
/// token counter.
///
/// Single greedy pass, order-preserving:
/// - flush the buffer when it is non-empty and the next page would exceed
///   the budget
/// - append the page unconditionally (pages are never split)
/// - flush whatever remains after the last page
///
/// Pages within a chunk are joined with `"\n\n"`. An empty page list yields
/// an empty chunk list; an empty page still occupies its slot in a chunk.
pub fn pack_pages_with<F>(pages: &[String], target_tokens: usize, count: F) -> Vec<String>
where
    F: Fn(&str) -> usize,
{
    let mut chunks: Vec<String> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut token_count = 0usize;

    for page in pages {
        let page_tokens = count(page);

        // Flush before appending, never on an empty buffer: the first page
        // of a chunk always gets in, however large it is.
        if !buffer.is_empty() && token_count + page_tokens > target_tokens {
            chunks.push(buffer.join("\n\n"));
            buffer.clear();
            token_count = 0;
        }

        buffer.push(page);
        token_count += page_tokens;
    }

    if !buffer.is_empty() {
        chunks.push(buffer.join("\n\n"));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic stand-in counter: one token per whitespace-separated word.
    fn words(text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(pack_pages_with(&[], 10, words).is_empty());
        assert!(pack_pages_with(&[], 1, words).is_empty());
    }

    #[test]
    fn all_pages_fit_in_one_chunk() {
        let chunks = pack_pages_with(&pages(&["a b", "c d", "e"]), 10, words);
        assert_eq!(chunks, vec!["a b\n\nc d\n\ne"]);
    }

    #[test]
    fn flushes_when_budget_would_be_exceeded() {
        // 3 + 3 fits a budget of 6; the third page forces a flush.
        let chunks = pack_pages_with(&pages(&["a b c", "d e f", "g h i"]), 6, words);
        assert_eq!(chunks, vec!["a b c\n\nd e f", "g h i"]);
    }

    #[test]
    fn oversized_single_page_becomes_its_own_chunk() {
        let big = "w ".repeat(50).trim().to_string();
        let chunks = pack_pages_with(&[big.clone()], 10, words);
        assert_eq!(chunks, vec![big]);
    }

    #[test]
    fn oversized_page_does_not_drag_neighbours_over_budget() {
        let big = "w ".repeat(20).trim().to_string();
        let input = pages(&["a b", big.as_str(), "c d"]);
        let chunks = pack_pages_with(&input, 5, words);
        // The big page flushes the first buffer, then flushes alone.
        assert_eq!(chunks, vec!["a b".to_string(), big, "c d".to_string()]);
    }

    #[test]
    fn empty_pages_are_kept_not_dropped() {
        let chunks = pack_pages_with(&pages(&["a b", "", "c d"]), 10, words);
        assert_eq!(chunks, vec!["a b\n\n\n\nc d"]);
    }

    #[test]
    fn order_is_preserved_and_pages_recoverable() {
        let input = pages(&["one", "two three", "four", "five six seven", "eight"]);
        let chunks = pack_pages_with(&input, 3, words);

        // Splitting each chunk on the join separator and flattening must
        // reproduce the original page sequence exactly.
        let recovered: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split("\n\n").map(str::to_string))
            .collect();
        assert_eq!(recovered, input);
    }

    #[test]
    fn multi_page_chunks_respect_budget() {
        let input: Vec<String> = (0..30).map(|i| format!("word{} extra", i)).collect();
        let target = 7;
        let chunks = pack_pages_with(&input, target, words);

        for chunk in &chunks {
            let constituents: Vec<&str> = chunk.split("\n\n").collect();
            if constituents.len() >= 2 {
                let total: usize = constituents.iter().map(|p| words(p)).sum();
                assert!(
                    total <= target,
                    "multi-page chunk exceeds budget: {} > {}",
                    total,
                    target
                );
            }
        }
    }

    #[test]
    fn real_tokenizer_counts_and_packs() {
        let counter = TokenCounter::new().unwrap();
        assert!(counter.count("hello world") >= 2);
        assert_eq!(counter.count(""), 0);

        let input = pages(&["hello world", "the quick brown fox", "jumps over"]);
        let chunks = pack_pages(&input, 4, &counter);
        assert!(!chunks.is_empty());
        let recovered: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.split("\n\n").map(str::to_string))
            .collect();
        assert_eq!(recovered, input);
    }
}

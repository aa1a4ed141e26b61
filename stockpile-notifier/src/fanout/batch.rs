//! Token batching
//!
//! Partitions a token set into contiguous groups that respect the
//! transport's per-call fanout ceiling. Batches carry no ordering
//! guarantee and may be dispatched independently and concurrently.

/// Splits tokens into batches of at most `limit` elements
///
/// Produces `ceil(len / limit)` batches whose concatenation equals the
/// input; an empty input produces zero batches, which the dispatcher treats
/// as "no network call".
pub fn batch_tokens(tokens: &[String], limit: usize) -> Vec<Vec<String>> {
    if tokens.is_empty() || limit == 0 {
        return Vec::new();
    }

    tokens.chunks(limit).map(|chunk| chunk.to_vec()).collect()
}

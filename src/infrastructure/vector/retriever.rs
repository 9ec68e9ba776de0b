//! Similarity ranking of stored chunks against a query embedding.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::models::Chunk;

/// A chunk with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine similarity in `[-1, 1]`
    pub score: f32,
}

/// Cosine similarity `dot(a, b) / (|a| |b|)`.
///
/// Sums are accumulated in `f64` so large components cannot overflow.
/// Returns 0.0 when the lengths differ, either vector has zero magnitude,
/// or the result is not finite.
#[allow(clippy::cast_possible_truncation)]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, norm_a, norm_b), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, norm_a + x * x, norm_b + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return 0.0;
    }

    similarity.clamp(-1.0, 1.0) as f32
}

/// Rank `entries` by similarity to `query` and keep the best `k`.
///
/// Scores are sorted descending with a stable sort, so equal scores keep
/// insertion order. Returns `min(k, entries.len())` results.
pub fn rank<'a, I>(query: &[f32], entries: I, k: usize) -> Vec<ScoredChunk>
where
    I: IntoIterator<Item = (&'a Chunk, &'a [f32])>,
{
    if k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<ScoredChunk> = entries
        .into_iter()
        .map(|(chunk, vector)| ScoredChunk {
            chunk: chunk.clone(),
            score: cosine_similarity(query, vector),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

//! Similarity ranking core: cosine scores against a single reference vector,
//! threshold filter, descending sort.
//!
//! Scores are compared and sorted unrounded; [`round_score`] is applied only
//! at the serialization boundary. Equal scores break ties by candidate
//! identifier, ascending, so ordering never depends on sort stability.

use std::cmp::Ordering;

/// A candidate that met the threshold, carrying its unrounded score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub id: String,
    pub score: f32,
}

/// Cosine of the angle between two vectors, in [-1, 1].
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scores every candidate vector against the reference, keeps those at or
/// above the threshold, and sorts descending by score (ties by id).
pub fn rank(
    reference: &[f32],
    candidates: &[(String, Vec<f32>)],
    threshold: f32,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|(id, vector)| ScoredCandidate {
            id: id.clone(),
            score: cosine_similarity(reference, vector),
        })
        .filter(|candidate| candidate.score >= threshold)
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    scored
}

/// Rounds a score to 3 decimal places for display.
pub fn round_score(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}

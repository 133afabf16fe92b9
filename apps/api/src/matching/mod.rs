//! Résumé-to-job matching: encode, compare, threshold, sort.

pub mod handlers;
pub mod models;
pub mod ranker;

use crate::embedding::EmbeddingProvider;
use crate::errors::AppError;
use crate::matching::ranker::ScoredCandidate;

/// Embeds the reference text and every usable candidate text, then ranks.
///
/// Candidates with empty or whitespace-only text never reach the model or
/// the ranker. Blocking (model inference); async callers dispatch through
/// `tokio::task::spawn_blocking`.
pub fn score_candidates(
    embedder: &dyn EmbeddingProvider,
    reference_text: &str,
    candidates: &[(String, String)],
    threshold: f32,
) -> Result<Vec<ScoredCandidate>, AppError> {
    let usable: Vec<&(String, String)> = candidates
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .collect();
    if usable.is_empty() {
        return Ok(Vec::new());
    }

    let reference = embedder
        .embed(reference_text)
        .map_err(|e| AppError::Embedding(e.to_string()))?;

    let texts: Vec<&str> = usable.iter().map(|(_, text)| text.as_str()).collect();
    let vectors = embedder
        .embed_batch(&texts)
        .map_err(|e| AppError::Embedding(e.to_string()))?;
    if vectors.len() != usable.len() {
        return Err(AppError::Embedding(format!(
            "expected {} vectors, model returned {}",
            usable.len(),
            vectors.len()
        )));
    }

    let pairs: Vec<(String, Vec<f32>)> = usable
        .iter()
        .map(|(id, _)| id.clone())
        .zip(vectors)
        .collect();

    Ok(ranker::rank(&reference, &pairs, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::CannedEmbeddings;

    const JOB: &str = "Full Stack Developer Node.js React";
    const R1: &str = "Backend Java developer";
    const R2: &str = "Full stack JavaScript and React engineer";

    fn embedder() -> CannedEmbeddings {
        // r2 points almost along the job vector, r1 mostly away from it.
        CannedEmbeddings::new(&[
            (JOB, &[1.0, 0.0, 0.0]),
            (R1, &[0.3, 0.95, 0.0]),
            (R2, &[0.9, 0.1, 0.0]),
        ])
    }

    fn pool() -> Vec<(String, String)> {
        vec![
            ("r1".to_string(), R1.to_string()),
            ("r2".to_string(), R2.to_string()),
        ]
    }

    #[test]
    fn test_semantically_closer_resume_wins() {
        let ranked = score_candidates(&embedder(), JOB, &pool(), 0.5).unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "r2");
        assert!(ranked[0].score >= 0.5);
    }

    #[test]
    fn test_lower_threshold_keeps_both_in_order() {
        let ranked = score_candidates(&embedder(), JOB, &pool(), 0.0).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "r2");
        assert_eq!(ranked[1].id, "r1");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_empty_candidate_list_is_empty_result() {
        let ranked = score_candidates(&embedder(), JOB, &[], 0.5).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_blank_candidates_are_never_embedded() {
        // The canned provider has no vector for blank text, so reaching the
        // model with it would error out.
        let mut candidates = pool();
        candidates.push(("blank".to_string(), "   ".to_string()));

        let ranked = score_candidates(&embedder(), JOB, &candidates, 0.0).unwrap();

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|c| c.id != "blank"));
    }

    #[test]
    fn test_all_blank_candidates_skip_reference_embedding() {
        // No vector registered for the reference either: proves nothing is
        // embedded when every candidate is blank.
        let provider = CannedEmbeddings::new(&[]);
        let candidates = vec![("a".to_string(), " ".to_string())];

        let ranked = score_candidates(&provider, "unembeddable", &candidates, 0.0).unwrap();

        assert!(ranked.is_empty());
    }

    #[test]
    fn test_threshold_above_max_score_is_empty_not_error() {
        let ranked = score_candidates(&embedder(), JOB, &pool(), 0.999).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_identical_inputs_rank_identically() {
        let first = score_candidates(&embedder(), JOB, &pool(), 0.0).unwrap();
        let second = score_candidates(&embedder(), JOB, &pool(), 0.0).unwrap();
        assert_eq!(first, second);
    }
}

use anyhow::anyhow;
use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::matching::models::{FilterResumesRequest, FilterResumesResponse, RankedCandidate};
use crate::matching::ranker::round_score;
use crate::matching::score_candidates;
use crate::state::AppState;

/// POST /api/v1/filter_resumes
pub async fn handle_filter_resumes(
    State(state): State<AppState>,
    Json(request): Json<FilterResumesRequest>,
) -> Result<Json<FilterResumesResponse>, AppError> {
    let job = request
        .job
        .ok_or_else(|| AppError::Validation("Missing 'job' data".to_string()))?;
    if request.resume.is_empty() {
        return Err(AppError::Validation("Missing 'resume' data".to_string()));
    }

    let job_text = job.combined_text();
    if job_text.is_empty() {
        return Err(AppError::Validation(
            "Job description text is empty".to_string(),
        ));
    }

    let candidates: Vec<(String, String)> = request
        .resume
        .iter()
        .map(|resume| (resume.id.clone(), resume.combined_text()))
        .collect();
    let total = candidates.len();

    let embedder = state.embedder.clone();
    let threshold = state.config.similarity_threshold;
    let ranked = tokio::task::spawn_blocking(move || {
        score_candidates(embedder.as_ref(), &job_text, &candidates, threshold)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("ranking task failed: {e}")))??;

    info!(
        "Ranked {} of {total} resumes at threshold {threshold}",
        ranked.len()
    );

    Ok(Json(FilterResumesResponse {
        ranked_candidates: ranked
            .into_iter()
            .map(|candidate| RankedCandidate {
                id: candidate.id,
                similarity_score: round_score(candidate.score),
            })
            .collect(),
    }))
}

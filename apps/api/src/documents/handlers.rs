use std::path::Path;

use anyhow::{anyhow, Context};
use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use crate::docai::{summarize_text, DEFAULT_MIME_TYPE, SUMMARY_MAX_WORDS};
use crate::errors::AppError;
use crate::extract::{extract_pdf_text, normalize_whitespace};
use crate::matching::ranker::round_score;
use crate::matching::score_candidates;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadJdResponse {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResumesResponse {
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadFromUrlRequest {
    pub jd_url: Option<String>,
    #[serde(default)]
    pub resume_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadFromUrlResponse {
    pub jd_path: Option<String>,
    pub resume_paths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchRequest {
    pub threshold: Option<f32>,
    pub top_n: Option<usize>,
    pub jd_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchRow {
    pub candidate: String,
    pub similarity: f32,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchRow>,
    pub csv_path: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ProcessDocumentRequest {
    pub gcs_uri: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessDocumentResponse {
    pub status: String,
    pub gcs_uri: String,
    pub summary: String,
}

/// POST /api/v1/upload_jd
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadJdResponse>, AppError> {
    let files = read_multipart_files(multipart).await?;
    let (name, bytes) = files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("No file in upload".to_string()))?;

    let path = state
        .store
        .save_jd(&name, &bytes)
        .await
        .map_err(AppError::Internal)?;
    info!("Stored job description at {}", path.display());

    Ok(Json(UploadJdResponse {
        path: path.display().to_string(),
    }))
}

/// POST /api/v1/upload_resumes
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResumesResponse>, AppError> {
    let files = read_multipart_files(multipart).await?;
    if files.is_empty() {
        return Err(AppError::Validation("No files in upload".to_string()));
    }

    let mut paths = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        let path = state
            .store
            .save_resume(&name, &bytes)
            .await
            .map_err(AppError::Internal)?;
        paths.push(path.display().to_string());
    }
    info!("Stored {} resumes", paths.len());

    Ok(Json(UploadResumesResponse { paths }))
}

/// POST /api/v1/upload_from_url
///
/// Fetches the JD and any résumés from remote URLs into the store. A failed
/// résumé fetch is skipped with a warning; a failed JD fetch is an error.
pub async fn handle_upload_from_url(
    State(state): State<AppState>,
    Json(request): Json<UploadFromUrlRequest>,
) -> Result<Json<UploadFromUrlResponse>, AppError> {
    if request.jd_url.is_none() && request.resume_urls.is_empty() {
        return Err(AppError::Validation(
            "Provide 'jd_url' and/or 'resume_urls'".to_string(),
        ));
    }

    let jd_path = match &request.jd_url {
        Some(url) => {
            let bytes = fetch_url(&state, url)
                .await
                .map_err(|e| AppError::Validation(format!("Failed to fetch JD from {url}: {e}")))?;
            let path = state
                .store
                .save_jd(&file_name_from_url(url), &bytes)
                .await
                .map_err(AppError::Internal)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let mut resume_paths = Vec::new();
    for url in &request.resume_urls {
        match fetch_url(&state, url).await {
            Ok(bytes) => {
                let path = state
                    .store
                    .save_resume(&file_name_from_url(url), &bytes)
                    .await
                    .map_err(AppError::Internal)?;
                resume_paths.push(path.display().to_string());
            }
            Err(e) => warn!("Skipping resume URL {url}: {e}"),
        }
    }

    info!(
        "URL ingestion complete: jd={}, resumes={}",
        jd_path.is_some(),
        resume_paths.len()
    );

    Ok(Json(UploadFromUrlResponse {
        jd_path,
        resume_paths,
    }))
}

/// POST /api/v1/match
///
/// Extracts the stored JD and every stored résumé, appends GitHub insights
/// when available, ranks, and writes the CSV export.
pub async fn handle_match(
    State(state): State<AppState>,
    request: Option<Json<MatchRequest>>,
) -> Result<Json<MatchResponse>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let threshold = request
        .threshold
        .unwrap_or(state.config.similarity_threshold);

    let jd_path = match &request.jd_path {
        Some(path) => state.store.resolve_jd(path).await?,
        None => state
            .store
            .latest_jd()
            .await
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::Validation("No job description uploaded".to_string()))?,
    };
    let jd_bytes = fs::read(&jd_path)
        .await
        .map_err(|_| AppError::NotFound(format!("Job description not found: {}", jd_path.display())))?;

    let resume_paths = state.store.list_resumes().await.map_err(AppError::Internal)?;
    let insights = state.store.load_github_insights().await;

    let mut resumes = Vec::with_capacity(resume_paths.len());
    for path in &resume_paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::read(path).await {
            Ok(bytes) => resumes.push((name, bytes)),
            Err(e) => warn!("Skipping unreadable resume {}: {e}", path.display()),
        }
    }
    let total = resumes.len();

    let embedder = state.embedder.clone();
    let ranked = tokio::task::spawn_blocking(move || {
        let jd_text = extract_pdf_text(&jd_bytes);
        if jd_text.is_empty() {
            return Err(AppError::Validation(
                "Job description contains no extractable text".to_string(),
            ));
        }

        let candidates: Vec<(String, String)> = resumes
            .iter()
            .map(|(name, bytes)| {
                let mut text = extract_pdf_text(bytes);
                let stem = Path::new(name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if let Some(insight) = insights.get(&stem) {
                    text = normalize_whitespace(&format!("{text} {insight}"));
                }
                (name.clone(), text)
            })
            .collect();

        score_candidates(embedder.as_ref(), &jd_text, &candidates, threshold)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("matching task failed: {e}")))??;

    info!("Matched {} of {total} stored resumes at threshold {threshold}", ranked.len());

    let rows: Vec<(String, f32)> = ranked
        .iter()
        .map(|candidate| (candidate.id.clone(), round_score(candidate.score)))
        .collect();
    let csv_path = state
        .store
        .write_matches_csv(&rows)
        .await
        .map_err(AppError::Internal)?;

    let mut matches: Vec<MatchRow> = rows
        .into_iter()
        .map(|(candidate, similarity)| MatchRow {
            candidate,
            similarity,
        })
        .collect();
    if let Some(top_n) = request.top_n {
        matches.truncate(top_n);
    }

    Ok(Json(MatchResponse {
        matches,
        csv_path: csv_path.display().to_string(),
    }))
}

/// GET /api/v1/download?path=...
pub async fn handle_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let path = state.store.resolve_download(&query.path).await?;
    let bytes = fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("File not found: {}", query.path)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matches.csv".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// POST /api/v1/process_document
pub async fn handle_process_document(
    State(state): State<AppState>,
    Json(request): Json<ProcessDocumentRequest>,
) -> Result<Json<ProcessDocumentResponse>, AppError> {
    let docai = state.docai.as_ref().ok_or_else(|| {
        AppError::NotConfigured("Document AI processing is not configured".to_string())
    })?;

    let gcs_uri = request
        .gcs_uri
        .as_deref()
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'gcs_uri'".to_string()))?;
    let mime_type = request.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE);

    let text = docai
        .process_gcs_document(gcs_uri, mime_type)
        .await
        .map_err(|e| AppError::DocumentAi(e.to_string()))?;

    let summary = summarize_text(&normalize_whitespace(&text), SUMMARY_MAX_WORDS);
    info!("Processed {gcs_uri} ({} summary words)", summary.split_whitespace().count());

    Ok(Json(ProcessDocumentResponse {
        status: "ok".to_string(),
        gcs_uri: gcs_uri.to_string(),
        summary,
    }))
}

/// Drains every file-bearing field from a multipart body.
async fn read_multipart_files(mut multipart: Multipart) -> Result<Vec<(String, Bytes)>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if bytes.is_empty() {
            continue;
        }
        files.push((name, bytes));
    }
    Ok(files)
}

async fn fetch_url(state: &AppState, url: &str) -> anyhow::Result<Bytes> {
    let response = state
        .http
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()
        .with_context(|| format!("{url} returned an error status"))?;
    response
        .bytes()
        .await
        .with_context(|| format!("failed to read body from {url}"))
}

/// Last path segment of the URL, or a generated name when it has none.
fn file_name_from_url(url: &str) -> String {
    url.split('/')
        .next_back()
        .map(|segment| segment.split(['?', '#']).next().unwrap_or("").to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{}.pdf", Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url_takes_last_segment() {
        assert_eq!(
            file_name_from_url("https://storage.googleapis.com/bucket/resume1.pdf"),
            "resume1.pdf"
        );
    }

    #[test]
    fn test_file_name_from_url_strips_query() {
        assert_eq!(
            file_name_from_url("https://host/b/cv.pdf?X-Goog-Signature=abc"),
            "cv.pdf"
        );
    }

    #[test]
    fn test_file_name_from_url_trailing_slash_generates_name() {
        let name = file_name_from_url("https://host/bucket/");
        assert!(name.ends_with(".pdf"));
        assert!(name.len() > 4);
    }

    #[test]
    fn test_match_request_defaults() {
        let request: MatchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.threshold.is_none());
        assert!(request.top_n.is_none());
        assert!(request.jd_path.is_none());
    }

    #[test]
    fn test_match_request_parses_threshold_override() {
        let request: MatchRequest =
            serde_json::from_str(r#"{"threshold": 0.4, "top_n": 5}"#).unwrap();
        assert_eq!(request.threshold, Some(0.4));
        assert_eq!(request.top_n, Some(5));
    }
}

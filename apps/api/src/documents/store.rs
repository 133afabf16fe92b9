//! Local-filesystem document store: uploaded JD and résumé PDFs, the
//! optional GitHub-insights sidecar, and CSV exports of ranked results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

pub struct DocumentStore {
    jd_dir: PathBuf,
    resumes_dir: PathBuf,
    output_dir: PathBuf,
    insights_file: PathBuf,
}

impl DocumentStore {
    pub fn new(config: &Config) -> Self {
        Self {
            jd_dir: config.jd_dir(),
            resumes_dir: config.resumes_dir(),
            output_dir: config.output_dir(),
            insights_file: config.insights_file(),
        }
    }

    pub async fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.jd_dir, &self.resumes_dir, &self.output_dir] {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    pub async fn save_jd(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        save_into(&self.jd_dir, file_name, "job_description.pdf", bytes).await
    }

    pub async fn save_resume(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let fallback = format!("{}.pdf", Uuid::new_v4());
        save_into(&self.resumes_dir, file_name, &fallback, bytes).await
    }

    /// Most recently modified stored JD, if any.
    pub async fn latest_jd(&self) -> Result<Option<PathBuf>> {
        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        let mut entries = match fs::read_dir(&self.jd_dir).await {
            Ok(entries) => entries,
            Err(_) => return Ok(None),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// All stored résumé PDFs, sorted by file name for a stable batch order.
    pub async fn list_resumes(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        let mut entries = match fs::read_dir(&self.resumes_dir).await {
            Ok(entries) => entries,
            Err(_) => return Ok(paths),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_pdf = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if path.is_file() && is_pdf {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// GitHub insight texts keyed by résumé file stem. Absent or unreadable
    /// sidecar degrades to an empty map.
    pub async fn load_github_insights(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.insights_file).await {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Could not parse {}: {e}; ignoring insights",
                    self.insights_file.display()
                );
                HashMap::new()
            }
        }
    }

    /// Writes ranked rows to a fresh CSV file in the output directory.
    pub async fn write_matches_csv(&self, rows: &[(String, f32)]) -> Result<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let unique = Uuid::new_v4().simple().to_string();
        let path = self
            .output_dir
            .join(format!("matches_{stamp}_{}.csv", &unique[..8]));
        fs::write(&path, render_csv(rows))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Resolves a client-supplied download path, confined to the output
    /// directory. Traversal outside it is a validation error.
    pub async fn resolve_download(&self, requested: &str) -> Result<PathBuf, AppError> {
        resolve_within(&self.output_dir, requested, "output").await
    }

    /// Resolves a client-supplied JD path, confined to the JD directory.
    pub async fn resolve_jd(&self, requested: &str) -> Result<PathBuf, AppError> {
        resolve_within(&self.jd_dir, requested, "job description").await
    }
}

async fn resolve_within(root: &Path, requested: &str, label: &str) -> Result<PathBuf, AppError> {
    let resolved = fs::canonicalize(Path::new(requested))
        .await
        .map_err(|_| AppError::NotFound(format!("File not found: {requested}")))?;
    let root = fs::canonicalize(root)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("{label} directory unavailable: {e}")))?;
    if !resolved.starts_with(&root) {
        return Err(AppError::Validation(format!(
            "Path is outside the {label} directory"
        )));
    }
    Ok(resolved)
}

async fn save_into(dir: &Path, file_name: &str, fallback: &str, bytes: &[u8]) -> Result<PathBuf> {
    let name = sanitize_file_name(file_name, fallback);
    let path = dir.join(name);
    fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Keeps only the final path component of a client-supplied name and drops
/// anything that could escape the target directory.
fn sanitize_file_name(name: &str, fallback: &str) -> String {
    let cleaned = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        fallback.to_string()
    } else {
        cleaned
    }
}

/// Two-column CSV of ranked matches. Fields with commas or quotes are quoted.
fn render_csv(rows: &[(String, f32)]) -> String {
    let mut out = String::from("Candidate,Similarity\n");
    for (candidate, similarity) in rows {
        out.push_str(&format!("{},{similarity:.3}\n", csv_field(candidate)));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

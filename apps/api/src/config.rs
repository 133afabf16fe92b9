use std::path::PathBuf;

use anyhow::{Context, Result};

/// Google Document AI settings. Present only when the processing route is enabled.
#[derive(Debug, Clone)]
pub struct DocAiConfig {
    pub project_id: String,
    pub location: String,
    pub processor_id: String,
    pub access_token: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum cosine similarity a candidate must reach to be ranked.
    /// Required; the historical API variants disagreed on a default, so there is none.
    pub similarity_threshold: f32,
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub fetch_timeout_secs: u64,
    pub docai: Option<DocAiConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let similarity_threshold = require_env("SIMILARITY_THRESHOLD")?
            .parse::<f32>()
            .context("SIMILARITY_THRESHOLD must be a float in [-1.0, 1.0]")?;

        // DOCAI_PROJECT_ID opts in; the remaining variables are then required.
        let docai = match std::env::var("DOCAI_PROJECT_ID") {
            Ok(project_id) => Some(DocAiConfig {
                project_id,
                location: require_env("DOCAI_LOCATION")?,
                processor_id: require_env("DOCAI_PROCESSOR_ID")?,
                access_token: require_env("DOCAI_ACCESS_TOKEN")?,
            }),
            Err(_) => None,
        };

        Ok(Config {
            similarity_threshold,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("FETCH_TIMEOUT_SECS must be a number of seconds")?,
            docai,
        })
    }

    pub fn jd_dir(&self) -> PathBuf {
        self.data_dir.join("jd")
    }

    pub fn resumes_dir(&self) -> PathBuf {
        self.data_dir.join("resumes")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }

    pub fn insights_file(&self) -> PathBuf {
        self.data_dir.join("github_insights.json")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

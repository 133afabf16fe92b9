//! Google Document AI client.
//!
//! Thin wrapper over the Document AI `:process` REST call for GCS-hosted
//! documents. No other module talks to the Document AI API directly.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::DocAiConfig;

const DOCAI_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Maximum number of words in the summary returned by the processing endpoint.
pub const SUMMARY_MAX_WORDS: usize = 150;

#[derive(Debug, Error)]
pub enum DocAiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GcsDocument<'a> {
    gcs_uri: &'a str,
    mime_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    gcs_document: GcsDocument<'a>,
}

#[derive(Debug, Deserialize)]
struct ProcessResponse {
    document: Option<ProcessedDocument>,
}

#[derive(Debug, Deserialize)]
struct ProcessedDocument {
    text: Option<String>,
}

#[derive(Clone)]
pub struct DocAiClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl DocAiClient {
    pub fn new(config: &DocAiConfig) -> Self {
        let endpoint = format!(
            "https://{location}-documentai.googleapis.com/v1/projects/{project}/locations/{location}/processors/{processor}:process",
            location = config.location,
            project = config.project_id,
            processor = config.processor_id,
        );
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DOCAI_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
            access_token: config.access_token.clone(),
        }
    }

    /// Runs the processor over a GCS document and returns the extracted text.
    /// A single failure surfaces directly; there are no retries.
    pub async fn process_gcs_document(
        &self,
        gcs_uri: &str,
        mime_type: &str,
    ) -> Result<String, DocAiError> {
        let request = ProcessRequest {
            gcs_document: GcsDocument { gcs_uri, mime_type },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DocAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ProcessResponse = response.json().await?;
        let text = body
            .document
            .and_then(|d| d.text)
            .unwrap_or_default();

        debug!("Document AI extracted {} characters from {gcs_uri}", text.len());
        Ok(text)
    }
}

/// First `max_words` words of the text, with a trailing ellipsis when truncated.
pub fn summarize_text(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_short_text_unchanged() {
        assert_eq!(summarize_text("one two three", 150), "one two three");
    }

    #[test]
    fn test_summarize_truncates_with_ellipsis() {
        assert_eq!(summarize_text("a b c d e", 3), "a b c...");
    }

    #[test]
    fn test_summarize_exact_length_has_no_ellipsis() {
        assert_eq!(summarize_text("a b c", 3), "a b c");
    }

    #[test]
    fn test_summarize_empty_text() {
        assert_eq!(summarize_text("", 150), "");
    }

    #[test]
    fn test_process_request_wire_shape() {
        let request = ProcessRequest {
            gcs_document: GcsDocument {
                gcs_uri: "gs://bucket/resume.pdf",
                mime_type: "application/pdf",
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["gcsDocument"]["gcsUri"], "gs://bucket/resume.pdf");
        assert_eq!(json["gcsDocument"]["mimeType"], "application/pdf");
    }
}

use serde::{Deserialize, Serialize};

use crate::extract::normalize_whitespace;

/// Job payload for `/filter_resumes`. All fields optional; they are
/// concatenated in a fixed order into the reference text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub exp_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl JobRequest {
    /// Combined reference text: title, experience level, location, skills,
    /// description, in that order.
    pub fn combined_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(title) = self.title.as_deref() {
            parts.push(title);
        }
        if let Some(exp_level) = self.exp_level.as_deref() {
            parts.push(exp_level);
        }
        if let Some(location) = self.location.as_deref() {
            parts.push(location);
        }
        for skill in &self.required_skills {
            parts.push(skill);
        }
        if let Some(description) = self.job_description.as_deref() {
            parts.push(description);
        }
        normalize_whitespace(&parts.join(" "))
    }
}

/// A single résumé in the `/filter_resumes` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeEntry {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub job_preference: Option<String>,
    #[serde(default)]
    pub github_insight: Option<String>,
}

impl ResumeEntry {
    /// Candidate text: summary, then preference and external insight when present.
    pub fn combined_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.summary];
        if let Some(preference) = self.job_preference.as_deref() {
            parts.push(preference);
        }
        if let Some(insight) = self.github_insight.as_deref() {
            parts.push(insight);
        }
        normalize_whitespace(&parts.join(" "))
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterResumesRequest {
    pub job: Option<JobRequest>,
    #[serde(default)]
    pub resume: Vec<ResumeEntry>,
}

#[derive(Debug, Serialize)]
pub struct RankedCandidate {
    #[serde(rename = "_id")]
    pub id: String,
    pub similarity_score: f32,
}

#[derive(Debug, Serialize)]
pub struct FilterResumesResponse {
    pub ranked_candidates: Vec<RankedCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_text_field_order() {
        let job = JobRequest {
            title: Some("Full Stack Developer".to_string()),
            exp_level: Some("Mid-level".to_string()),
            location: Some("Bangalore, India".to_string()),
            required_skills: vec!["Node.js".to_string(), "React".to_string()],
            job_description: Some("We are looking for a developer.".to_string()),
        };
        assert_eq!(
            job.combined_text(),
            "Full Stack Developer Mid-level Bangalore, India Node.js React We are looking for a developer."
        );
    }

    #[test]
    fn test_job_text_skips_absent_fields() {
        let job = JobRequest {
            title: Some("Backend Engineer".to_string()),
            ..Default::default()
        };
        assert_eq!(job.combined_text(), "Backend Engineer");
    }

    #[test]
    fn test_empty_job_text_is_empty() {
        assert_eq!(JobRequest::default().combined_text(), "");
    }

    #[test]
    fn test_resume_text_appends_preference_and_insight() {
        let resume = ResumeEntry {
            id: "r1".to_string(),
            summary: "Rust developer".to_string(),
            job_preference: Some("remote".to_string()),
            github_insight: Some("maintains an async runtime".to_string()),
        };
        assert_eq!(
            resume.combined_text(),
            "Rust developer remote maintains an async runtime"
        );
    }

    #[test]
    fn test_resume_text_whitespace_only_summary_is_empty() {
        let resume = ResumeEntry {
            id: "r1".to_string(),
            summary: "   \n\t".to_string(),
            job_preference: None,
            github_insight: None,
        };
        assert_eq!(resume.combined_text(), "");
    }

    #[test]
    fn test_request_deserializes_wire_names() {
        let body = serde_json::json!({
            "job": {
                "title": "Full Stack Developer",
                "expLevel": "Mid-level",
                "location": "Bangalore, India",
                "requiredSkills": ["JavaScript", "React"],
                "jobDescription": "We are looking for..."
            },
            "resume": [
                {"summary": "...", "_id": "r1", "jobPreference": "remote"}
            ]
        });
        let request: FilterResumesRequest = serde_json::from_value(body).unwrap();
        let job = request.job.unwrap();
        assert_eq!(job.exp_level.as_deref(), Some("Mid-level"));
        assert_eq!(job.required_skills.len(), 2);
        assert_eq!(request.resume[0].id, "r1");
        assert_eq!(request.resume[0].job_preference.as_deref(), Some("remote"));
    }

    #[test]
    fn test_response_serializes_wire_names() {
        let response = FilterResumesResponse {
            ranked_candidates: vec![RankedCandidate {
                id: "r2".to_string(),
                similarity_score: 0.75,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ranked_candidates"][0]["_id"], "r2");
        assert_eq!(json["ranked_candidates"][0]["similarity_score"], 0.75);
    }
}

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The job posting a resume is scanned against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobContext {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    pub description: String,
}

/// Candidate resume: extracted text plus, optionally, the original file.
#[derive(Debug, Clone, Default)]
pub struct ResumeContext {
    pub text: String,
    pub document: Option<ResumeDocument>,
}

impl ResumeContext {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            document: None,
        }
    }
}

/// Original resume bytes, attached to provider calls as a document.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub media_type: String,
    pub data: Bytes,
}

impl ResumeDocument {
    pub fn pdf(data: Bytes) -> Self {
        Self {
            media_type: "application/pdf".to_string(),
            data,
        }
    }
}

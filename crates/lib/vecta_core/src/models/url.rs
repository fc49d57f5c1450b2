//! URL ingestion models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a submitted URL. Owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Pending,
    Crawling,
    Encoding,
    Stored,
    Failed,
}

impl UrlStatus {
    /// All statuses in pipeline order.
    pub const ALL: [UrlStatus; 5] = [
        UrlStatus::Pending,
        UrlStatus::Crawling,
        UrlStatus::Encoding,
        UrlStatus::Stored,
        UrlStatus::Failed,
    ];

    /// Wire value, also used as the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            UrlStatus::Pending => "pending",
            UrlStatus::Crawling => "crawling",
            UrlStatus::Encoding => "encoding",
            UrlStatus::Stored => "stored",
            UrlStatus::Failed => "failed",
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            UrlStatus::Pending => "Pending",
            UrlStatus::Crawling => "Crawling",
            UrlStatus::Encoding => "Encoding",
            UrlStatus::Stored => "Stored",
            UrlStatus::Failed => "Failed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            UrlStatus::Pending => "⏳",
            UrlStatus::Crawling => "🕷️",
            UrlStatus::Encoding => "⚙️",
            UrlStatus::Stored => "✅",
            UrlStatus::Failed => "❌",
        }
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrlStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown URL status: {s}"))
    }
}

/// A URL tracked by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    pub url_id: String,
    pub project_id: String,
    pub original_url: String,
    pub status: UrlStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub submitted_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub last_updated_at: DateTime<Utc>,
}

/// Body of `POST projects/{id}/urls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSubmission {
    pub original_url: String,
}

/// Body of `POST projects/{id}/urls:batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlBatchSubmission {
    pub urls: Vec<String>,
}

/// Reference to a URL the project already holds. The backend only sends
/// the identifiers and the last update time for duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlReference {
    pub url_id: String,
    pub project_id: String,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub last_updated_at: DateTime<Utc>,
}

/// Response of `POST projects/{id}/urls:batch`. Duplicate detection is
/// done by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlBatchSubmissionResponse {
    pub submitted_urls: Vec<Url>,
    pub duplicate_urls: Vec<UrlReference>,
}

/// `detail` of the 409 the backend sends on single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlDuplicateResponse {
    pub message: String,
    pub existing_url: UrlReference,
}

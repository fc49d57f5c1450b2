//! Project models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project as returned by `projects` and `projects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub user_id: String,
    pub project_name: String,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST projects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub project_name: String,
}

/// Body of `PATCH projects/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub project_name: String,
}

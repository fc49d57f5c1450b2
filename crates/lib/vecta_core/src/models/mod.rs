//! Wire and domain models shared by the client and the CLI.
//!
//! Field names follow the backend's snake_case JSON exactly, so no
//! `#[serde(rename)]` is needed on the structs themselves.

pub mod auth;
pub mod datetime;
pub mod project;
pub mod resource;
pub mod url;

pub use auth::{AuthToken, RegisteredUser, TokenClaims, User};
pub use project::{Project, ProjectCreate, ProjectUpdate};
pub use resource::ResourceState;
pub use url::{
    Url, UrlBatchSubmission, UrlBatchSubmissionResponse, UrlDuplicateResponse, UrlReference,
    UrlStatus, UrlSubmission,
};

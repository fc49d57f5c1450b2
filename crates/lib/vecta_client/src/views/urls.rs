//! URL management screens of a project.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::error;
use vecta_core::models::{Url, UrlStatus};

use crate::AppContext;
use crate::submission::UrlSubmissionPipeline;
use crate::urls::UrlService;

/// Filter choices offered above the list; `None` shows everything.
pub const STATUS_FILTERS: [Option<UrlStatus>; 6] = [
    None,
    Some(UrlStatus::Pending),
    Some(UrlStatus::Crawling),
    Some(UrlStatus::Encoding),
    Some(UrlStatus::Stored),
    Some(UrlStatus::Failed),
];

pub fn filter_label(filter: Option<UrlStatus>) -> &'static str {
    filter.map_or("All", UrlStatus::display_name)
}

/// Shorten `url` to `max_len` characters, appending `...` when cut.
pub fn truncate_url(url: &str, max_len: usize) -> String {
    if url.chars().count() > max_len {
        let head: String = url.chars().take(max_len).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

/// List of a project's URLs with status filters.
#[derive(Debug)]
pub struct UrlListView {
    project_id: String,
    urls: Arc<UrlService>,
}

impl UrlListView {
    pub fn new(ctx: &AppContext, project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            urls: Arc::clone(&ctx.urls),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Make this project the current one; loads its URLs on change.
    pub async fn open(&self) -> bool {
        if self.project_id.is_empty() {
            return false;
        }
        self.urls
            .set_current_project(Some(self.project_id.clone()))
            .await
    }

    /// Open with `status` already applied, so a fresh list loads once.
    pub async fn open_filtered(&self, status: Option<UrlStatus>) {
        self.urls.set_status_filter(status);
        if !self.open().await {
            self.refresh().await;
        }
    }

    pub async fn refresh(&self) {
        self.urls.refresh_urls().await;
    }

    /// Apply a filter and reload so the backend sees it too.
    pub async fn set_filter(&self, status: Option<UrlStatus>) {
        self.urls.set_status_filter(status);
        self.urls.refresh_urls().await;
    }

    pub fn current_filter(&self) -> Option<UrlStatus> {
        self.urls.status_filter()
    }

    pub fn urls(&self) -> Vec<Url> {
        self.urls.filtered_urls()
    }

    pub fn has_urls(&self) -> bool {
        !self.urls().is_empty()
    }

    pub fn count_by_status(&self) -> BTreeMap<UrlStatus, usize> {
        self.urls.count_by_status()
    }

    pub fn total_count(&self) -> usize {
        self.urls.total_count()
    }

    pub fn is_loading(&self) -> bool {
        self.urls.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.urls.error()
    }

    /// Delete one URL and reload the list. Failures are only logged.
    pub async fn delete_url(&self, url_id: &str) -> bool {
        match self.urls.delete_url(&self.project_id, url_id).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!(project_id = %self.project_id, %url_id, error = %e, "error deleting url");
                false
            }
        }
    }
}

/// URL page of a project: submission forms above the list. A successful
/// submission reloads the list.
#[derive(Debug)]
pub struct UrlManagementView {
    list: UrlListView,
    submission: UrlSubmissionPipeline,
}

impl UrlManagementView {
    pub fn new(ctx: &AppContext, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            submission: UrlSubmissionPipeline::new(project_id.clone(), Arc::clone(&ctx.urls)),
            list: UrlListView::new(ctx, project_id),
        }
    }

    pub fn list(&self) -> &UrlListView {
        &self.list
    }

    pub fn submission(&self) -> &UrlSubmissionPipeline {
        &self.submission
    }

    pub async fn open(&self) {
        self.list.open().await;
    }

    pub async fn submit_single(&self) {
        self.submission.submit_single().await;
        if self.submission.single_state().is_success() {
            self.list.refresh().await;
        }
    }

    pub async fn submit_batch(&self) {
        self.submission.submit_batch().await;
        if self.submission.batch_state().is_success() {
            self.list.refresh().await;
        }
    }
}

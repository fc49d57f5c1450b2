//! URL service: submission and listing of URLs within a project.
//!
//! The visible list is the join of four inputs: the current project
//! (reload on change), manual refreshes, the status filter sent to the
//! backend at reload time, and the same filter re-applied on the snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};
use vecta_core::models::{
    ResourceState, Url, UrlBatchSubmission, UrlBatchSubmissionResponse, UrlStatus, UrlSubmission,
};

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::state::{LatestGuard, Signal};

#[derive(Debug)]
pub struct UrlService {
    gateway: Arc<Gateway>,
    current_project: Signal<Option<String>>,
    status_filter: Signal<Option<UrlStatus>>,
    state: Signal<ResourceState<Vec<Url>>>,
    reloads: LatestGuard,
}

impl UrlService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            current_project: Signal::new(None),
            status_filter: Signal::new(None),
            state: Signal::new(ResourceState::Idle),
            reloads: LatestGuard::new(),
        }
    }

    pub async fn submit_single(&self, project_id: &str, data: &UrlSubmission) -> GatewayResult<Url> {
        let url: Url = self
            .gateway
            .post(&format!("projects/{project_id}/urls"), data)
            .await?;
        info!(%project_id, url_id = %url.url_id, "url submitted");
        Ok(url)
    }

    pub async fn submit_batch(
        &self,
        project_id: &str,
        data: &UrlBatchSubmission,
    ) -> GatewayResult<UrlBatchSubmissionResponse> {
        let resp: UrlBatchSubmissionResponse = self
            .gateway
            .post(&format!("projects/{project_id}/urls:batch"), data)
            .await?;
        info!(
            %project_id,
            submitted = resp.submitted_urls.len(),
            duplicates = resp.duplicate_urls.len(),
            "url batch submitted"
        );
        Ok(resp)
    }

    /// List a project's URLs, optionally filtered by the backend.
    pub async fn list_in_project(
        &self,
        project_id: &str,
        status: Option<UrlStatus>,
    ) -> GatewayResult<Vec<Url>> {
        let path = format!("projects/{project_id}/urls");
        match status {
            Some(status) => self.gateway.get(&path, &[("status", status.as_str())]).await,
            None => self.gateway.get(&path, &[]).await,
        }
    }

    pub async fn get_url(&self, project_id: &str, url_id: &str) -> GatewayResult<Url> {
        self.gateway
            .get(&format!("projects/{project_id}/urls/{url_id}"), &[])
            .await
    }

    pub async fn delete_url(&self, project_id: &str, url_id: &str) -> GatewayResult<()> {
        self.gateway
            .delete(&format!("projects/{project_id}/urls/{url_id}"))
            .await
    }

    /// Ask the backend to run a URL through the pipeline again.
    pub async fn reprocess_url(&self, project_id: &str, url_id: &str) -> GatewayResult<Url> {
        self.gateway
            .post(
                &format!("projects/{project_id}/urls/{url_id}:reprocess"),
                &serde_json::json!({}),
            )
            .await
    }

    /// Select the project whose URLs are listed. Reloads only on change and
    /// reports whether it did.
    pub async fn set_current_project(&self, project_id: Option<String>) -> bool {
        let changed = self.current_project.set_if_changed(project_id);
        if changed {
            self.reload().await;
        }
        changed
    }

    pub fn current_project(&self) -> Option<String> {
        self.current_project.get()
    }

    /// Set the status filter. Applied to the snapshot immediately and sent
    /// to the backend on the next reload.
    pub fn set_status_filter(&self, status: Option<UrlStatus>) {
        self.status_filter.set_if_changed(status);
    }

    pub fn status_filter(&self) -> Option<UrlStatus> {
        self.status_filter.get()
    }

    pub async fn refresh_urls(&self) {
        self.reload().await;
    }

    async fn reload(&self) {
        let ticket = self.reloads.begin();
        let Some(project_id) = self.current_project.get() else {
            self.state.set(ResourceState::Idle);
            return;
        };
        self.state.set(ResourceState::Loading);

        let result = self
            .list_in_project(&project_id, self.status_filter.get())
            .await;
        if !self.reloads.is_current(ticket) {
            debug!(%project_id, "discarding superseded url list");
            return;
        }
        match result {
            Ok(urls) => self.state.set(ResourceState::Success(urls)),
            Err(e) => self.state.set(ResourceState::Error(e.to_string())),
        }
    }

    pub fn urls_state(&self) -> ResourceState<Vec<Url>> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<Vec<Url>>> {
        self.state.subscribe()
    }

    /// Latest loaded URLs, unfiltered by the client.
    pub fn urls(&self) -> Vec<Url> {
        self.state
            .with(|state| state.data().cloned().unwrap_or_default())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(ResourceState::is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|state| state.error().map(str::to_string))
    }

    /// Loaded URLs with the status filter applied on the client.
    pub fn filtered_urls(&self) -> Vec<Url> {
        let filter = self.status_filter.get();
        self.urls()
            .into_iter()
            .filter(|url| filter.is_none_or(|status| url.status == status))
            .collect()
    }

    pub fn count_by_status(&self) -> BTreeMap<UrlStatus, usize> {
        self.state.with(|state| {
            let mut counts = BTreeMap::new();
            for url in state.data().map(Vec::as_slice).unwrap_or_default() {
                *counts.entry(url.status).or_insert(0) += 1;
            }
            counts
        })
    }

    pub fn total_count(&self) -> usize {
        self.count_by_status().values().sum()
    }
}

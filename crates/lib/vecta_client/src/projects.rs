//! Project service: CRUD over `projects` with a cached, reloadable list.
//!
//! The cached list is never patched locally. Every successful mutation
//! bumps the refresh counter and reloads the whole collection; a reload
//! started later wins over one started earlier.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};
use vecta_core::models::{Project, ProjectCreate, ProjectUpdate, ResourceState};

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::state::{LatestGuard, Signal};

#[derive(Debug)]
pub struct ProjectService {
    gateway: Arc<Gateway>,
    state: Signal<ResourceState<Vec<Project>>>,
    selected: Signal<Option<Project>>,
    reloads: LatestGuard,
}

impl ProjectService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            state: Signal::new(ResourceState::Idle),
            selected: Signal::new(None),
            reloads: LatestGuard::new(),
        }
    }

    /// Latest loaded projects; empty unless the last reload succeeded.
    pub fn projects(&self) -> Vec<Project> {
        self.state
            .with(|state| state.data().cloned().unwrap_or_default())
    }

    pub fn projects_state(&self) -> ResourceState<Vec<Project>> {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<Vec<Project>>> {
        self.state.subscribe()
    }

    /// Number of reloads requested so far.
    pub fn refresh_count(&self) -> u64 {
        self.reloads.generation()
    }

    /// Reload the full project list.
    pub async fn refresh(&self) {
        let ticket = self.reloads.begin();
        self.state.set(ResourceState::Loading);

        let result: GatewayResult<Vec<Project>> = self.gateway.get("projects", &[]).await;
        if !self.reloads.is_current(ticket) {
            debug!("discarding superseded project list");
            return;
        }
        match result {
            Ok(projects) => self.state.set(ResourceState::Success(projects)),
            Err(e) => self.state.set(ResourceState::Error(e.to_string())),
        }
    }

    pub async fn create(&self, data: &ProjectCreate) -> GatewayResult<Project> {
        let project: Project = self.gateway.post("projects", data).await?;
        info!(project_id = %project.project_id, "project created");
        self.refresh().await;
        Ok(project)
    }

    /// Fetch one project and make it the selected one.
    pub async fn get(&self, project_id: &str) -> GatewayResult<Project> {
        let project: Project = self
            .gateway
            .get(&format!("projects/{project_id}"), &[])
            .await?;
        self.selected.set(Some(project.clone()));
        Ok(project)
    }

    pub async fn update(&self, project_id: &str, data: &ProjectUpdate) -> GatewayResult<Project> {
        let project: Project = self
            .gateway
            .patch(&format!("projects/{project_id}"), data)
            .await?;
        info!(%project_id, "project renamed");
        self.refresh().await;
        Ok(project)
    }

    pub async fn delete(&self, project_id: &str) -> GatewayResult<()> {
        self.gateway
            .delete(&format!("projects/{project_id}"))
            .await?;
        info!(%project_id, "project deleted");
        self.refresh().await;
        Ok(())
    }

    pub fn selected(&self) -> Option<Project> {
        self.selected.get()
    }

    pub fn set_selected(&self, project: Option<Project>) {
        self.selected.set(project);
    }
}

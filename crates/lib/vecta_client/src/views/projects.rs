//! Project screens: list, creation form and detail page.

use std::sync::Arc;

use tracing::{debug, error};
use vecta_core::models::{Project, ProjectCreate, ProjectUpdate};
use vecta_core::validation::{self, Field};

use super::ViewStatus;
use crate::AppContext;
use crate::guards::{Navigator, Route};
use crate::projects::ProjectService;
use crate::state::{LatestGuard, Signal};

pub const CREATE_FAILED_MESSAGE: &str = "Failed to create project. Please try again.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load project. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update project. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete project. Please try again.";

#[derive(Debug)]
pub struct ProjectListView {
    projects: Arc<ProjectService>,
    navigator: Arc<Navigator>,
    status: ViewStatus,
}

impl ProjectListView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            projects: Arc::clone(&ctx.projects),
            navigator: Arc::clone(&ctx.navigator),
            status: ViewStatus::default(),
        }
    }

    pub async fn load(&self) {
        self.projects.refresh().await;
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.projects()
    }

    pub fn has_projects(&self) -> bool {
        !self.projects().is_empty()
    }

    /// Open a project's detail page.
    pub fn select(&self, project: Project) -> Route {
        let route = Route::ProjectDetail(project.project_id.clone());
        self.projects.set_selected(Some(project));
        self.navigator.navigate(route)
    }

    pub fn create_new(&self) -> Route {
        self.navigator.navigate(Route::CreateProject)
    }

    pub async fn delete(&self, project_id: &str) -> bool {
        self.status.start();
        match self.projects.delete(project_id).await {
            Ok(()) => {
                self.status.finish();
                true
            }
            Err(e) => {
                error!(%project_id, error = %e, "error deleting project");
                self.status.fail(DELETE_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Loading state of the view's own action or of the list reload.
    pub fn is_loading(&self) -> bool {
        self.status.is_loading() || self.projects.projects_state().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}

#[derive(Debug)]
pub struct CreateProjectView {
    projects: Arc<ProjectService>,
    navigator: Arc<Navigator>,
    name: Signal<Field>,
    status: ViewStatus,
    runs: LatestGuard,
}

impl CreateProjectView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            projects: Arc::clone(&ctx.projects),
            navigator: Arc::clone(&ctx.navigator),
            name: Signal::default(),
            status: ViewStatus::default(),
            runs: LatestGuard::new(),
        }
    }

    pub fn set_name(&self, value: &str) {
        self.name.update(|f| f.set(value));
    }

    pub fn name(&self) -> String {
        self.name.with(|f| f.value().to_string())
    }

    /// Create the project and open its detail page. A later submit
    /// supersedes an earlier one still in flight.
    pub async fn submit(&self) -> Option<Project> {
        let ticket = self.runs.begin();
        let project_name = match self.name.with(|f| validation::validate_project_name(f.value())) {
            Ok(name) => name,
            Err(e) => {
                self.status.fail(e.to_string());
                return None;
            }
        };

        self.status.start();
        let result = self.projects.create(&ProjectCreate { project_name }).await;
        if !self.runs.is_current(ticket) {
            debug!("project creation superseded");
            return None;
        }
        match result {
            Ok(project) => {
                self.status.finish();
                self.navigator
                    .navigate(Route::ProjectDetail(project.project_id.clone()));
                Some(project)
            }
            Err(e) => {
                error!(error = %e, "error creating project");
                self.status.fail(CREATE_FAILED_MESSAGE);
                None
            }
        }
    }

    pub fn cancel(&self) -> Route {
        self.navigator.navigate(Route::Projects)
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}

/// Detail page of one project, with inline rename.
#[derive(Debug)]
pub struct ProjectDetailView {
    project_id: String,
    projects: Arc<ProjectService>,
    navigator: Arc<Navigator>,
    project: Signal<Option<Project>>,
    editing: Signal<bool>,
    edit_name: Signal<String>,
    status: ViewStatus,
    loads: LatestGuard,
}

impl ProjectDetailView {
    pub fn new(ctx: &AppContext, project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            projects: Arc::clone(&ctx.projects),
            navigator: Arc::clone(&ctx.navigator),
            project: Signal::new(None),
            editing: Signal::new(false),
            edit_name: Signal::default(),
            status: ViewStatus::default(),
            loads: LatestGuard::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn project(&self) -> Option<Project> {
        self.project.get()
    }

    pub async fn load(&self) {
        if self.project_id.is_empty() {
            return;
        }
        let ticket = self.loads.begin();
        self.status.start();
        let result = self.projects.get(&self.project_id).await;
        if !self.loads.is_current(ticket) {
            return;
        }
        match result {
            Ok(project) => {
                self.project.set(Some(project));
                self.status.finish();
            }
            Err(e) => {
                error!(project_id = %self.project_id, error = %e, "error loading project");
                self.project.set(None);
                self.status.fail(LOAD_FAILED_MESSAGE);
            }
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.get()
    }

    pub fn edit_name(&self) -> String {
        self.edit_name.get()
    }

    /// Enter rename mode, prefilled with the current name.
    pub fn start_edit(&self) {
        if let Some(project) = self.project() {
            self.edit_name.set(project.project_name);
            self.editing.set(true);
        }
    }

    pub fn set_edit_name(&self, value: &str) {
        self.edit_name.set(value.to_string());
    }

    pub fn cancel_edit(&self) {
        self.editing.set(false);
        self.edit_name.set(String::new());
    }

    /// Submit the rename. A blank name is ignored.
    pub async fn save(&self) -> bool {
        let project_name = self.edit_name.with(|name| name.trim().to_string());
        if project_name.is_empty() || self.project_id.is_empty() {
            return false;
        }

        self.status.start();
        match self
            .projects
            .update(&self.project_id, &ProjectUpdate { project_name })
            .await
        {
            Ok(project) => {
                self.project.set(Some(project));
                self.status.finish();
                self.cancel_edit();
                true
            }
            Err(e) => {
                error!(project_id = %self.project_id, error = %e, "error updating project");
                self.status.fail(UPDATE_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Delete the loaded project and return to the project list.
    pub async fn delete(&self) -> bool {
        let Some(project) = self.project() else {
            return false;
        };

        self.status.start();
        match self.projects.delete(&project.project_id).await {
            Ok(()) => {
                self.status.finish();
                self.navigator.navigate(Route::Projects);
                true
            }
            Err(e) => {
                error!(project_id = %project.project_id, error = %e, "error deleting project");
                self.status.fail(DELETE_FAILED_MESSAGE);
                false
            }
        }
    }

    pub fn open_urls(&self) -> Route {
        self.navigator
            .navigate(Route::ProjectUrls(self.project_id.clone()))
    }

    pub fn back(&self) -> Route {
        self.navigator.navigate(Route::Projects)
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}

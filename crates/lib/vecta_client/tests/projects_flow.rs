//! Project service and project screens against the fake backend.

mod common;

use axum::http::{Method, StatusCode};
use common::FakeBackend;
use vecta_client::guards::Route;
use vecta_client::views::{CreateProjectView, ProjectDetailView, ProjectListView};
use vecta_core::models::{ProjectCreate, ResourceState};

#[tokio::test]
async fn refresh_loads_the_project_list() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Docs");
    backend.add_project("p2", "Blog");
    let ctx = backend.signed_in().await;

    assert_eq!(ctx.projects.projects_state(), ResourceState::Idle);
    ctx.projects.refresh().await;

    let names: Vec<String> = ctx
        .projects
        .projects()
        .into_iter()
        .map(|p| p.project_name)
        .collect();
    assert_eq!(names, ["Docs", "Blog"]);
    assert_eq!(ctx.projects.refresh_count(), 1);
}

#[tokio::test]
async fn mutations_reload_the_whole_list() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;

    let created = ctx
        .projects
        .create(&ProjectCreate {
            project_name: "Research".into(),
        })
        .await
        .expect("create");
    assert_eq!(ctx.projects.projects(), vec![created.clone()]);

    ctx.projects.delete(&created.project_id).await.expect("delete");
    assert!(ctx.projects.projects().is_empty());

    assert_eq!(ctx.projects.refresh_count(), 2);
    assert_eq!(backend.requests_to(Method::GET, "projects").len(), 2);
}

#[tokio::test]
async fn failed_reload_exposes_the_error() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;
    backend.fail(Method::GET, "projects", StatusCode::INTERNAL_SERVER_ERROR);

    ctx.projects.refresh().await;

    assert!(ctx.projects.projects().is_empty());
    assert!(ctx.projects.projects_state().error().is_some());
}

#[tokio::test]
async fn create_view_navigates_to_the_new_project() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;
    let view = CreateProjectView::new(&ctx);
    view.set_name("  Knowledge base  ");

    let project = view.submit().await.expect("created");

    assert_eq!(project.project_name, "Knowledge base");
    assert_eq!(
        ctx.navigator.current(),
        Route::ProjectDetail(project.project_id.clone())
    );
    let body = backend.requests_to(Method::POST, "projects")[0].json();
    assert_eq!(body["project_name"], "Knowledge base");
}

#[tokio::test]
async fn create_view_requires_a_name() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;
    let view = CreateProjectView::new(&ctx);
    view.set_name("   ");

    assert!(view.submit().await.is_none());
    assert_eq!(view.error().as_deref(), Some("Project name is required"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn create_view_reports_backend_failure() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;
    backend.fail(Method::POST, "projects", StatusCode::INTERNAL_SERVER_ERROR);
    let view = CreateProjectView::new(&ctx);
    view.set_name("Docs");

    assert!(view.submit().await.is_none());
    assert_eq!(
        view.error().as_deref(),
        Some("Failed to create project. Please try again.")
    );
    assert!(!view.is_loading());
}

#[tokio::test]
async fn deleting_an_empty_project_returns_to_the_list() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Empty");
    let ctx = backend.signed_in().await;
    ctx.navigator.navigate(Route::ProjectDetail("p1".into()));

    let view = ProjectDetailView::new(&ctx, "p1");
    view.load().await;
    assert_eq!(view.project().map(|p| p.project_name).as_deref(), Some("Empty"));

    assert!(view.delete().await);
    assert_eq!(ctx.navigator.current(), Route::Projects);
    assert!(backend.state().projects.is_empty());
}

#[tokio::test]
async fn detail_view_renames_in_place() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Old");
    let ctx = backend.signed_in().await;
    let view = ProjectDetailView::new(&ctx, "p1");
    view.load().await;

    view.start_edit();
    assert!(view.is_editing());
    assert_eq!(view.edit_name(), "Old");

    view.set_edit_name("  New  ");
    assert!(view.save().await);

    assert!(!view.is_editing());
    assert_eq!(view.project().map(|p| p.project_name).as_deref(), Some("New"));
    assert_eq!(
        backend.requests_to(Method::PATCH, "projects/p1")[0].json()["project_name"],
        "New"
    );
    assert_eq!(ctx.projects.projects()[0].project_name, "New");
}

#[tokio::test]
async fn detail_view_ignores_blank_rename() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Old");
    let ctx = backend.signed_in().await;
    let view = ProjectDetailView::new(&ctx, "p1");
    view.load().await;
    view.start_edit();
    view.set_edit_name("   ");

    assert!(!view.save().await);
    assert!(backend.requests_to(Method::PATCH, "projects/p1").is_empty());
}

#[tokio::test]
async fn detail_view_reports_missing_project() {
    let backend = FakeBackend::start().await;
    let ctx = backend.signed_in().await;
    let view = ProjectDetailView::new(&ctx, "ghost");

    view.load().await;

    assert!(view.project().is_none());
    assert_eq!(
        view.error().as_deref(),
        Some("Failed to load project. Please try again.")
    );
    assert!(!view.delete().await);
}

#[tokio::test]
async fn list_view_reports_delete_failure() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Docs");
    let ctx = backend.signed_in().await;
    let view = ProjectListView::new(&ctx);
    view.load().await;
    assert!(view.has_projects());

    backend.fail(Method::DELETE, "projects/p1", StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!view.delete("p1").await);
    assert_eq!(
        view.error().as_deref(),
        Some("Failed to delete project. Please try again.")
    );
    assert!(view.has_projects());
}

#[tokio::test]
async fn list_view_selects_and_opens_a_project() {
    let backend = FakeBackend::start().await;
    backend.add_project("p1", "Docs");
    let ctx = backend.signed_in().await;
    let view = ProjectListView::new(&ctx);
    view.load().await;

    let project = view.projects().remove(0);
    assert_eq!(view.select(project.clone()), Route::ProjectDetail("p1".into()));
    assert_eq!(ctx.projects.selected(), Some(project));
}

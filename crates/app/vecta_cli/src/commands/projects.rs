use vecta_client::AppContext;
use vecta_client::guards::Route;
use vecta_client::views::{CreateProjectView, ProjectDetailView, ProjectListView};
use vecta_core::models::Project;

use super::{enter, failed};
use crate::{Error, Result};
use crate::cli::ProjectCommands;

pub async fn run(ctx: &AppContext, command: ProjectCommands) -> Result<()> {
    match command {
        ProjectCommands::List => list(ctx).await,
        ProjectCommands::Create { name } => create(ctx, &name).await,
        ProjectCommands::Show { project_id } => show(ctx, &project_id).await,
        ProjectCommands::Rename { project_id, name } => rename(ctx, &project_id, &name).await,
        ProjectCommands::Delete { project_id } => delete(ctx, &project_id).await,
    }
}

fn print_project(project: &Project) {
    println!(
        "{}\t{}\t{}",
        project.project_id,
        project.project_name,
        project.created_at.format("%Y-%m-%d %H:%M")
    );
}

async fn list(ctx: &AppContext) -> Result<()> {
    enter(ctx, Route::Projects)?;
    let view = ProjectListView::new(ctx);
    view.load().await;

    if let Some(err) = ctx.projects.projects_state().error() {
        return Err(Error::custom(err));
    }
    if !view.has_projects() {
        println!("No projects yet. Create one with `vecta projects create <name>`.");
    }
    for project in view.projects() {
        print_project(&project);
    }
    Ok(())
}

async fn create(ctx: &AppContext, name: &str) -> Result<()> {
    enter(ctx, Route::CreateProject)?;
    let view = CreateProjectView::new(ctx);
    view.set_name(name);
    let project = view
        .submit()
        .await
        .ok_or_else(|| failed(view.error(), "Failed to create project"))?;
    print_project(&project);
    Ok(())
}

async fn load(ctx: &AppContext, project_id: &str) -> Result<ProjectDetailView> {
    enter(ctx, Route::ProjectDetail(project_id.to_string()))?;
    let view = ProjectDetailView::new(ctx, project_id);
    view.load().await;
    if view.project().is_none() {
        return Err(failed(view.error(), "Project not found"));
    }
    Ok(view)
}

async fn show(ctx: &AppContext, project_id: &str) -> Result<()> {
    let view = load(ctx, project_id).await?;
    if let Some(project) = view.project() {
        print_project(&project);
    }
    Ok(())
}

async fn rename(ctx: &AppContext, project_id: &str, name: &str) -> Result<()> {
    let view = load(ctx, project_id).await?;
    view.start_edit();
    view.set_edit_name(name);
    if !view.save().await {
        return Err(failed(view.error(), "Project name is required"));
    }
    if let Some(project) = view.project() {
        print_project(&project);
    }
    Ok(())
}

async fn delete(ctx: &AppContext, project_id: &str) -> Result<()> {
    let view = load(ctx, project_id).await?;
    if !view.delete().await {
        return Err(failed(view.error(), "Failed to delete project"));
    }
    println!("Deleted project {project_id}");
    Ok(())
}

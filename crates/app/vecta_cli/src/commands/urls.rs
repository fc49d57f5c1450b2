use std::sync::Arc;

use vecta_client::AppContext;
use vecta_client::guards::Route;
use vecta_client::submission::{SubmissionEvent, SubmissionMode, SubmissionState, UrlSubmissionPipeline};
use vecta_client::views::{UrlListView, truncate_url};
use vecta_core::models::{Url, UrlStatus};

use super::{enter, failed};
use crate::cli::UrlCommands;
use crate::{Error, Result};

const URL_COLUMN_WIDTH: usize = 60;

pub async fn run(ctx: &AppContext, command: UrlCommands) -> Result<()> {
    match command {
        UrlCommands::List { project_id, status } => list(ctx, &project_id, status).await,
        UrlCommands::Submit { project_id, url } => submit(ctx, &project_id, &url).await,
        UrlCommands::Batch {
            project_id,
            file,
            urls,
        } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => urls.join("\n"),
            };
            batch(ctx, &project_id, &input).await
        }
        UrlCommands::Show { project_id, url_id } => {
            enter(ctx, Route::ProjectUrls(project_id.clone()))?;
            let url = ctx.urls.get_url(&project_id, &url_id).await?;
            print_details(&url);
            Ok(())
        }
        UrlCommands::Delete { project_id, url_id } => {
            enter(ctx, Route::ProjectUrls(project_id.clone()))?;
            if !UrlListView::new(ctx, project_id).delete_url(&url_id).await {
                return Err(Error::custom(format!("Failed to delete URL {url_id}")));
            }
            println!("Deleted URL {url_id}");
            Ok(())
        }
        UrlCommands::Reprocess { project_id, url_id } => {
            enter(ctx, Route::ProjectUrls(project_id.clone()))?;
            let url = ctx.urls.reprocess_url(&project_id, &url_id).await?;
            print_row(&url);
            Ok(())
        }
        UrlCommands::Stats { project_id } => stats(ctx, &project_id).await,
    }
}

fn print_row(url: &Url) {
    println!(
        "{} {:<9} {}\t{}",
        url.status.icon(),
        url.status.display_name(),
        url.url_id,
        truncate_url(&url.original_url, URL_COLUMN_WIDTH)
    );
}

fn print_details(url: &Url) {
    println!("id:        {}", url.url_id);
    println!("url:       {}", url.original_url);
    println!("status:    {} {}", url.status.icon(), url.status.display_name());
    if let Some(reason) = &url.failure_reason {
        println!("reason:    {reason}");
    }
    println!("submitted: {}", url.submitted_at.format("%Y-%m-%d %H:%M:%S"));
    println!("updated:   {}", url.last_updated_at.format("%Y-%m-%d %H:%M:%S"));
}

async fn open_list(
    ctx: &AppContext,
    project_id: &str,
    status: Option<UrlStatus>,
) -> Result<UrlListView> {
    enter(ctx, Route::ProjectUrls(project_id.to_string()))?;
    let view = UrlListView::new(ctx, project_id);
    view.open_filtered(status).await;
    Ok(view)
}

async fn list(ctx: &AppContext, project_id: &str, status: Option<UrlStatus>) -> Result<()> {
    let view = open_list(ctx, project_id, status).await?;
    if let Some(err) = view.error() {
        return Err(Error::custom(err));
    }

    if !view.has_urls() {
        println!("No URLs ({}).", vecta_client::views::filter_label(status));
    }
    for url in view.urls() {
        print_row(&url);
    }
    Ok(())
}

async fn stats(ctx: &AppContext, project_id: &str) -> Result<()> {
    let view = open_list(ctx, project_id, None).await?;
    if let Some(err) = view.error() {
        return Err(Error::custom(err));
    }
    let counts = view.count_by_status();
    for status in UrlStatus::ALL {
        println!(
            "{} {:<9} {}",
            status.icon(),
            status.display_name(),
            counts.get(&status).copied().unwrap_or(0)
        );
    }
    println!("  Total     {}", view.total_count());
    Ok(())
}

fn pipeline(ctx: &AppContext, project_id: &str) -> Result<UrlSubmissionPipeline> {
    enter(ctx, Route::ProjectUrls(project_id.to_string()))?;
    Ok(UrlSubmissionPipeline::new(project_id, Arc::clone(&ctx.urls)))
}

/// Result of a finished submission. Validation failures leave the form
/// idle and only surface as an error event.
fn outcome(
    state: SubmissionState,
    events: &mut tokio::sync::broadcast::Receiver<SubmissionEvent>,
) -> Result<String> {
    match state {
        SubmissionState::Success(message) => Ok(message),
        SubmissionState::Error(message) => Err(Error::custom(message)),
        SubmissionState::Idle | SubmissionState::Submitting => {
            let mut message = None;
            while let Ok(event) = events.try_recv() {
                if let SubmissionEvent::Error { message: m, .. } = event {
                    message = Some(m);
                }
            }
            Err(failed(message, "Nothing submitted"))
        }
    }
}

async fn submit(ctx: &AppContext, project_id: &str, url: &str) -> Result<()> {
    let pipeline = pipeline(ctx, project_id)?;
    let mut events = pipeline.subscribe_events();
    pipeline.set_single_url(url);
    pipeline.submit_single().await;

    let state = pipeline.single_state();
    if matches!(state, SubmissionState::Error(_)) {
        while let Ok(event) = events.try_recv() {
            if let SubmissionEvent::Error {
                existing_url: Some(existing),
                ..
            } = event
            {
                log::info!("existing URL {} in project {}", existing.url_id, existing.project_id);
            }
        }
    }
    let message = outcome(state, &mut events)?;
    println!("{message}");
    Ok(())
}

async fn batch(ctx: &AppContext, project_id: &str, input: &str) -> Result<()> {
    let pipeline = pipeline(ctx, project_id)?;
    pipeline.switch_mode(SubmissionMode::Batch);
    let mut events = pipeline.subscribe_events();
    pipeline.set_batch_urls(input);
    pipeline.submit_batch().await;

    let message = outcome(pipeline.batch_state(), &mut events)?;
    println!("{message}");
    while let Ok(event) = events.try_recv() {
        if let SubmissionEvent::BatchSubmitted(resp) = event {
            for url in &resp.submitted_urls {
                print_row(url);
            }
            for dup in &resp.duplicate_urls {
                println!("duplicate of {}", dup.url_id);
            }
        }
    }
    Ok(())
}

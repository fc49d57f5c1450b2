//! Command handlers. Each command drives the view model of the screen it
//! stands for, after that screen's route guard.

mod auth;
mod projects;
mod urls;

use vecta_client::AppContext;
use vecta_client::guards::Route;

use crate::cli::Commands;
use crate::{Error, Result};

pub async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Version => Ok(()),
        Commands::Login { email, password } => auth::login(ctx, &email, &password).await,
        Commands::Register {
            email,
            password,
            confirm_password,
        } => {
            let confirmation = confirm_password.unwrap_or_else(|| password.clone());
            auth::register(ctx, &email, &password, &confirmation).await
        }
        Commands::Logout => auth::logout(ctx),
        Commands::Whoami => auth::whoami(ctx),
        Commands::Oauth { command } => auth::oauth(ctx, command).await,
        Commands::Projects { command } => projects::run(ctx, command).await,
        Commands::Urls { command } => urls::run(ctx, command).await,
    }
}

/// Navigate to `route`; a guard redirect means the command is not allowed
/// in the current session state.
fn enter(ctx: &AppContext, route: Route) -> Result<()> {
    let reached = ctx.navigator.navigate(route.clone());
    if reached == route {
        return Ok(());
    }
    match reached {
        Route::Login => Err(Error::custom("Not signed in. Run `vecta login` first.")),
        _ => {
            let who = ctx
                .session
                .user()
                .map(|u| u.email)
                .unwrap_or_else(|| "another user".into());
            Err(Error::custom(format!(
                "Already signed in as {who}. Run `vecta logout` first."
            )))
        }
    }
}

/// Turn a failed view action into a command error.
fn failed(message: Option<String>, fallback: &str) -> Error {
    Error::custom(message.unwrap_or_else(|| fallback.to_string()))
}

use vecta_client::AppContext;
use vecta_client::guards::Route;
use vecta_client::oauth::CallbackParams;
use vecta_client::views::{DashboardView, LoginView, OAuthCallbackView, RegisterView};

use super::{enter, failed};
use crate::cli::OAuthCommands;
use crate::{Error, Result};

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    enter(ctx, Route::Login)?;
    let view = LoginView::new(ctx);
    view.set_email(email);
    view.set_password(password);

    if !view.submit().await {
        let inline = view
            .email_error()
            .or_else(|| view.password_error())
            .map(|e| e.to_string());
        return Err(failed(inline.or_else(|| view.error()), "Login failed"));
    }
    println!("Signed in as {email}");
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    email: &str,
    password: &str,
    confirmation: &str,
) -> Result<()> {
    enter(ctx, Route::Register)?;
    let view = RegisterView::new(ctx);
    view.set_email(email);
    view.set_password(password);
    view.set_confirm_password(confirmation);

    if !view.submit().await {
        let inline = view
            .email_error()
            .or_else(|| view.password_error())
            .or_else(|| view.confirm_password_error())
            .or_else(|| view.mismatch_error())
            .map(|e| e.to_string());
        return Err(failed(inline.or_else(|| view.error()), "Registration failed"));
    }
    println!("Account created, signed in as {email}");
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    DashboardView::new(ctx).logout();
    println!("Signed out");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    enter(ctx, Route::Dashboard)?;
    let user = ctx
        .session
        .user()
        .ok_or_else(|| Error::custom("Not signed in"))?;
    match &user.name {
        Some(name) => println!("{} <{}> ({})", name, user.email, user.id),
        None if user.email.is_empty() => println!("{}", user.id),
        None => println!("{} ({})", user.email, user.id),
    }
    Ok(())
}

pub async fn oauth(ctx: &AppContext, command: OAuthCommands) -> Result<()> {
    match command {
        OAuthCommands::Url { provider } => {
            enter(ctx, Route::Login)?;
            let view = LoginView::new(ctx);
            let url = view
                .social_login_url(provider)
                .ok_or_else(|| failed(view.error(), "Cannot start OAuth flow"))?;
            println!("{url}");
        }
        OAuthCommands::Callback { fragment } => {
            let params = CallbackParams::parse(&fragment);
            let provider = params.state.clone().unwrap_or_default();
            enter(ctx, Route::OAuthCallback(provider))?;

            let view = OAuthCallbackView::new(ctx);
            let signed_in = view
                .handle(
                    params.state.as_deref(),
                    params.access_token.as_deref(),
                    params.error.as_deref(),
                )
                .await;
            if !signed_in {
                return Err(failed(view.error(), "OAuth login failed"));
            }
            let who = ctx.session.user().map(|u| u.id).unwrap_or_default();
            println!("Signed in as {who}");
        }
    }
    Ok(())
}

// ABOUTME: Account commands: sign-in, sign-up, sign-out, password reset, rename
// ABOUTME: Delegates to the session manager, which persists the session between runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use cook_ai::context::AppContext;
use cook_ai::errors::{AppError, AppResult};
use cook_ai::models::UserIdentity;

fn greet(identity: &UserIdentity) {
    let name = identity
        .attribution_name()
        .unwrap_or_else(|| identity.uid.clone());
    println!("Signed in as {name}.");
}

/// Sign in with a password or a Google ID token
pub async fn login(
    ctx: &mut AppContext,
    email: Option<String>,
    password: Option<String>,
    google_id_token: Option<String>,
) -> AppResult<()> {
    let identity = match (google_id_token, email, password) {
        (Some(token), _, _) => ctx.session.sign_in_with_google(&token).await?,
        (None, Some(email), Some(password)) => ctx.session.sign_in(&email, &password).await?,
        _ => {
            return Err(AppError::invalid_input(
                "Please enter your e-mail and password.",
            ))
        }
    };
    greet(identity);
    Ok(())
}

/// Create an account
pub async fn signup(ctx: &mut AppContext, email: &str, password: &str) -> AppResult<()> {
    let identity = ctx.session.sign_up(email, password).await?;
    greet(identity);
    Ok(())
}

/// Sign out
pub async fn logout(ctx: &mut AppContext) -> AppResult<()> {
    ctx.session.sign_out().await?;
    println!("Signed out.");
    Ok(())
}

/// Send a password-reset e-mail
pub async fn reset_password(ctx: &AppContext, email: &str) -> AppResult<()> {
    ctx.session.send_password_reset(email).await?;
    println!("Password reset e-mail sent. Please check your inbox.");
    Ok(())
}

/// Change the display name
pub async fn rename(ctx: &mut AppContext, name: &str) -> AppResult<()> {
    let identity = ctx.session.update_display_name(name).await?;
    println!(
        "Display name changed to {}.",
        identity.display_name.as_deref().unwrap_or(name)
    );
    Ok(())
}

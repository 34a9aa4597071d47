//! Account commands.

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use shophub_core::{Credentials, Email, Registration};
use shophub_storefront::session::{Access, GuardDecision};
use shophub_storefront::{AppError, Result};

use crate::context::Context;
use crate::output;

pub async fn login(ctx: &Context, email: &str, password: &SecretString) -> Result<()> {
    let credentials = Credentials {
        email: parse_email(email)?,
        password: password.expose_secret().to_string(),
    };
    let session = ctx.client.login(&credentials).await?;
    ctx.session.sign_in(&session);
    info!(user_id = %session.user.id, "signed in");
    output::message(&format!("Signed in as {}", session.user.name));
    Ok(())
}

pub async fn register(
    ctx: &Context,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    let registration = Registration {
        name: name.trim().to_string(),
        email: parse_email(email)?,
        password: password.expose_secret().to_string(),
    };
    let session = ctx.client.register(&registration).await?;
    ctx.session.sign_in(&session);
    info!(user_id = %session.user.id, "account created");
    output::message(&format!("Welcome, {}", session.user.name));
    Ok(())
}

pub fn logout(ctx: &Context) {
    ctx.session.sign_out();
    output::message("Signed out");
}

/// Show the stored profile, refreshed from the API when possible.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let GuardDecision::Allow(stored) = ctx.session.guard(Access::Authenticated) else {
        output::message("Not signed in");
        return Ok(());
    };

    match ctx.client.me().await {
        Ok(user) => {
            ctx.session.set_user(&user);
            output::user(&user);
        }
        Err(e) if e.is_unauthorized() => {
            ctx.session.sign_out();
            return Err(AppError::Unauthorized(
                "Session expired, please sign in again".to_string(),
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not refresh profile");
            output::user(&stored);
        }
    }
    Ok(())
}

pub async fn my_orders(ctx: &Context) -> Result<()> {
    if !ctx.session.guard(Access::Authenticated).is_allowed() {
        return Err(AppError::Unauthorized(
            "Please sign in to continue".to_string(),
        ));
    }
    let orders = ctx.client.my_orders().await?;
    output::orders(&orders.data);
    Ok(())
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

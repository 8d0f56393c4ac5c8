//! Auth commands - log in, log out, show the current operator

use anyhow::{Context as _, Result};
use colored::*;
use dialoguer::{Input, Password};
use fispanel_client::ClientError;
use fispanel_core::{LoginForm, Notice};

use crate::context::Context;
use crate::display;

pub async fn login(ctx: &mut Context, username: Option<String>, password: Option<String>) -> Result<()> {
    display::section("Login");

    let username = match username {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("  Username").interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("  Password").interact()?,
    };

    let request = LoginForm { username, password }.into_request()?;
    let result = display::with_spinner("Signing in...", ctx.api.login(&request)).await;

    let credentials = match result {
        Ok(credentials) => credentials,
        Err(ClientError::LoginRejected(message)) => anyhow::bail!(message),
        Err(e) => {
            return Err(e).context("Connection failed. Is the API reachable?");
        }
    };

    ctx.store
        .save(&credentials)
        .with_context(|| format!("Cannot write {}", ctx.store.path().display()))?;

    ctx.sign_in(credentials);
    ctx.notify(Notice::success(format!("Logged in as {}", request.username)));
    display::flush(ctx);
    display::kv("API", ctx.api.base_url());
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.store
        .clear()
        .with_context(|| format!("Cannot remove {}", ctx.store.path().display()))?;
    ctx.sign_out();
    display::success("Logged out");
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let Some(auth) = ctx.state.auth() else {
        return Ok(());
    };

    display::section("Operator");
    display::labeled("Username", &auth.user.username);
    for (key, value) in &auth.user.extra {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        display::kv(key, &text);
    }
    println!();
    println!("  {} {}", "API:".bright_white(), ctx.api.base_url().bright_cyan());
    println!(
        "  {} {}",
        "Credentials:".bright_white(),
        ctx.store.path().display().to_string().bright_black()
    );
    Ok(())
}

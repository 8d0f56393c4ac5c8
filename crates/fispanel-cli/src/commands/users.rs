//! User (device) commands

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use fispanel_core::format::Tone;
use fispanel_core::views::{users_table, UserDetailView};
use fispanel_core::{Notice, Page};
use fispanel_types::UserId;

use crate::context::Context;
use crate::display::{self, Cell};

fn online_tone(online: bool) -> Tone {
    if online {
        Tone::Success
    } else {
        Tone::Secondary
    }
}

pub async fn list(ctx: &mut Context) -> Result<()> {
    ctx.enter(Page::Users)?;

    let users = display::with_spinner("Loading users...", ctx.api.users())
        .await
        .context("Could not load users")?;

    display::section(&format!("Users ({})", users.len()));
    if users.is_empty() {
        display::empty("No devices registered");
        return Ok(());
    }
    let rows = users_table(&users)
        .into_iter()
        .map(|u| {
            vec![
                Cell::from(u.id.to_string()),
                Cell::from(u.pc_name),
                Cell::from(u.license_key),
                Cell::badge(u.online_label, online_tone(u.online)),
                Cell::from(u.receipts.to_string()),
                Cell::from(u.amount),
                Cell::from(u.last_seen),
            ]
        })
        .collect();
    display::table(
        &["ID", "PC", "License", "Status", "Receipts", "Amount", "Last seen"],
        rows,
    );
    Ok(())
}

pub async fn show(ctx: &mut Context, id: UserId) -> Result<()> {
    ctx.enter(Page::Users)?;

    let details = display::with_spinner("Loading user...", ctx.api.user_details(id))
        .await
        .context("Could not load user details")?;
    let view = UserDetailView::build(&details);

    display::section(&format!("User #{} - {}", view.id, view.pc_name));
    for field in &view.info {
        display::labeled(field.label, &field.value);
    }

    display::section("Sessions (last 10)");
    if view.sessions.is_empty() {
        display::empty("No sessions");
    } else {
        let rows = view
            .sessions
            .iter()
            .map(|s| {
                vec![
                    Cell::from(s.started.clone()),
                    match &s.ended {
                        Some(ended) => Cell::from(ended.clone()),
                        None => Cell::badge("Active", Tone::Success),
                    },
                    Cell::from(s.receipts.to_string()),
                    Cell::from(s.amount.clone()),
                    Cell::badge(s.status.clone(), online_tone(s.active)),
                ]
            })
            .collect();
        display::table(&["Started", "Ended", "Receipts", "Amount", "Status"], rows);
    }

    display::section("Companies");
    let rows = view
        .companies
        .iter()
        .map(|c| {
            vec![
                Cell::from(c.name.clone()),
                Cell::from(c.receipts.to_string()),
                Cell::from(c.amount.clone()),
            ]
        })
        .collect();
    display::table(&["Company", "Receipts", "Amount"], rows);

    display::section("Recent activity");
    if view.activities.is_empty() {
        display::empty("No activity");
    }
    for a in &view.activities {
        println!("  {}  {}  {}", a.at, display::toned(&a.label, a.tone), a.details);
    }
    Ok(())
}

pub async fn delete(ctx: &mut Context, id: UserId, assume_yes: bool) -> Result<()> {
    ctx.enter(Page::Users)?;
    if !assume_yes
        && !Confirm::new()
            .with_prompt(format!("Delete user #{id}? This cannot be undone"))
            .default(false)
            .interact()?
    {
        display::info("Cancelled");
        return Ok(());
    }

    display::with_spinner("Deleting user...", ctx.api.delete_user(id))
        .await
        .context("User could not be deleted")?;
    ctx.notify(Notice::success("User deleted"));
    display::flush(ctx);

    list(ctx).await
}

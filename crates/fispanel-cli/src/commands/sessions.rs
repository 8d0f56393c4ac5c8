//! Session commands - filtered list, drill-down and export

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use colored::*;
use fispanel_core::csv::{convert_to_csv, session_file_name};
use fispanel_core::format::Tone;
use fispanel_core::sessions::{
    license_options, session_list, user_options, FilterOption, NO_ACTIVITY, NO_RECEIPTS,
    NO_SESSIONS,
};
use fispanel_core::{Page, SessionDetailView, SessionFilter};
use fispanel_types::SessionId;

use crate::context::Context;
use crate::display::{self, Cell};

fn selected_label(options: &[FilterOption]) -> Option<&str> {
    options.iter().find(|o| o.selected).map(|o| o.label.as_str())
}

pub async fn list(ctx: &mut Context, filter: SessionFilter, select: Option<SessionId>) -> Result<()> {
    ctx.enter(Page::Sessions)?;

    let (licenses, users, sessions) = display::with_spinner("Loading sessions...", async {
        let licenses = ctx.api.licenses().await?;
        let users = ctx.api.users().await?;
        let sessions = ctx.api.sessions().await?;
        Ok::<_, fispanel_client::ClientError>((licenses, users, sessions))
    })
    .await
    .context("Could not load sessions")?;

    let license_choices = license_options(&licenses, filter.license_id);
    let user_choices = user_options(&users, filter.user_id);

    display::section("Sessions");
    display::labeled(
        "License",
        selected_label(&license_choices).unwrap_or("All licenses"),
    );
    display::labeled("User", selected_label(&user_choices).unwrap_or("All users"));
    if filter.license_id.is_some() && selected_label(&license_choices).is_none() {
        display::warning("No license with that id");
    }
    if filter.user_id.is_some() && selected_label(&user_choices).is_none() {
        display::warning("No user with that id");
    }
    println!();

    ctx.cache_sessions(sessions);
    ctx.select_session(select);

    let visible = ctx.state.visible_sessions(&filter);
    let items = session_list(&visible, ctx.state.current_session_id());
    if items.is_empty() {
        display::empty(NO_SESSIONS);
    } else {
        let rows = items
            .into_iter()
            .map(|s| {
                vec![
                    Cell::from(if s.selected { "▶" } else { "" }),
                    Cell::from(s.id.to_string()),
                    Cell::from(s.pc_name),
                    Cell::badge(s.status, if s.active { Tone::Success } else { Tone::Secondary }),
                    Cell::from(s.started),
                    Cell::from(s.receipts.to_string()),
                    Cell::from(s.amount),
                ]
            })
            .collect();
        display::table(&["", "ID", "PC", "Status", "Started", "Receipts", "Amount"], rows);
    }

    match select {
        Some(id) => show(ctx, id).await,
        None => Ok(()),
    }
}

pub async fn show(ctx: &mut Context, id: SessionId) -> Result<()> {
    ctx.enter(Page::Sessions)?;
    ctx.select_session(Some(id));

    let details = display::with_spinner("Loading session...", ctx.api.session_details(id))
        .await
        .context("Could not load session details")?;
    let view = SessionDetailView::build(&details);

    let summary = &view.summary;
    display::section(&format!("Session #{}", summary.id));
    display::labeled("PC", &summary.pc_name);
    display::labeled("Started", &summary.started);
    match &summary.ended {
        Some(ended) => display::labeled("Ended", ended),
        None => println!("  {}: {}", "Ended".bright_white(), "Ongoing".bright_green()),
    }
    display::labeled("Receipts", &summary.total_receipts.to_string());
    display::labeled("Amount", &summary.total_amount);

    display::section("Companies");
    if view.companies.is_empty() {
        display::empty(NO_RECEIPTS);
    }
    for company in &view.companies {
        println!(
            "  {}  {} receipts  {}",
            company.name.bright_blue().bold(),
            company.receipt_count,
            company.total_amount.bright_green()
        );
        display::kv("Receipt no", &company.receipt_range);
        for r in &company.receipts {
            println!(
                "        {:<12} {:>16}   base {:>16}   VAT %{} {:>14}",
                r.receipt_no,
                r.amount,
                r.tax_base,
                r.vat_rate,
                r.vat_amount
            );
        }
    }

    display::section("Activities");
    if view.activities.is_empty() {
        display::empty(NO_ACTIVITY);
    }
    for a in &view.activities {
        println!("  {}  {}  {}", a.time.bright_black(), display::toned(&a.label, a.tone), a.details);
    }

    println!();
    display::info(&format!("Export with `fispanel sessions export {}`", summary.id));
    Ok(())
}

pub async fn export(ctx: &mut Context, id: SessionId, output: Option<PathBuf>) -> Result<()> {
    ctx.enter(Page::Sessions)?;

    let export = display::with_spinner("Exporting session...", ctx.api.session_export(id))
        .await
        .context("Session export failed")?;
    let rows = export.rows();

    let path = output.unwrap_or_else(|| PathBuf::from(session_file_name(id)));
    std::fs::write(&path, convert_to_csv(&rows))
        .with_context(|| format!("Cannot write {}", path.display()))?;

    display::success(&format!("{} receipts exported", rows.len()));
    display::kv("File", &path.display().to_string());
    Ok(())
}

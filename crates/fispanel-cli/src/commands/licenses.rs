//! License commands - list, inspect, create, delete, extend, suspend

use anyhow::{Context as _, Result};
use colored::*;
use dialoguer::Confirm;
use fispanel_core::format::{format_currency, online_label, Tone};
use fispanel_core::views::{licenses_table, LicenseDetailView};
use fispanel_core::{CreateLicenseForm, ExtendLicenseForm, Notice, Page};
use fispanel_types::{LicenseId, LicenseStatus};

use crate::context::Context;
use crate::display::{self, Cell};

pub async fn list(ctx: &mut Context) -> Result<()> {
    ctx.enter(Page::Licenses)?;

    let licenses = display::with_spinner("Loading licenses...", ctx.api.licenses())
        .await
        .context("Could not load licenses")?;

    display::section(&format!("Licenses ({})", licenses.len()));
    if licenses.is_empty() {
        display::empty("No licenses yet");
        return Ok(());
    }
    let rows = licenses_table(&licenses)
        .into_iter()
        .map(|r| {
            vec![
                Cell::from(r.id.to_string()),
                Cell::from(r.key),
                Cell::from(r.company),
                Cell::badge(r.status, r.tone),
                Cell::from(r.days_remaining),
                Cell::from(r.devices),
                Cell::from(r.created),
            ]
        })
        .collect();
    display::table(
        &["ID", "Key", "Company", "Status", "Remaining", "Devices", "Created"],
        rows,
    );
    Ok(())
}

pub async fn show(ctx: &mut Context, id: LicenseId) -> Result<()> {
    ctx.enter(Page::Licenses)?;
    ctx.select_license(id);

    let details = display::with_spinner("Loading license...", ctx.api.license_details(id))
        .await
        .context("Could not load license details")?;
    let view = LicenseDetailView::build(&details);

    display::section(&format!("License #{}", view.id));
    for field in &view.info {
        if field.label == "Status" {
            println!("  {}: {}", field.label.bright_white(), display::toned(&field.value, view.tone));
        } else {
            display::labeled(field.label, &field.value);
        }
    }

    display::section(&format!("Users ({})", view.users.len()));
    if view.users.is_empty() {
        display::empty("No devices registered");
    } else {
        let rows = view
            .users
            .iter()
            .map(|u| {
                vec![
                    Cell::from(u.pc_name.clone()),
                    Cell::badge(
                        online_label(u.online),
                        if u.online { Tone::Success } else { Tone::Secondary },
                    ),
                    Cell::from(u.receipts.to_string()),
                    Cell::from(u.amount.clone()),
                    Cell::from(u.last_seen.clone()),
                ]
            })
            .collect();
        display::table(&["PC", "Status", "Receipts", "Amount", "Last seen"], rows);
    }

    display::section(&format!("Companies ({})", view.companies.len()));
    let rows = view
        .companies
        .iter()
        .map(|c| {
            vec![
                Cell::from(c.name.clone()),
                Cell::from(c.receipts.to_string()),
                Cell::from(c.amount.clone()),
                Cell::from(c.first_receipt_at.clone()),
                Cell::from(c.last_receipt_at.clone()),
            ]
        })
        .collect();
    display::table(&["Company", "Receipts", "Amount", "First", "Last"], rows);

    display::section("Last 30 days");
    let max = view.daily.iter().map(|p| p.amount).fold(0.0, f64::max);
    for point in &view.daily {
        println!(
            "  {}  {:<30}  {}",
            point.label.bright_black(),
            display::bar(point.amount, max, 30).bright_blue(),
            format_currency(point.amount).bright_cyan()
        );
    }

    display::section("Recent activity");
    if view.activities.is_empty() {
        display::empty("No activity");
    }
    for a in &view.activities {
        println!("  {}  {}  {}", a.at.bright_black(), display::toned(&a.label, a.tone), a.details);
        let extras: Vec<String> = [
            a.pc_name.as_ref().map(|p| format!("PC: {p}")),
            a.company.as_ref().map(|c| format!("Company: {c}")),
            a.amount.as_ref().map(|m| format!("Amount: {m}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !extras.is_empty() {
            println!("      {}", extras.join("  ").bright_black());
        }
    }
    Ok(())
}

pub struct CreateArgs {
    pub company_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub days: u32,
    pub max_devices: u32,
    pub notes: Option<String>,
}

pub async fn create(ctx: &mut Context, args: CreateArgs) -> Result<()> {
    ctx.enter(Page::Licenses)?;

    let body = CreateLicenseForm {
        company_name: args.company_name,
        contact_email: args.contact_email,
        contact_phone: args.contact_phone,
        days: args.days,
        max_devices: args.max_devices,
        notes: args.notes,
    }
    .into_request()?;

    let key = display::with_spinner("Creating license...", ctx.api.create_license(&body))
        .await
        .context("License could not be created")?;

    display::success("License created");
    display::labeled("License key", &key);
    display::info("Send this key to the customer");

    list(ctx).await
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

pub async fn delete(ctx: &mut Context, id: LicenseId, assume_yes: bool) -> Result<()> {
    ctx.enter(Page::Licenses)?;
    if !confirm(&format!("Delete license #{id}? This cannot be undone"), assume_yes)? {
        display::info("Cancelled");
        return Ok(());
    }

    display::with_spinner("Deleting license...", ctx.api.delete_license(id))
        .await
        .context("License could not be deleted")?;
    ctx.notify(Notice::success("License deleted"));
    display::flush(ctx);

    list(ctx).await
}

pub async fn extend(ctx: &mut Context, id: LicenseId, days: u32) -> Result<()> {
    ctx.enter(Page::Licenses)?;
    let update = ExtendLicenseForm { days }.into_update()?;

    display::with_spinner("Extending license...", ctx.api.update_license(id, &update))
        .await
        .context("License could not be extended")?;
    ctx.notify(Notice::success(format!("{days} days added to license #{id}")));
    display::flush(ctx);

    show(ctx, id).await
}

pub async fn suspend(ctx: &mut Context, id: LicenseId, assume_yes: bool) -> Result<()> {
    ctx.enter(Page::Licenses)?;
    if !confirm(&format!("Suspend license #{id}?"), assume_yes)? {
        display::info("Cancelled");
        return Ok(());
    }

    display::with_spinner(
        "Suspending license...",
        ctx.api.set_license_status(id, LicenseStatus::Suspended),
    )
    .await
    .context("License could not be suspended")?;
    ctx.notify(Notice::success("License suspended"));
    display::flush(ctx);

    show(ctx, id).await
}

//! Dashboard command - stat cards and the last seven days

use anyhow::{Context as _, Result};
use colored::*;
use fispanel_core::format::format_currency_short;
use fispanel_core::{DashboardView, Page};

use crate::context::Context;
use crate::display;

const BAR_WIDTH: usize = 30;

pub async fn show(ctx: &mut Context) -> Result<()> {
    ctx.enter(Page::Dashboard)?;

    let snapshot = display::with_spinner("Loading dashboard...", ctx.api.dashboard())
        .await
        .context("Could not load the dashboard")?;
    if snapshot.today.is_none() {
        display::warning("Today's summary is unavailable, using daily statistics");
    }
    let view = DashboardView::build(&snapshot);

    display::section("Dashboard");
    for card in &view.cards {
        let value = if card.scale > 1.0 {
            card.value.bright_yellow().bold()
        } else {
            card.value.bright_cyan()
        };
        println!("  {:<22} {}", card.title.bright_white(), value);
    }

    display::section("Last 7 days");
    if view.chart.is_empty() {
        display::empty("No statistics yet");
        return Ok(());
    }
    let max = view.chart.iter().map(|p| p.amount).fold(0.0, f64::max);
    for point in &view.chart {
        println!(
            "  {}  {:>5}  {:<width$}  {}",
            point.label.bright_black(),
            point.receipts,
            display::bar(point.amount, max, BAR_WIDTH).bright_magenta(),
            format_currency_short(point.amount).bright_cyan(),
            width = BAR_WIDTH
        );
    }
    Ok(())
}

//! Receipt commands - browse and export a date range

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use fispanel_core::csv::{convert_to_csv, receipts_file_name};
use fispanel_core::views::{ReceiptsView, RECEIPT_COLUMNS};
use fispanel_core::{DateRangeForm, Page};

use crate::context::Context;
use crate::display::{self, Cell};

pub async fn list(ctx: &mut Context, range: DateRangeForm) -> Result<()> {
    ctx.enter(Page::Receipts)?;
    let range = range.resolve()?;

    let rows = display::with_spinner(
        "Loading receipts...",
        ctx.api.export_receipts(&range.start_date, &range.end_date),
    )
    .await
    .context("Could not load receipts")?;
    let view = ReceiptsView::build(&rows, &range.start_date, &range.end_date);

    display::section(&format!(
        "Receipts {} .. {} ({} of {})",
        view.start_date,
        view.end_date,
        view.rows.len(),
        view.total
    ));
    if view.rows.is_empty() {
        display::empty("No receipts in this range");
        return Ok(());
    }
    let table_rows = view
        .rows
        .into_iter()
        .map(|r| r.cells.into_iter().map(Cell::from).collect())
        .collect();
    display::table(&RECEIPT_COLUMNS, table_rows);
    Ok(())
}

pub async fn export(ctx: &mut Context, range: DateRangeForm, output: Option<PathBuf>) -> Result<()> {
    ctx.enter(Page::Receipts)?;
    let range = range.resolve()?;

    let rows = display::with_spinner(
        "Exporting receipts...",
        ctx.api.export_receipts(&range.start_date, &range.end_date),
    )
    .await
    .context("Export failed")?;

    let path = output.unwrap_or_else(|| PathBuf::from(receipts_file_name(&range.start_date, &range.end_date)));
    std::fs::write(&path, convert_to_csv(&rows))
        .with_context(|| format!("Cannot write {}", path.display()))?;

    display::success(&format!("{} receipts exported", rows.len()));
    display::kv("File", &path.display().to_string());
    Ok(())
}

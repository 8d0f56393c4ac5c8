//! Activity log command

use anyhow::{Context as _, Result};
use fispanel_core::views::{activities_table, ACTIVITY_PAGE_LIMIT, NO_ACTIVITY_YET};
use fispanel_core::Page;

use crate::context::Context;
use crate::display::{self, Cell};

pub async fn list(ctx: &mut Context) -> Result<()> {
    ctx.enter(Page::Activities)?;

    let activities = display::with_spinner(
        "Loading activities...",
        ctx.api.activities(ACTIVITY_PAGE_LIMIT),
    )
    .await
    .context("Could not load activities")?;

    display::section("Activities");
    if activities.is_empty() {
        display::empty(NO_ACTIVITY_YET);
        return Ok(());
    }
    let rows = activities_table(&activities)
        .into_iter()
        .map(|a| {
            vec![
                Cell::from(a.at),
                Cell::badge(a.label, a.tone),
                Cell::from(a.details),
                Cell::from(a.company),
                Cell::from(a.receipt_no),
                Cell::from(a.amount),
            ]
        })
        .collect();
    display::table(
        &["Time", "Action", "Details", "Company", "Receipt", "Amount"],
        rows,
    );
    Ok(())
}

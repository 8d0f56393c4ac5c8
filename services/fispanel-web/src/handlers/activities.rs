//! Activity log

use axum::response::Html;
use fispanel_core::views::{activities_table, ACTIVITY_PAGE_LIMIT, NO_ACTIVITY_YET};
use fispanel_core::Page;

use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, badge, escape};

pub async fn list(console: Console) -> WebResult<Html<String>> {
    console.enter(Page::Activities);

    let body = match console.api.activities(ACTIVITY_PAGE_LIMIT).await {
        Ok(activities) => {
            let rows = activities_table(&activities)
                .into_iter()
                .map(|a| {
                    vec![
                        escape(&a.at),
                        badge(&a.label, a.tone),
                        escape(&a.details),
                        escape(&a.company),
                        escape(&a.receipt_no),
                        escape(&a.amount),
                    ]
                })
                .collect();
            render::table(
                &["Time", "Action", "Details", "Company", "Receipt no", "Amount"],
                rows,
                NO_ACTIVITY_YET,
            )
        }
        Err(e) => {
            console.fail(e, "Could not load activities")?;
            String::new()
        }
    };

    Ok(console.page(Page::Activities, render::panel("Last 100 activities", &body)))
}

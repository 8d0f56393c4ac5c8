//! Receipt browser and CSV export

use axum::{
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use fispanel_core::csv::{convert_to_csv, receipts_file_name};
use fispanel_core::views::{ReceiptsView, RECEIPT_COLUMNS};
use fispanel_core::{DateRange, DateRangeForm, Notice, Page};

use super::csv_attachment;
use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, escape};

fn range_form(range: &DateRange) -> String {
    format!(
        r##"<form method="get" action="/receipts" class="form-grid">
    <label>From<input name="start_date" type="date" value="{start}"></label>
    <label>To<input name="end_date" type="date" value="{end}"></label>
    <button class="btn" type="submit">Filter</button>
    <button class="btn success" type="submit" formaction="/receipts/export">Export CSV</button>
</form>"##,
        start = escape(&range.start_date),
        end = escape(&range.end_date),
    )
}

pub async fn list(console: Console, Query(form): Query<DateRangeForm>) -> WebResult<Html<String>> {
    console.enter(Page::Receipts);

    let range = match form.resolve() {
        Ok(range) => range,
        Err(e) => {
            console.notify(Notice::error(e.to_string()));
            DateRange::default()
        }
    };

    let table = match console.api.export_receipts(&range.start_date, &range.end_date).await {
        Ok(rows) => {
            let view = ReceiptsView::build(&rows, &range.start_date, &range.end_date);
            let caption = format!(
                r#"<p class="empty">Showing {} of {} receipts</p>"#,
                view.rows.len(),
                view.total
            );
            let rows = view
                .rows
                .into_iter()
                .map(|r| r.cells.iter().map(|c| escape(c)).collect())
                .collect();
            format!(
                "{caption}{}",
                render::table(&RECEIPT_COLUMNS, rows, "No receipts in this range")
            )
        }
        Err(e) => {
            console.fail(e, "Could not load receipts")?;
            String::new()
        }
    };

    let body = format!(
        "{}{}",
        render::panel("Date range", &range_form(&range)),
        render::panel("Receipts", &table)
    );
    Ok(console.page(Page::Receipts, body))
}

pub async fn export(console: Console, Query(form): Query<DateRangeForm>) -> WebResult<Response> {
    console.enter(Page::Receipts);

    let range = match form.resolve() {
        Ok(range) => range,
        Err(e) => {
            console.notify(Notice::error(e.to_string()));
            return Ok(Redirect::to("/receipts").into_response());
        }
    };

    match console.api.export_receipts(&range.start_date, &range.end_date).await {
        Ok(rows) => {
            tracing::info!(rows = rows.len(), start = %range.start_date, end = %range.end_date, "receipts exported");
            Ok(csv_attachment(
                &receipts_file_name(&range.start_date, &range.end_date),
                convert_to_csv(&rows),
            ))
        }
        Err(e) => {
            console.fail(e, "Export failed")?;
            Ok(Redirect::to("/receipts").into_response())
        }
    }
}

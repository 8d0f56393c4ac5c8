//! Sessions: filters, cached list and drill-down panel
//!
//! The list is fetched when the operator arrives from another page (or
//! through the navigation link) and reused while they filter and select
//! within the page.

use axum::{
    extract::{Path, Query, RawQuery},
    response::{Html, IntoResponse, Redirect, Response},
};
use fispanel_core::csv::{convert_to_csv, session_file_name};
use fispanel_core::format::Tone;
use fispanel_core::sessions::{
    license_options, session_list, user_options, FilterOption, SessionListItem, NO_ACTIVITY,
    NO_RECEIPTS, NO_SESSIONS,
};
use fispanel_core::{Page, SessionDetailView, SessionFilter};
use fispanel_types::{License, LicenseId, SessionId, User, UserId};
use serde::{Deserialize, Deserializer};

use super::csv_attachment;
use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, badge, escape};

/// `?license_id&user_id&selected`; empty values mean "all"
#[derive(Debug, Default, Deserialize)]
pub struct SessionsQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub license_id: Option<LicenseId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "optional_id")]
    pub selected: Option<SessionId>,
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl SessionsQuery {
    fn filter(&self) -> SessionFilter {
        SessionFilter {
            license_id: self.license_id,
            user_id: self.user_id,
        }
    }

    /// Link to this page with the same filter and `id` selected
    fn select_href(&self, id: SessionId) -> String {
        let mut href = format!("/sessions?selected={id}");
        if let Some(license_id) = self.license_id {
            href.push_str(&format!("&license_id={license_id}"));
        }
        if let Some(user_id) = self.user_id {
            href.push_str(&format!("&user_id={user_id}"));
        }
        href
    }
}

fn select(name: &str, all: &str, options: &[FilterOption]) -> String {
    let options: String = options
        .iter()
        .map(|o| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                o.value,
                if o.selected { " selected" } else { "" },
                escape(&o.label)
            )
        })
        .collect();
    format!(
        r#"<select name="{name}" onchange="this.form.submit()"><option value="">{all}</option>{options}</select>"#
    )
}

fn filter_form(licenses: &[FilterOption], users: &[FilterOption]) -> String {
    format!(
        r##"<form method="get" action="/sessions" class="form-grid">
    <label>License{licenses}</label>
    <label>User{users}</label>
    <noscript><button class="btn" type="submit">Filter</button></noscript>
</form>"##,
        licenses = select("license_id", "All licenses", licenses),
        users = select("user_id", "All users", users),
    )
}

fn list_section(query: &SessionsQuery, items: &[SessionListItem]) -> String {
    let rows = items
        .iter()
        .map(|s| {
            vec![
                format!(
                    r#"<a href="{}">#{}{}</a>"#,
                    escape(&query.select_href(s.id)),
                    s.id,
                    if s.selected { " ▶" } else { "" }
                ),
                escape(&s.pc_name),
                badge(s.status, if s.active { Tone::Success } else { Tone::Secondary }),
                escape(&s.started),
                s.receipts.to_string(),
                escape(&s.amount),
            ]
        })
        .collect();
    render::table(&["", "PC", "Status", "Started", "Receipts", "Amount"], rows, NO_SESSIONS)
}

fn detail_section(view: &SessionDetailView) -> String {
    let s = &view.summary;
    let summary = format!(
        r##"<div class="fields">
    <div><div class="label">PC</div><div>{pc}</div></div>
    <div><div class="label">Started</div><div>{started}</div></div>
    <div><div class="label">Ended</div><div>{ended}</div></div>
    <div><div class="label">Receipts</div><div>{receipts}</div></div>
    <div><div class="label">Amount</div><div>{amount}</div></div>
</div>
<br>
<a class="btn success" href="/sessions/{id}/export" download="{file}">Export CSV</a>"##,
        pc = escape(&s.pc_name),
        started = escape(&s.started),
        ended = s
            .ended
            .as_deref()
            .map(escape)
            .unwrap_or_else(|| badge("Ongoing", Tone::Success)),
        receipts = s.total_receipts,
        amount = escape(&s.total_amount),
        id = s.id,
        file = escape(&view.export_file_name),
    );

    let companies = if view.companies.is_empty() {
        render::empty(NO_RECEIPTS)
    } else {
        view.companies
            .iter()
            .map(|c| {
                let rows = c
                    .receipts
                    .iter()
                    .map(|r| {
                        vec![
                            escape(&r.receipt_no),
                            escape(&r.amount),
                            escape(&r.tax_base),
                            format!("%{}", escape(&r.vat_rate)),
                            escape(&r.vat_amount),
                        ]
                    })
                    .collect();
                format!(
                    r#"<h2>{name} · {count} receipts · {total}</h2><p class="empty">Receipt no {range}</p>{table}"#,
                    name = escape(&c.name),
                    count = c.receipt_count,
                    total = escape(&c.total_amount),
                    range = escape(&c.receipt_range),
                    table = render::table(
                        &["Receipt no", "Amount", "Tax base", "VAT", "VAT amount"],
                        rows,
                        NO_RECEIPTS
                    ),
                )
            })
            .collect()
    };

    let activities = render::table(
        &["Time", "Action", "Details"],
        view.activities
            .iter()
            .map(|a| vec![escape(&a.time), badge(&a.label, a.tone), escape(&a.details)])
            .collect(),
        NO_ACTIVITY,
    );

    [
        render::panel(&format!("Session #{}", s.id), &summary),
        render::panel("Companies", &companies),
        render::panel("Activities", &activities),
    ]
    .concat()
}

/// Fetch the sessions into the console cache, returning the dropdown lists
async fn fetch_session_lists(console: &Console) -> WebResult<(Vec<License>, Vec<User>)> {
    let licenses = match console.api.licenses().await {
        Ok(licenses) => Some(licenses),
        Err(e) => {
            console.fail(e, "Could not load licenses")?;
            None
        }
    };
    let users = match console.api.users().await {
        Ok(users) => Some(users),
        Err(e) => {
            console.fail(e, "Could not load users")?;
            None
        }
    };
    match console.api.sessions().await {
        Ok(sessions) => console.cache_sessions(sessions),
        Err(e) => console.fail(e, "Could not load sessions")?,
    }
    if let (Some(licenses), Some(users)) = (&licenses, &users) {
        console.cache_filter_lists(licenses.clone(), users.clone());
    }
    Ok((licenses.unwrap_or_default(), users.unwrap_or_default()))
}

pub async fn list(
    console: Console,
    RawQuery(raw): RawQuery,
    Query(query): Query<SessionsQuery>,
) -> WebResult<Html<String>> {
    let before = console.state();
    let filtering = raw.is_some()
        && before.page() == Page::Sessions
        && before.cached_sessions().is_some();
    let cached = before
        .cached_filter_lists()
        .filter(|_| filtering)
        .map(|(licenses, users)| (licenses.to_vec(), users.to_vec()));
    console.enter(Page::Sessions);

    let (licenses, users) = match cached {
        Some(lists) => {
            tracing::debug!("filtering cached sessions");
            lists
        }
        None => fetch_session_lists(&console).await?,
    };
    console.select_session(query.selected);

    let detail = match query.selected {
        None => render::empty("Select a session to see its receipts"),
        Some(id) => match console.api.session_details(id).await {
            Ok(details) => detail_section(&SessionDetailView::build(&details)),
            Err(e) => {
                console.fail(e, "Could not load session details")?;
                String::new()
            }
        },
    };

    let state = console.state();
    let visible = state.visible_sessions(&query.filter());
    let items = session_list(&visible, state.current_session_id());

    let body = format!(
        r##"{filters}
<div class="split">
    <div>{list}</div>
    <div>{detail}</div>
</div>"##,
        filters = render::panel(
            "Filter",
            &filter_form(
                &license_options(&licenses, query.license_id),
                &user_options(&users, query.user_id)
            )
        ),
        list = render::panel(&format!("{} sessions", items.len()), &list_section(&query, &items)),
    );
    Ok(console.page(Page::Sessions, body))
}

pub async fn export(console: Console, Path(id): Path<SessionId>) -> WebResult<Response> {
    console.enter(Page::Sessions);

    match console.api.session_export(id).await {
        Ok(export) => {
            let rows = export.rows();
            tracing::info!(session_id = id, rows = rows.len(), "session exported");
            Ok(csv_attachment(&session_file_name(id), convert_to_csv(&rows)))
        }
        Err(e) => {
            console.fail(e, "Session export failed")?;
            Ok(Redirect::to(&format!("/sessions?selected={id}")).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> SessionsQuery {
        let uri: axum::http::Uri = format!("/sessions?{query}").parse().unwrap();
        Query::<SessionsQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_empty_select_means_all() {
        let q = parse("license_id=&user_id=7");
        assert_eq!(q.license_id, None);
        assert_eq!(q.user_id, Some(7));
        assert_eq!(q.selected, None);
    }

    #[test]
    fn test_select_href_keeps_filter() {
        let q = parse("license_id=5&user_id=");
        assert_eq!(q.select_href(42), "/sessions?selected=42&license_id=5");
    }
}

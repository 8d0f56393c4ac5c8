//! Device list, drill-down and deletion

use axum::{
    extract::Path,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use fispanel_core::format::Tone;
use fispanel_core::views::{users_table, SessionHistoryRow, UserDetailView};
use fispanel_core::{Notice, Page};
use fispanel_types::UserId;

use super::licenses::{activities_section, companies_section};
use super::ConfirmForm;
use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, badge, escape, link};

fn online_badge(label: &str, online: bool) -> String {
    badge(label, if online { Tone::Success } else { Tone::Secondary })
}

pub async fn list(console: Console) -> WebResult<Html<String>> {
    console.enter(Page::Users);

    let body = match console.api.users().await {
        Ok(users) => {
            let rows = users_table(&users)
                .into_iter()
                .map(|u| {
                    vec![
                        escape(&u.pc_name),
                        format!("<code>{}</code>", escape(&u.license_key)),
                        online_badge(u.online_label, u.online),
                        u.receipts.to_string(),
                        escape(&u.amount),
                        escape(&u.last_seen),
                        format!(
                            r#"{} <form class="inline" method="post" action="/users/{}/delete"><button class="btn danger" type="submit">Delete</button></form>"#,
                            link(&format!("/users/{}", u.id), "Details"),
                            u.id
                        ),
                    ]
                })
                .collect();
            render::table(
                &["PC", "License", "Status", "Receipts", "Amount", "Last seen", ""],
                rows,
                "No devices yet",
            )
        }
        Err(e) => {
            console.fail(e, "Could not load users")?;
            String::new()
        }
    };

    Ok(console.page(Page::Users, render::panel("All devices", &body)))
}

fn sessions_section(sessions: &[SessionHistoryRow]) -> String {
    let rows = sessions
        .iter()
        .map(|s| {
            vec![
                link(&format!("/sessions?selected={}", s.id), &format!("#{}", s.id)),
                escape(&s.started),
                s.ended.as_deref().map(escape).unwrap_or_else(|| badge("Ongoing", Tone::Success)),
                s.receipts.to_string(),
                escape(&s.amount),
                badge(&s.status, if s.active { Tone::Success } else { Tone::Secondary }),
            ]
        })
        .collect();
    render::table(
        &["Session", "Started", "Ended", "Receipts", "Amount", "Status"],
        rows,
        "No sessions yet",
    )
}

pub async fn show(console: Console, Path(id): Path<UserId>) -> WebResult<Html<String>> {
    console.enter(Page::Users);

    let body = match console.api.user_details(id).await {
        Ok(details) => {
            let view = UserDetailView::build(&details);
            [
                render::panel(&view.pc_name, &render::fields(&view.info)),
                render::panel("Recent sessions", &sessions_section(&view.sessions)),
                render::panel("Companies", &companies_section(&view.companies)),
                render::panel("Recent activity", &activities_section(&view.activities)),
            ]
            .concat()
        }
        Err(e) => {
            console.fail(e, "Could not load user details")?;
            String::new()
        }
    };

    Ok(console.page(Page::Users, format!("<p>{}</p><br>{body}", link("/users", "← All devices"))))
}

pub async fn delete(
    console: Console,
    Path(id): Path<UserId>,
    Form(form): Form<ConfirmForm>,
) -> WebResult<Response> {
    console.enter(Page::Users);

    if !form.confirmed() {
        let body = render::confirm(
            &format!("Delete device #{id}? This cannot be undone."),
            &format!("/users/{id}/delete"),
            "Delete",
            "/users",
        );
        return Ok(console.page(Page::Users, body).into_response());
    }

    match console.api.delete_user(id).await {
        Ok(()) => {
            tracing::info!(user_id = id, "user deleted");
            console.notify(Notice::success("User deleted"));
        }
        Err(e) => console.fail(e, "User could not be deleted")?,
    }
    Ok(Redirect::to("/users").into_response())
}

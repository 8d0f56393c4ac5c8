//! License list, creation, drill-down and lifecycle actions

use axum::{
    extract::{rejection::FormRejection, Path},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use fispanel_core::format::Tone;
use fispanel_core::forms::DEFAULT_EXTEND_DAYS;
use fispanel_core::views::{
    licenses_table, ActivityEntry, CompanyStatRow, LicenseDetailView, UserRow, NO_ACTIVITY_YET,
};
use fispanel_core::{CreateLicenseForm, ExtendLicenseForm, Notice, Page};
use fispanel_types::{LicenseId, LicenseStatus};

use super::ConfirmForm;
use crate::console::Console;
use crate::error::WebResult;
use crate::render::{self, badge, escape, link};

fn detail_path(id: LicenseId) -> String {
    format!("/licenses/{id}")
}

const CREATE_FORM: &str = r##"<form method="post" action="/licenses" class="form-grid">
    <label>Company name<input name="company_name" required></label>
    <label>E-mail<input name="contact_email" type="email"></label>
    <label>Phone<input name="contact_phone"></label>
    <label>Days<input name="days" type="number" min="1" max="3650" value="365" required></label>
    <label>Max devices<input name="max_devices" type="number" min="1" max="1000" value="1" required></label>
    <label>Notes<input name="notes"></label>
    <button class="btn success" type="submit">Create license</button>
</form>"##;

pub async fn list(console: Console) -> WebResult<Html<String>> {
    console.enter(Page::Licenses);

    let table = match console.api.licenses().await {
        Ok(licenses) => {
            let rows = licenses_table(&licenses)
                .into_iter()
                .map(|l| {
                    vec![
                        format!("<code>{}</code>", escape(&l.key)),
                        escape(&l.company),
                        badge(&l.status, l.tone),
                        escape(&l.days_remaining),
                        escape(&l.devices),
                        escape(&l.created),
                        link(&detail_path(l.id), "Details"),
                    ]
                })
                .collect();
            render::table(
                &["License key", "Company", "Status", "Remaining", "Devices", "Created", ""],
                rows,
                "No licenses yet",
            )
        }
        Err(e) => {
            console.fail(e, "Could not load licenses")?;
            String::new()
        }
    };

    let body = format!(
        "{}{}",
        render::panel("New license", CREATE_FORM),
        render::panel("All licenses", &table)
    );
    Ok(console.page(Page::Licenses, body))
}

/// Reject an undecodable form with a notice instead of a bare 422
fn form_or_notice<T>(console: &Console, form: Result<Form<T>, FormRejection>) -> Option<T> {
    match form {
        Ok(Form(form)) => Some(form),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "form rejected");
            console.notify(Notice::error(format!("Invalid form: {}", rejection.body_text())));
            None
        }
    }
}

pub async fn create(
    console: Console,
    form: Result<Form<CreateLicenseForm>, FormRejection>,
) -> WebResult<Redirect> {
    console.enter(Page::Licenses);
    let Some(form) = form_or_notice(&console, form) else {
        return Ok(Redirect::to("/licenses"));
    };

    match form.into_request() {
        Err(e) => console.notify(Notice::error(e.to_string())),
        Ok(request) => match console.api.create_license(&request).await {
            Ok(key) => {
                tracing::info!(company = %request.company_name, "license created");
                console.notify(Notice::success(format!("License created: {key}")));
            }
            Err(e) => console.fail(e, "License could not be created")?,
        },
    }
    Ok(Redirect::to("/licenses"))
}

fn users_section(users: &[UserRow]) -> String {
    let rows = users
        .iter()
        .map(|u| {
            vec![
                link(&format!("/users/{}", u.id), &u.pc_name),
                badge(u.online_label, if u.online { Tone::Success } else { Tone::Secondary }),
                u.receipts.to_string(),
                escape(&u.amount),
                escape(&u.last_seen),
            ]
        })
        .collect();
    render::table(&["PC", "Status", "Receipts", "Amount", "Last seen"], rows, "No devices yet")
}

pub(crate) fn companies_section(companies: &[CompanyStatRow]) -> String {
    let rows = companies
        .iter()
        .map(|c| {
            vec![
                escape(&c.name),
                c.receipts.to_string(),
                escape(&c.amount),
                escape(&c.first_receipt_at),
                escape(&c.last_receipt_at),
            ]
        })
        .collect();
    render::table(
        &["Company", "Receipts", "Amount", "First receipt", "Last receipt"],
        rows,
        "No receipts yet",
    )
}

pub(crate) fn activities_section(activities: &[ActivityEntry]) -> String {
    let rows = activities
        .iter()
        .map(|a| {
            let extra: Vec<String> = [a.pc_name.as_ref(), a.company.as_ref(), a.amount.as_ref()]
                .into_iter()
                .flatten()
                .map(|s| escape(s))
                .collect();
            vec![
                escape(&a.at),
                badge(&a.label, a.tone),
                escape(&a.details),
                extra.join(" · "),
            ]
        })
        .collect();
    render::table(&["Time", "Action", "Details", ""], rows, NO_ACTIVITY_YET)
}

fn actions_section(view: &LicenseDetailView) -> String {
    let path = detail_path(view.id);
    let suspend = if view.suspended {
        String::new()
    } else {
        format!(
            r#"<form class="inline" method="post" action="{path}/suspend"><button class="btn warning" type="submit">Suspend</button></form>"#
        )
    };
    format!(
        r##"<div class="form-grid">
    <form class="inline" method="post" action="{path}/extend">
        <input name="days" type="number" min="1" value="{days}" required>
        <button class="btn success" type="submit">Add days</button>
    </form>
    {suspend}
    <form class="inline" method="post" action="{path}/delete"><button class="btn danger" type="submit">Delete</button></form>
</div>"##,
        days = DEFAULT_EXTEND_DAYS,
    )
}

pub async fn show(console: Console, Path(id): Path<LicenseId>) -> WebResult<Html<String>> {
    console.enter(Page::Licenses);
    console.select_license(Some(id));

    let body = match console.api.license_details(id).await {
        Ok(details) => {
            let view = LicenseDetailView::build(&details);
            [
                render::panel(
                    &view.company,
                    &format!("{}<br>{}", render::fields(&view.info), actions_section(&view)),
                ),
                render::panel("Devices", &users_section(&view.users)),
                render::panel("Companies", &companies_section(&view.companies)),
                render::panel("Last 30 days", &render::bars(&view.daily, "No statistics yet")),
                render::panel("Recent activity", &activities_section(&view.activities)),
            ]
            .concat()
        }
        Err(e) => {
            console.fail(e, "Could not load license details")?;
            String::new()
        }
    };

    Ok(console.page(Page::Licenses, format!("<p>{}</p><br>{body}", link("/licenses", "← All licenses"))))
}

pub async fn extend(
    console: Console,
    Path(id): Path<LicenseId>,
    form: Result<Form<ExtendLicenseForm>, FormRejection>,
) -> WebResult<Redirect> {
    console.enter(Page::Licenses);
    let Some(form) = form_or_notice(&console, form) else {
        return Ok(Redirect::to(&detail_path(id)));
    };

    let days = form.days;
    match form.into_update() {
        Err(e) => console.notify(Notice::error(e.to_string())),
        Ok(update) => match console.api.update_license(id, &update).await {
            Ok(()) => console.notify(Notice::success(format!("{days} days added"))),
            Err(e) => console.fail(e, "License could not be extended")?,
        },
    }
    Ok(Redirect::to(&detail_path(id)))
}

pub async fn suspend(
    console: Console,
    Path(id): Path<LicenseId>,
    Form(form): Form<ConfirmForm>,
) -> WebResult<Response> {
    console.enter(Page::Licenses);

    if !form.confirmed() {
        let body = render::confirm(
            &format!("Suspend license #{id}? Its devices stop working until it is reactivated."),
            &format!("{}/suspend", detail_path(id)),
            "Suspend",
            &detail_path(id),
        );
        return Ok(console.page(Page::Licenses, body).into_response());
    }

    match console.api.set_license_status(id, LicenseStatus::Suspended).await {
        Ok(()) => console.notify(Notice::success("License suspended")),
        Err(e) => console.fail(e, "License could not be suspended")?,
    }
    Ok(Redirect::to(&detail_path(id)).into_response())
}

pub async fn delete(
    console: Console,
    Path(id): Path<LicenseId>,
    Form(form): Form<ConfirmForm>,
) -> WebResult<Response> {
    console.enter(Page::Licenses);

    if !form.confirmed() {
        let body = render::confirm(
            &format!("Delete license #{id}? This cannot be undone."),
            &format!("{}/delete", detail_path(id)),
            "Delete",
            &detail_path(id),
        );
        return Ok(console.page(Page::Licenses, body).into_response());
    }

    match console.api.delete_license(id).await {
        Ok(()) => {
            tracing::info!(license_id = id, "license deleted");
            console.notify(Notice::success("License deleted"));
            Ok(Redirect::to("/licenses").into_response())
        }
        Err(e) => {
            console.fail(e, "License could not be deleted")?;
            Ok(Redirect::to(&detail_path(id)).into_response())
        }
    }
}

//! Request handlers, one module per console page

pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod licenses;
pub mod receipts;
pub mod sessions;
pub mod users;

use serde::Deserialize;

/// Body of a destructive action; only `confirm=yes` carries it out
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl ConfirmForm {
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

/// A CSV download named `file_name`
pub fn csv_attachment(file_name: &str, body: String) -> axum::response::Response {
    use axum::http::header;
    use axum::response::IntoResponse;

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

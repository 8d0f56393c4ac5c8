//! Web console errors
//!
//! Most API failures never reach this type: handlers turn them into flash
//! notices through [`crate::console::Console::fail`]. What remains either
//! ends the login or cannot be rendered as a page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use fispanel_client::ClientError;
use thiserror::Error;

use crate::console::clear_cookies;
use crate::render;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    /// The API no longer accepts the operator's token
    #[error("Session expired")]
    SessionExpired,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::SessionExpired => {
                (clear_cookies(CookieJar::new()), Redirect::to("/login")).into_response()
            }
            Self::Client(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Html(render::error_page(&e.to_string())),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_session_expired_redirects_and_clears() {
        let response = WebError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn test_client_error_is_bad_gateway() {
        let response = WebError::Client(ClientError::Rejected("nope".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

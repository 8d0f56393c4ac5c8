//! Login and logout

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use fispanel_client::ClientError;
use fispanel_core::{LoginForm, Notice};

use crate::console::{clear_cookies, login_cookies, read_credentials, Console};
use crate::error::WebResult;
use crate::render;
use crate::state::AppState;

/// The login form; an operator who is already logged in goes to the dashboard
pub async fn login_form(jar: CookieJar) -> Response {
    if read_credentials(&jar).is_some() {
        return Redirect::to("/").into_response();
    }
    Html(render::login_page(None, "")).into_response()
}

pub async fn login(
    State(app): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let username = form.username.clone();
    let request = match form.into_request() {
        Ok(request) => request,
        Err(e) => return Ok(Html(render::login_page(Some(&e.to_string()), &username)).into_response()),
    };

    let credentials = match app.api.login(&request).await {
        Ok(credentials) => credentials,
        Err(ClientError::LoginRejected(message)) => {
            tracing::info!(username = %request.username, "login rejected");
            return Ok(Html(render::login_page(Some(&message), &username)).into_response());
        }
        Err(e) => {
            tracing::warn!(error = %e, "login request failed");
            let message = format!("Could not reach the server: {e}");
            return Ok(Html(render::login_page(Some(&message), &username)).into_response());
        }
    };

    let jar = login_cookies(jar, &credentials, app.config.cookies.secure)?;
    Console::open(&app, &credentials);
    app.update(&credentials.token, |state| {
        state.notify(Notice::success(format!("Welcome, {}", credentials.user.username)))
    });
    tracing::info!(username = %credentials.user.username, "operator logged in");

    Ok((jar, Redirect::to("/")).into_response())
}

/// Forget the login locally; the API keeps no session to end
pub async fn logout(State(app): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(credentials) = read_credentials(&jar) {
        app.forget(&credentials.token);
        tracing::info!(username = %credentials.user.username, "operator logged out");
    }
    (clear_cookies(jar), Redirect::to("/login"))
}

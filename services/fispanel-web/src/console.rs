//! Operator console extractor
//!
//! A login lives in two cookies: `fispanel_token` holds the bearer token and
//! `fispanel_user` the profile JSON, base64url encoded. Handlers taking a
//! [`Console`] only run for requests carrying both; everything else is
//! redirected to `/login`.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use fispanel_client::{ApiClient, ClientError, ClientResult, Credentials};
use fispanel_core::{ConsoleState, Notice, Page};
use fispanel_types::{License, LicenseId, Session, SessionId, User};

use crate::error::WebError;
use crate::render;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "fispanel_token";
pub const USER_COOKIE: &str = "fispanel_user";

/// Add both login cookies to `jar`
pub fn login_cookies(jar: CookieJar, credentials: &Credentials, secure: bool) -> ClientResult<CookieJar> {
    let user = URL_SAFE_NO_PAD.encode(credentials.encoded_user()?);
    Ok(jar
        .add(login_cookie(TOKEN_COOKIE, credentials.token.clone(), secure))
        .add(login_cookie(USER_COOKIE, user, secure)))
}

fn login_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Expire both login cookies
pub fn clear_cookies(jar: CookieJar) -> CookieJar {
    jar.add(expired(TOKEN_COOKIE)).add(expired(USER_COOKIE))
}

fn expired(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// The login stored in `jar`, if both cookies are present and readable
pub fn read_credentials(jar: &CookieJar) -> Option<Credentials> {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_string());
    let user = jar
        .get(USER_COOKIE)
        .and_then(|c| URL_SAFE_NO_PAD.decode(c.value()).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match Credentials::from_parts(token.as_deref(), user.as_deref()) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unreadable login cookies");
            None
        }
    }
}

/// One logged-in operator's view of the application
pub struct Console {
    app: Arc<AppState>,
    token: String,
    /// Client carrying the operator's token
    pub api: ApiClient,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Console {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, app: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(Credentials { token, user }) = read_credentials(&jar) else {
            return Err(Redirect::to("/login"));
        };

        // A restart loses the map; the cookies are enough to rebuild it
        app.ensure(&token, || ConsoleState::new().login(token.clone(), user));

        Ok(Self {
            api: app.api.clone().with_token(token.clone()),
            app: Arc::clone(app),
            token,
        })
    }
}

impl Console {
    /// Start a console for freshly issued credentials
    pub fn open(app: &AppState, credentials: &Credentials) {
        app.open(
            &credentials.token,
            ConsoleState::new().login(credentials.token.clone(), credentials.user.clone()),
        );
    }

    fn update(&self, f: impl FnOnce(ConsoleState) -> ConsoleState) {
        self.app.update(&self.token, f);
    }

    /// A copy of the current console
    pub fn state(&self) -> ConsoleState {
        self.app.snapshot(&self.token)
    }

    pub fn enter(&self, page: Page) {
        self.update(|state| state.navigate(page));
    }

    pub fn select_license(&self, id: Option<LicenseId>) {
        self.update(|state| state.select_license(id));
    }

    pub fn select_session(&self, id: Option<SessionId>) {
        self.update(|state| state.select_session(id));
    }

    pub fn cache_sessions(&self, sessions: Vec<Session>) {
        self.update(|state| state.cache_sessions(sessions));
    }

    pub fn cache_filter_lists(&self, licenses: Vec<License>, users: Vec<User>) {
        self.update(|state| state.cache_filter_lists(licenses, users));
    }

    pub fn notify(&self, notice: Notice) {
        self.update(|state| state.notify(notice));
    }

    fn take_notice(&self) -> Option<Notice> {
        let mut notice = None;
        self.update(|state| {
            let (state, taken) = state.take_notice();
            notice = taken;
            state
        });
        notice
    }

    /// Turn a failed API call into an error notice
    ///
    /// A rejected token ends the login instead.
    pub fn fail(&self, error: ClientError, message: &str) -> Result<(), WebError> {
        if error.is_unauthorized() {
            tracing::info!("token rejected, ending login");
            self.app.forget(&self.token);
            return Err(WebError::SessionExpired);
        }
        tracing::warn!(error = %error, "{message}");
        self.notify(Notice::error(format!("{message}: {error}")));
        Ok(())
    }

    /// Render `body` inside the console layout, consuming the pending notice
    pub fn page(&self, page: Page, body: String) -> Html<String> {
        let notice = self.take_notice();
        let state = self.state();
        Html(render::layout(page, state.username(), notice.as_ref(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};
    use fispanel_types::UserProfile;

    fn credentials() -> Credentials {
        Credentials {
            token: "tok-1".to_string(),
            user: UserProfile {
                username: "admin".to_string(),
                ..Default::default()
            },
        }
    }

    fn jar_from(cookies: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookies).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_cookies_round_trip() {
        let jar = login_cookies(CookieJar::new(), &credentials(), false).unwrap();
        let header = format!(
            "{TOKEN_COOKIE}={}; {USER_COOKIE}={}",
            jar.get(TOKEN_COOKIE).unwrap().value(),
            jar.get(USER_COOKIE).unwrap().value()
        );
        assert_eq!(read_credentials(&jar_from(&header)), Some(credentials()));
    }

    #[test]
    fn test_both_cookies_required() {
        assert_eq!(read_credentials(&jar_from("fispanel_token=tok-1")), None);
        assert_eq!(read_credentials(&jar_from("fispanel_user=e30")), None);
    }

    #[test]
    fn test_garbage_user_cookie_is_ignored() {
        assert_eq!(
            read_credentials(&jar_from("fispanel_token=tok-1; fispanel_user=%%%")),
            None
        );
    }

    #[test]
    fn test_cleared_cookies_are_expired() {
        let jar = clear_cookies(CookieJar::new());
        let token = jar.get(TOKEN_COOKIE).unwrap();
        assert_eq!(token.value(), "");
        assert!(token.max_age().is_some_and(|age| age.is_zero()));
    }
}

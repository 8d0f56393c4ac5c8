//! HTTP client for the admin API

use std::sync::Arc;

use fispanel_types::{
    ActionResponse, Activity, CreatedLicense, DataEnvelope, ExportRow, License, LicenseDetails,
    LicenseId, LicenseStatus, LicenseUpdate, LoginRequest, LoginResponse, NewLicense, Session,
    SessionDetails, SessionExport, SessionId, StatDay, TodaySummary, User, UserDetails, UserId,
};
use fispanel_core::{DashboardSnapshot, RANGE_END, RANGE_START};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{ClientConfig, ClientError, ClientResult, Credentials};

/// Client for the admin API
///
/// Cheap to clone. The bearer token is held in memory only; persisting it is
/// the caller's business (see [`crate::CredentialStore`]).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    http: reqwest::Client,
    token: Option<String>,
}

fn decode<T: DeserializeOwned>(endpoint: &str, text: &str) -> ClientResult<T> {
    serde_json::from_str(text).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn to_body<B: Serialize>(endpoint: &str, body: &B) -> ClientResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

impl ApiClient {
    /// Create a client without a token
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<(StatusCode, String)> {
        let mut request = self
            .http
            .request(method.clone(), format!("{}{}", self.base_url, endpoint))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, endpoint, error = %e, "request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, endpoint, status = status.as_u16(), "api request");
        Ok((status, text))
    }

    /// Send one request and decode the JSON answer
    ///
    /// The in-memory token, when set, is attached as a bearer token.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let (status, text) = self.send(method.clone(), endpoint, body.as_ref()).await?;
        if !status.is_success() {
            warn!(%method, endpoint, status = status.as_u16(), "api error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        decode(endpoint, &text)
    }

    async fn admin<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        if self.token.is_none() {
            return Err(ClientError::MissingToken);
        }
        self.request(method, endpoint, body).await
    }

    async fn data<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let envelope: DataEnvelope<T> = self.admin(Method::GET, endpoint, None).await?;
        Ok(envelope.data)
    }

    async fn action(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        fallback: &str,
    ) -> ClientResult<()> {
        let response: ActionResponse = self.admin(method, endpoint, body).await?;
        if response.success {
            Ok(())
        } else {
            let message = response.error.unwrap_or_else(|| fallback.to_string());
            warn!(endpoint, %message, "action rejected");
            Err(ClientError::Rejected(message))
        }
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Exchange a username and password for a token and profile
    ///
    /// The login answer is read whatever the HTTP status, since the server
    /// reports bad credentials as `success: false`.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<Credentials> {
        let endpoint = "/api/auth/login";
        let body = to_body(endpoint, request)?;
        let (status, text) = self.send(Method::POST, endpoint, Some(&body)).await?;

        let response: LoginResponse = match decode(endpoint, &text) {
            Ok(response) => response,
            Err(_) if !status.is_success() => {
                return Err(ClientError::Status {
                    status: status.as_u16(),
                    body: text,
                })
            }
            Err(e) => return Err(e),
        };

        match (response.success, response.token) {
            (true, Some(token)) => Ok(Credentials {
                token,
                user: response.user.unwrap_or_default(),
            }),
            _ => {
                let message = response.error.unwrap_or_else(|| "Login failed".to_string());
                warn!(username = %request.username, %message, "login rejected");
                Err(ClientError::LoginRejected(message))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Licenses
    // ------------------------------------------------------------------------

    pub async fn licenses(&self) -> ClientResult<Vec<License>> {
        self.data("/api/admin/licenses").await
    }

    pub async fn license_details(&self, id: LicenseId) -> ClientResult<LicenseDetails> {
        self.data(&format!("/api/admin/licenses/{id}/details")).await
    }

    /// Create a license and return its key
    pub async fn create_license(&self, license: &NewLicense) -> ClientResult<String> {
        let endpoint = "/api/admin/licenses/create";
        let body = to_body(endpoint, license)?;
        let created: CreatedLicense = self.admin(Method::POST, endpoint, Some(body)).await?;
        match (created.success, created.license_key) {
            (true, Some(key)) => Ok(key),
            (_, _) => Err(ClientError::Rejected(
                created
                    .error
                    .unwrap_or_else(|| "License could not be created".to_string()),
            )),
        }
    }

    pub async fn delete_license(&self, id: LicenseId) -> ClientResult<()> {
        self.action(
            Method::DELETE,
            &format!("/api/admin/licenses/{id}"),
            None,
            "License could not be deleted",
        )
        .await
    }

    pub async fn update_license(&self, id: LicenseId, update: &LicenseUpdate) -> ClientResult<()> {
        let endpoint = format!("/api/admin/licenses/{id}");
        let body = to_body(&endpoint, update)?;
        self.action(Method::PUT, &endpoint, Some(body), "License could not be updated")
            .await
    }

    pub async fn add_license_days(&self, id: LicenseId, days: u32) -> ClientResult<()> {
        self.update_license(id, &LicenseUpdate::AddDays { days }).await
    }

    pub async fn set_license_status(&self, id: LicenseId, status: LicenseStatus) -> ClientResult<()> {
        self.update_license(id, &LicenseUpdate::SetStatus { status }).await
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub async fn users(&self) -> ClientResult<Vec<User>> {
        self.data("/api/admin/users").await
    }

    pub async fn user_details(&self, id: UserId) -> ClientResult<UserDetails> {
        self.data(&format!("/api/admin/users/{id}/details")).await
    }

    pub async fn delete_user(&self, id: UserId) -> ClientResult<()> {
        self.action(
            Method::DELETE,
            &format!("/api/admin/users/{id}"),
            None,
            "User could not be deleted",
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Statistics, receipts and activities
    // ------------------------------------------------------------------------

    pub async fn daily_stats(&self, start_date: &str, end_date: &str) -> ClientResult<Vec<StatDay>> {
        self.data(&format!(
            "/api/admin/stats/daily?start_date={start_date}&end_date={end_date}"
        ))
        .await
    }

    pub async fn today(&self) -> ClientResult<TodaySummary> {
        self.admin(Method::GET, "/api/admin/dashboard/today", None)
            .await
    }

    pub async fn export_receipts(&self, start_date: &str, end_date: &str) -> ClientResult<Vec<ExportRow>> {
        self.data(&format!(
            "/api/admin/receipts/export?start_date={start_date}&end_date={end_date}"
        ))
        .await
    }

    pub async fn activities(&self, limit: usize) -> ClientResult<Vec<Activity>> {
        self.data(&format!("/api/admin/activities?limit={limit}"))
            .await
    }

    /// Everything the dashboard needs, fetched concurrently
    ///
    /// The license, user and daily-stat reads must all succeed. The today
    /// summary is best effort and its failure only leaves `today` empty.
    pub async fn dashboard(&self) -> ClientResult<DashboardSnapshot> {
        let (licenses, users, stats, today) = tokio::join!(
            self.licenses(),
            self.users(),
            self.daily_stats(RANGE_START, RANGE_END),
            self.today(),
        );
        let today = match today {
            Ok(today) => Some(today),
            Err(e) => {
                warn!(error = %e, "today summary unavailable");
                None
            }
        };
        Ok(DashboardSnapshot {
            licenses: licenses?,
            users: users?,
            stats: stats?,
            today,
        })
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    pub async fn sessions(&self) -> ClientResult<Vec<Session>> {
        self.data("/api/admin/sessions").await
    }

    pub async fn session_details(&self, id: SessionId) -> ClientResult<SessionDetails> {
        let details: SessionDetails = self
            .admin(Method::GET, &format!("/api/admin/sessions/{id}/details"), None)
            .await?;
        if !details.success {
            return Err(ClientError::Rejected(format!(
                "Session #{id} details are not available"
            )));
        }
        Ok(details)
    }

    pub async fn session_export(&self, id: SessionId) -> ClientResult<SessionExport> {
        let export: SessionExport = self
            .admin(Method::GET, &format!("/api/admin/sessions/{id}/export"), None)
            .await?;
        if !export.success || export.data.is_none() {
            return Err(ClientError::Rejected(format!(
                "Session #{id} could not be exported"
            )));
        }
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let err = ApiClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert!(client.token().is_none());
        assert_eq!(client.with_token("t").token(), Some("t"));
    }
}

//! Per-invocation console context

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use fispanel_client::{ApiClient, ClientConfig, CredentialStore, Credentials};
use fispanel_core::{ConsoleState, Notice, Page};
use fispanel_types::{LicenseId, Session, SessionId};

/// API client, credential store and console state for one command
pub struct Context {
    pub api: ApiClient,
    pub store: CredentialStore,
    pub state: ConsoleState,
}

impl Context {
    /// Build the client and restore a stored login, if any
    pub fn open(api_url: &str, credentials: Option<PathBuf>, timeout_secs: u64) -> Result<Self> {
        let config = ClientConfig::new(api_url).with_timeout(Duration::from_secs(timeout_secs));
        let api = ApiClient::new(config).context("Invalid API configuration")?;

        let store = match credentials {
            Some(path) => CredentialStore::new(path),
            None => CredentialStore::open_default().context("Cannot locate the credentials file")?,
        };

        let stored = store
            .load()
            .with_context(|| format!("Cannot read {}", store.path().display()))?;

        let mut ctx = Self {
            api,
            store,
            state: ConsoleState::new(),
        };
        if let Some(credentials) = stored {
            tracing::debug!(username = %credentials.user.username, "restored login");
            ctx.sign_in(credentials);
        }
        Ok(ctx)
    }

    /// Use `credentials` for the rest of this invocation
    pub fn sign_in(&mut self, credentials: Credentials) {
        let Credentials { token, user } = credentials;
        self.api.set_token(Some(token.clone()));
        self.update(|state| state.login(token, user));
    }

    pub fn sign_out(&mut self) {
        self.api.set_token(None);
        self.update(ConsoleState::logout);
    }

    /// Fail unless a login was restored
    pub fn require_login(&self) -> Result<()> {
        if !self.state.is_authenticated() {
            anyhow::bail!("Not logged in. Run `fispanel login` first.");
        }
        Ok(())
    }

    /// Move the console to `page`, requiring a login
    pub fn enter(&mut self, page: Page) -> Result<()> {
        self.require_login()?;
        self.update(|state| state.navigate(page));
        Ok(())
    }

    fn update(&mut self, f: impl FnOnce(ConsoleState) -> ConsoleState) {
        self.state = f(std::mem::take(&mut self.state));
    }

    pub fn select_license(&mut self, id: LicenseId) {
        self.update(|state| state.select_license(Some(id)));
    }

    pub fn select_session(&mut self, id: Option<SessionId>) {
        self.update(|state| state.select_session(id));
    }

    pub fn cache_sessions(&mut self, sessions: Vec<Session>) {
        self.update(|state| state.cache_sessions(sessions));
    }

    pub fn notify(&mut self, notice: Notice) {
        self.update(|state| state.notify(notice));
    }

    /// Remove and return the pending notice
    pub fn take_notice(&mut self) -> Option<Notice> {
        let (state, notice) = std::mem::take(&mut self.state).take_notice();
        self.state = state;
        notice
    }
}

//! Application state shared across handlers

use std::time::{Duration, Instant};

use dashmap::DashMap;
use fispanel_client::{ApiClient, ClientResult};
use fispanel_core::ConsoleState;

use crate::config::WebConfig;

/// A console and the last time its operator made a request
struct Tracked {
    console: ConsoleState,
    last_seen: Instant,
}

/// Shared application state
pub struct AppState {
    /// Token-less client; each request clones it with the operator's token
    pub api: ApiClient,
    /// One console per logged-in operator, keyed by bearer token
    consoles: DashMap<String, Tracked>,
    idle_timeout: Duration,
    pub config: WebConfig,
}

impl AppState {
    pub fn new(config: WebConfig) -> ClientResult<Self> {
        let api = ApiClient::new(config.api.client_config())?;
        Ok(Self {
            api,
            consoles: DashMap::new(),
            idle_timeout: config.console.idle_timeout(),
            config,
        })
    }

    /// Install `console` for `token`, replacing any previous one
    ///
    /// Consoles idle for longer than the configured timeout are dropped
    /// first. A dropped operator still holding the cookies gets a fresh
    /// console on their next request.
    pub fn open(&self, token: &str, console: ConsoleState) {
        let now = Instant::now();
        self.sweep(now);
        self.consoles.insert(
            token.to_string(),
            Tracked {
                console,
                last_seen: now,
            },
        );
    }

    /// Make sure `token` has a console, building it with `make` if not
    pub fn ensure(&self, token: &str, make: impl FnOnce() -> ConsoleState) {
        if let Some(mut entry) = self.consoles.get_mut(token) {
            entry.last_seen = Instant::now();
            return;
        }
        let now = Instant::now();
        self.sweep(now);
        self.consoles
            .entry(token.to_string())
            .or_insert_with(|| Tracked {
                console: make(),
                last_seen: now,
            });
    }

    /// Replace the console of `token` with `f(console)`
    ///
    /// Does nothing when the operator has logged out in the meantime.
    pub fn update(&self, token: &str, f: impl FnOnce(ConsoleState) -> ConsoleState) {
        if let Some(mut entry) = self.consoles.get_mut(token) {
            let current = std::mem::take(&mut entry.console);
            entry.console = f(current);
            entry.last_seen = Instant::now();
        }
    }

    /// A copy of the console of `token`
    pub fn snapshot(&self, token: &str) -> ConsoleState {
        self.consoles
            .get(token)
            .map(|entry| entry.console.clone())
            .unwrap_or_default()
    }

    pub fn forget(&self, token: &str) {
        self.consoles.remove(token);
    }

    pub fn console_count(&self) -> usize {
        self.consoles.len()
    }

    /// Drop consoles not seen within the idle timeout as of `now`
    fn sweep(&self, now: Instant) {
        let before = self.consoles.len();
        self.consoles
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.idle_timeout);
        let dropped = before.saturating_sub(self.consoles.len());
        if dropped > 0 {
            tracing::debug!(dropped, "idle consoles dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fispanel_core::{Notice, Page};
    use fispanel_types::UserProfile;

    fn state() -> AppState {
        AppState::new(WebConfig::default()).unwrap()
    }

    fn console(token: &str) -> ConsoleState {
        ConsoleState::new().login(token, UserProfile::default())
    }

    #[test]
    fn test_update_only_touches_known_operators() {
        let app = state();
        app.update("ghost", |s| s.navigate(Page::Users));
        assert_eq!(app.console_count(), 0);

        app.open("t1", console("t1"));
        app.update("t1", |s| s.navigate(Page::Users).notify(Notice::info("hi")));

        let snapshot = app.snapshot("t1");
        assert_eq!(snapshot.page(), Page::Users);
        assert_eq!(snapshot.notice(), Some(&Notice::info("hi")));
    }

    #[test]
    fn test_ensure_keeps_existing_console() {
        let app = state();
        app.open("t1", console("t1").navigate(Page::Sessions));
        app.ensure("t1", || console("t1"));
        assert_eq!(app.snapshot("t1").page(), Page::Sessions);

        app.ensure("t2", || console("t2"));
        assert_eq!(app.console_count(), 2);
    }

    #[test]
    fn test_forget() {
        let app = state();
        app.open("t1", console("t1"));
        app.forget("t1");
        assert!(!app.snapshot("t1").is_authenticated());
    }

    #[test]
    fn test_idle_consoles_are_swept() {
        let app = state();
        app.open("t1", console("t1"));
        app.open("t2", console("t2"));

        app.sweep(Instant::now());
        assert_eq!(app.console_count(), 2);

        let later = Instant::now() + app.idle_timeout + Duration::from_secs(1);
        app.sweep(later);
        assert_eq!(app.console_count(), 0);
    }

    #[test]
    fn test_open_drops_abandoned_consoles() {
        let mut config = WebConfig::default();
        config.console.idle_timeout_secs = 0;
        let app = AppState::new(config).unwrap();

        app.open("abandoned", console("abandoned"));
        std::thread::sleep(Duration::from_millis(5));
        app.open("fresh", console("fresh"));

        assert_eq!(app.console_count(), 1);
        assert!(app.snapshot("fresh").is_authenticated());
        assert!(!app.snapshot("abandoned").is_authenticated());
    }
}

//! Console state
//!
//! One operator's console is an explicit value. Every transition consumes
//! the current state and returns the next one, so front ends can keep it in
//! whatever store suits them (a map entry per operator, a local variable).

use fispanel_types::{License, LicenseId, Session, SessionId, User, UserProfile};

use crate::sessions::{filter_sessions, SessionFilter};

/// A console page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Licenses,
    Users,
    Receipts,
    Activities,
    Sessions,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Licenses,
        Page::Users,
        Page::Receipts,
        Page::Activities,
        Page::Sessions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Licenses => "Licenses",
            Self::Users => "Users",
            Self::Receipts => "Receipts",
            Self::Activities => "Activities",
            Self::Sessions => "Sessions",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Licenses => "/licenses",
            Self::Users => "/users",
            Self::Receipts => "/receipts",
            Self::Activities => "/activities",
            Self::Sessions => "/sessions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A one-shot message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Token and profile of the logged-in operator
#[derive(Debug, Clone, PartialEq)]
pub struct Auth {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsoleState {
    auth: Option<Auth>,
    page: Page,
    current_license_id: Option<LicenseId>,
    current_session_id: Option<SessionId>,
    sessions: Option<Vec<Session>>,
    /// Licenses and users behind the session filter dropdowns
    filter_lists: Option<(Vec<License>, Vec<User>)>,
    notice: Option<Notice>,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on the dashboard as `user`
    pub fn login(self, token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            auth: Some(Auth {
                token: token.into(),
                user,
            }),
            ..Self::default()
        }
    }

    /// Forget the operator and everything cached for them
    pub fn logout(self) -> Self {
        Self::default()
    }

    /// Switch page; leaving a page drops its selections and caches
    pub fn navigate(self, page: Page) -> Self {
        if page == self.page {
            return self;
        }
        Self {
            page,
            current_license_id: None,
            current_session_id: None,
            sessions: None,
            filter_lists: None,
            ..self
        }
    }

    pub fn select_license(self, id: Option<LicenseId>) -> Self {
        Self {
            current_license_id: id,
            ..self
        }
    }

    pub fn select_session(self, id: Option<SessionId>) -> Self {
        Self {
            current_session_id: id,
            ..self
        }
    }

    pub fn cache_sessions(self, sessions: Vec<Session>) -> Self {
        Self {
            sessions: Some(sessions),
            ..self
        }
    }

    pub fn cache_filter_lists(self, licenses: Vec<License>, users: Vec<User>) -> Self {
        Self {
            filter_lists: Some((licenses, users)),
            ..self
        }
    }

    pub fn notify(self, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..self
        }
    }

    /// Remove the pending notice
    pub fn take_notice(mut self) -> (Self, Option<Notice>) {
        let notice = self.notice.take();
        (self, notice)
    }

    /// Cached sessions passing `filter`, empty when nothing is cached
    pub fn visible_sessions(&self, filter: &SessionFilter) -> Vec<&Session> {
        self.sessions
            .as_deref()
            .map(|all| filter_sessions(all, filter))
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.user.username.as_str())
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn current_license_id(&self) -> Option<LicenseId> {
        self.current_license_id
    }

    pub fn current_session_id(&self) -> Option<SessionId> {
        self.current_session_id
    }

    pub fn cached_sessions(&self) -> Option<&[Session]> {
        self.sessions.as_deref()
    }

    pub fn cached_filter_lists(&self) -> Option<(&[License], &[User])> {
        self.filter_lists
            .as_ref()
            .map(|(licenses, users)| (licenses.as_slice(), users.as_slice()))
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            username: "admin".to_string(),
            ..Default::default()
        }
    }

    fn sessions() -> Vec<Session> {
        serde_json::from_str(
            r#"[{"id":1,"license_id":5,"user_id":1,"status":"active"},
                {"id":2,"license_id":7,"user_id":2,"status":"ended"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_login_logout() {
        let state = ConsoleState::new().login("tok", profile());
        assert!(state.is_authenticated());
        assert_eq!(state.token(), Some("tok"));
        assert_eq!(state.username(), Some("admin"));
        assert_eq!(state.page(), Page::Dashboard);

        let state = state
            .navigate(Page::Sessions)
            .cache_sessions(sessions())
            .select_session(Some(1))
            .logout();
        assert_eq!(state, ConsoleState::default());
    }

    #[test]
    fn test_navigation_drops_page_caches() {
        let state = ConsoleState::new()
            .login("tok", profile())
            .navigate(Page::Sessions)
            .cache_sessions(sessions())
            .select_session(Some(2));

        let same = state.clone().navigate(Page::Sessions);
        assert_eq!(same.current_session_id(), Some(2));
        assert!(same.cached_sessions().is_some());

        let moved = state.navigate(Page::Licenses);
        assert_eq!(moved.current_session_id(), None);
        assert!(moved.cached_sessions().is_none());
        assert!(moved.is_authenticated());
    }

    #[test]
    fn test_filter_lists_live_with_the_sessions_page() {
        let licenses: Vec<License> =
            serde_json::from_str(r#"[{"id":5,"license_key":"FIS-5"}]"#).unwrap();
        let users: Vec<User> = serde_json::from_str(r#"[{"id":1,"pc_name":"KASA-1"}]"#).unwrap();

        let state = ConsoleState::new()
            .login("tok", profile())
            .navigate(Page::Sessions)
            .cache_sessions(sessions())
            .cache_filter_lists(licenses, users);
        let (l, u) = state.cached_filter_lists().unwrap();
        assert_eq!((l.len(), u.len()), (1, 1));

        let kept = state.clone().navigate(Page::Sessions);
        assert!(kept.cached_filter_lists().is_some());

        let moved = state.navigate(Page::Users);
        assert!(moved.cached_filter_lists().is_none());
    }

    #[test]
    fn test_visible_sessions_use_cache() {
        let state = ConsoleState::new().cache_sessions(sessions());
        let filter = SessionFilter {
            license_id: Some(5),
            user_id: None,
        };
        let visible = state.visible_sessions(&filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);

        assert!(ConsoleState::new()
            .visible_sessions(&SessionFilter::default())
            .is_empty());
    }

    #[test]
    fn test_notice_is_taken_once() {
        let state = ConsoleState::new().notify(Notice::error("could not load licenses"));
        let (state, notice) = state.take_notice();
        assert_eq!(notice.unwrap().level, NoticeLevel::Error);
        let (_, again) = state.take_notice();
        assert!(again.is_none());
    }
}

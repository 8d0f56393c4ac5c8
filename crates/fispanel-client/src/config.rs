use std::time::Duration;

/// Production admin API
pub const DEFAULT_API_URL: &str = "https://fis-panel-api.onrender.com";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

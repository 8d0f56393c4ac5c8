use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Not logged in")]
    MissingToken,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API Error: {status}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    LoginRejected(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Credential store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Corrupt credential store: {0}")]
    CorruptStore(String),
}

impl ClientError {
    /// HTTP status of a non-2xx answer
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server no longer accepts the token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingToken) || matches!(self.status(), Some(401 | 403))
    }
}

/// Client result type
pub type ClientResult<T> = std::result::Result<T, ClientError>;

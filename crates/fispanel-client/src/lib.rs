//! Fispanel Client - talks to the receipt/license admin API
//!
//! ```ignore
//! use fispanel_client::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(ClientConfig::default())?;
//! let credentials = client.login(&request).await?;
//! let client = client.with_token(credentials.token);
//! let licenses = client.licenses().await?;
//! ```
//!
//! Every request is a single attempt. A non-2xx status is an error, and so
//! is an action answered with `success: false`.

mod client;
mod config;
mod credentials;
mod error;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use credentials::{CredentialStore, Credentials};
pub use error::{ClientError, ClientResult};

pub use reqwest::Method;

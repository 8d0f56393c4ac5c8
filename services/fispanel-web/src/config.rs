//! Web console configuration
//!
//! Layered from `config/default`, `config/local`, an optional file given on
//! the command line and `FISPANEL__*` environment variables, in that order of
//! increasing precedence.

use std::net::SocketAddr;
use std::time::Duration;

use fispanel_client::{ClientConfig, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub cookies: CookieSettings,

    #[serde(default)]
    pub console: ConsoleSettings,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Grace period for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Where the admin API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone()).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Login cookie attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieSettings {
    /// Only send the login cookies over HTTPS
    #[serde(default)]
    pub secure: bool,
}

/// Per-operator console bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Consoles untouched for this long are dropped from memory
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl ConsoleSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    8 * 60 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl WebConfig {
    /// Load configuration from files and the environment
    pub fn load(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FISPANEL")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

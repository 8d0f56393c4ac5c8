//! Persisted login
//!
//! A login is persisted as exactly two string values: `token` and `user`
//! (the operator profile serialized as JSON). A login is restored only when
//! both are present.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fispanel_types::UserProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Token and profile of a logged-in operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user: UserProfile,
}

impl Credentials {
    /// The profile as stored under the `user` key
    pub fn encoded_user(&self) -> ClientResult<String> {
        serde_json::to_string(&self.user).map_err(|e| ClientError::CorruptStore(e.to_string()))
    }

    /// Rebuild from the two stored values
    pub fn from_parts(token: Option<&str>, user: Option<&str>) -> ClientResult<Option<Self>> {
        let (Some(token), Some(user)) = (token, user) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }
        let user: UserProfile =
            serde_json::from_str(user).map_err(|e| ClientError::CorruptStore(e.to_string()))?;
        Ok(Some(Self {
            token: token.to_string(),
            user,
        }))
    }
}

/// Credentials file of the terminal console
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/fispanel/credentials.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fispanel").join("credentials.json"))
    }

    pub fn open_default() -> ClientResult<Self> {
        Self::default_path().map(Self::new).ok_or_else(|| {
            ClientError::Store(std::io::Error::new(
                ErrorKind::NotFound,
                "no configuration directory on this system",
            ))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored login, `None` when nothing (or only half of it) is stored
    pub fn load(&self) -> ClientResult<Option<Credentials>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let values: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| ClientError::CorruptStore(e.to_string()))?;
        Credentials::from_parts(
            values.get(TOKEN_KEY).map(String::as_str),
            values.get(USER_KEY).map(String::as_str),
        )
    }

    pub fn save(&self, credentials: &Credentials) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let values = BTreeMap::from([
            (TOKEN_KEY, credentials.token.clone()),
            (USER_KEY, credentials.encoded_user()?),
        ]);
        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| ClientError::CorruptStore(e.to_string()))?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Remove both values
    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

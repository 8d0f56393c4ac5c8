//! License records
//!
//! A license is an activation key entitling a company to a bounded number of
//! devices for a time window.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{Activity, CompanySummary, LicenseId, StatDay, User};

/// Lifecycle status of a license as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LicenseStatus {
    Active,
    Expired,
    Suspended,
    /// Any status this console does not know about, kept verbatim
    Other(String),
}

impl LicenseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Suspended => "suspended",
            Self::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for LicenseStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for LicenseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Self::Active,
            "expired" => Self::Expired,
            "suspended" => Self::Suspended,
            _ => Self::Other(s),
        }
    }
}

impl From<LicenseStatus> for String {
    fn from(status: LicenseStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A license row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: LicenseId,
    pub license_key: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub status: LicenseStatus,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub days_remaining: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub max_devices: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub active_devices: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Everything the license drill-down shows, fetched in one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseDetails {
    pub license: License,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub users: Vec<User>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub companies: Vec<CompanySummary>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub activities: Vec<Activity>,
    /// Newest first, as the server sends it
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub daily_stats: Vec<StatDay>,
}

/// Body of `POST /api/admin/licenses/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLicense {
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub days: u32,
    pub max_devices: u32,
    pub notes: String,
}

/// Body of `PUT /api/admin/licenses/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LicenseUpdate {
    /// Extend the license window
    AddDays { days: u32 },
    /// Force a lifecycle status
    SetStatus { status: LicenseStatus },
}

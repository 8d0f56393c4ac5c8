//! User (device) records

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{Activity, CompanySummary, LicenseId, Session, UserId};

/// A device running a licensed installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub pc_name: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub license_id: Option<LicenseId>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub is_online: bool,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub total_receipts: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// Everything the user drill-down shows, fetched in one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user: User,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub sessions: Vec<Session>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub companies: Vec<CompanySummary>,
}

//! Operator input
//!
//! Forms arrive from HTML form posts or from CLI arguments. Empty optional
//! text fields are treated as absent.

use chrono::NaiveDate;
use fispanel_types::{LicenseUpdate, LoginRequest, NewLicense};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::{RANGE_END, RANGE_START};

/// Days added by default when extending a license
pub const DEFAULT_EXTEND_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    Invalid(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: validation failed", field))
                })
            })
            .collect();
        messages.sort();
        FormError::Invalid(messages.join(", "))
    }
}

/// Treat `""` (and whitespace) as a missing value
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, FormError> {
        let form = Self {
            username: self.username.trim().to_string(),
            password: self.password,
        };
        form.validate()?;
        Ok(LoginRequest {
            username: form.username,
            password: form.password,
        })
    }
}

// ============================================================================
// Licenses
// ============================================================================

fn default_days() -> u32 {
    365
}

fn default_max_devices() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateLicenseForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid e-mail address"))]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub contact_phone: Option<String>,
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 3650, message = "Days must be between 1 and 3650"))]
    pub days: u32,
    #[serde(default = "default_max_devices")]
    #[validate(range(min = 1, max = 1000, message = "Max devices must be between 1 and 1000"))]
    pub max_devices: u32,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
}

impl CreateLicenseForm {
    pub fn into_request(self) -> Result<NewLicense, FormError> {
        let form = Self {
            company_name: self.company_name.trim().to_string(),
            ..self
        };
        form.validate()?;
        Ok(NewLicense {
            company_name: form.company_name,
            contact_email: form.contact_email.unwrap_or_default(),
            contact_phone: form.contact_phone.unwrap_or_default(),
            days: form.days,
            max_devices: form.max_devices,
            notes: form.notes.unwrap_or_default(),
        })
    }
}

fn default_extend_days() -> u32 {
    DEFAULT_EXTEND_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExtendLicenseForm {
    #[serde(default = "default_extend_days")]
    #[validate(range(min = 1, message = "Days must be a positive number"))]
    pub days: u32,
}

impl ExtendLicenseForm {
    pub fn into_update(self) -> Result<LicenseUpdate, FormError> {
        self.validate()?;
        Ok(LicenseUpdate::AddDays { days: self.days })
    }
}

// ============================================================================
// Date range
// ============================================================================

/// Inclusive `YYYY-MM-DD` range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start_date: RANGE_START.to_string(),
            end_date: RANGE_END.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRangeForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<String>,
}

impl DateRangeForm {
    /// Fill in defaults and check both dates
    pub fn resolve(&self) -> Result<DateRange, FormError> {
        let start = self.start_date.as_deref().unwrap_or(RANGE_START);
        let end = self.end_date.as_deref().unwrap_or(RANGE_END);
        for date in [start, end] {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate(date.to_string()))?;
        }
        Ok(DateRange {
            start_date: start.to_string(),
            end_date: end.to_string(),
        })
    }
}

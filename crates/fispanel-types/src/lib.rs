//! Fispanel Types - records exchanged with the receipt/license admin API
//!
//! This crate contains the wire types for the admin console with zero
//! dependencies on other fispanel crates:
//!
//! - Licenses, users (devices) and their detail bundles
//! - Sessions, per-company receipt groups and activities
//! - Daily statistics and the "today" summary
//! - Authentication and action response envelopes
//!
//! The console never enforces lifecycle rules; these types only decode what
//! the server sends. Numeric fields are decoded leniently because the API
//! emits Postgres `numeric` columns as strings.

pub mod lenient;
pub mod license;
pub mod user;
pub mod session;
pub mod activity;
pub mod stats;
pub mod auth;
pub mod envelope;

pub use license::*;
pub use user::*;
pub use session::*;
pub use activity::*;
pub use stats::*;
pub use auth::*;
pub use envelope::*;

/// Identifier of a license row
pub type LicenseId = i64;

/// Identifier of a user (device) row
pub type UserId = i64;

/// Identifier of a session row
pub type SessionId = i64;

/// One row of a receipt export, keyed by the server's column titles.
///
/// Key order is the server's column order and is preserved.
pub type ExportRow = serde_json::Map<String, serde_json::Value>;

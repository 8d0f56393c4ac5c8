//! Fispanel Core - console logic shared by the terminal and web front ends
//!
//! Everything in this crate is a pure function of data already fetched from
//! the admin API:
//!
//! - `format`: currency, dates and badge labels
//! - `csv`: client-side CSV conversion of export rows
//! - `sessions`: session filtering and the session drill-down view
//! - `dashboard`: card and chart aggregation
//! - `views`: one view-model builder per console page
//! - `state`: the explicit console state replacing page-level globals
//! - `forms`: typed, validated operator input
//!
//! Builders produce view models; rendering to HTML or terminal text is left
//! to the front ends.

pub mod format;
pub mod csv;
pub mod sessions;
pub mod dashboard;
pub mod views;
pub mod state;
pub mod forms;

pub use csv::convert_to_csv;
pub use dashboard::{DashboardSnapshot, DashboardView};
pub use forms::{
    CreateLicenseForm, DateRange, DateRangeForm, ExtendLicenseForm, FormError, LoginForm,
};
pub use sessions::{filter_sessions, SessionDetailView, SessionFilter};
pub use state::{ConsoleState, Notice, NoticeLevel, Page};

/// First day of the "all time" range used for statistics and exports
pub const RANGE_START: &str = "2024-01-01";

/// Last day of the "all time" range used for statistics and exports
pub const RANGE_END: &str = "2099-12-31";

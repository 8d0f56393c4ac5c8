//! Page view models
//!
//! One builder per console page. Every builder is a pure function of data
//! fetched from the admin API and produces display-ready strings.

use fispanel_types::{
    Activity, CompanySummary, ExportRow, License, LicenseDetails, LicenseId, LicenseStatus,
    Session, User, UserDetails, UserId,
};
use serde_json::Value;

use crate::csv::plain_text;
use crate::dashboard::ChartPoint;
use crate::format::{
    action_label, action_tone, currency_or_dash, format_currency, format_date, format_date_time,
    format_days, online_label, or_dash, status_label, status_tone, Tone, DASH,
};

/// Rows shown on the receipts page
pub const RECEIPT_PAGE_ROWS: usize = 100;

/// Activities requested for the activities page
pub const ACTIVITY_PAGE_LIMIT: usize = 100;

/// Activities shown on a detail page
pub const DETAIL_ACTIVITIES: usize = 20;

/// Sessions shown on the user detail page
pub const DETAIL_SESSIONS: usize = 10;

/// Shown when the activity log is empty
pub const NO_ACTIVITY_YET: &str = "No activity yet";

/// Export columns shown on the receipts page, in display order
pub const RECEIPT_COLUMNS: [&str; 8] = [
    "Yazdırma Zamanı",
    "Fiş No",
    "Firma Adı",
    "Tutar (TL)",
    "KDV Tutarı (TL)",
    "Açıklama",
    "Kasiyer",
    "PC Adı",
];

/// A labelled value of an info grid
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

fn field(label: &'static str, value: impl Into<String>) -> Field {
    Field {
        label,
        value: value.into(),
    }
}

// ============================================================================
// Licenses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LicenseRow {
    pub id: LicenseId,
    pub key: String,
    pub company: String,
    pub status: String,
    pub tone: Tone,
    pub days_remaining: String,
    pub devices: String,
    pub created: String,
}

impl From<&License> for LicenseRow {
    fn from(l: &License) -> Self {
        Self {
            id: l.id,
            key: l.license_key.clone(),
            company: or_dash(l.company_name.as_deref()),
            status: status_label(&l.status).to_string(),
            tone: status_tone(&l.status),
            days_remaining: format_days(Some(l.days_remaining.unwrap_or(0))),
            devices: format!(
                "{} / {}",
                l.active_devices.unwrap_or(0),
                l.max_devices.map_or_else(|| DASH.to_string(), |m| m.to_string())
            ),
            created: format_date(l.created_at.as_deref()),
        }
    }
}

pub fn licenses_table(licenses: &[License]) -> Vec<LicenseRow> {
    licenses.iter().map(LicenseRow::from).collect()
}

/// Per-company receipt statistics row
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyStatRow {
    pub name: String,
    pub receipts: i64,
    pub amount: String,
    pub first_receipt_at: String,
    pub last_receipt_at: String,
}

impl From<&CompanySummary> for CompanyStatRow {
    fn from(c: &CompanySummary) -> Self {
        Self {
            name: or_dash(Some(&c.company_name)),
            receipts: c.receipt_count,
            amount: format_currency(c.total_amount),
            first_receipt_at: format_date_time(c.first_receipt_date.as_deref()),
            last_receipt_at: format_date_time(c.last_receipt_date.as_deref()),
        }
    }
}

/// Activity entry of a detail page
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub label: String,
    pub tone: Tone,
    pub details: String,
    pub pc_name: Option<String>,
    pub company: Option<String>,
    pub amount: Option<String>,
    pub at: String,
}

impl From<&Activity> for ActivityEntry {
    fn from(a: &Activity) -> Self {
        Self {
            label: action_label(&a.action_type).to_string(),
            tone: action_tone(&a.action_type),
            details: or_dash(a.action_details.as_deref()),
            pc_name: a.pc_name.clone().filter(|s| !s.is_empty()),
            company: a.company_name.clone().filter(|s| !s.is_empty()),
            amount: a.amount.filter(|v| *v != 0.0).map(format_currency),
            at: format_date_time(a.created_at.as_deref()),
        }
    }
}

fn recent_activities(activities: &[Activity]) -> Vec<ActivityEntry> {
    activities
        .iter()
        .take(DETAIL_ACTIVITIES)
        .map(ActivityEntry::from)
        .collect()
}

/// License drill-down
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseDetailView {
    pub id: LicenseId,
    pub key: String,
    pub company: String,
    pub status: String,
    pub tone: Tone,
    pub suspended: bool,
    pub info: Vec<Field>,
    pub users: Vec<UserRow>,
    pub companies: Vec<CompanyStatRow>,
    /// Daily series, oldest first
    pub daily: Vec<ChartPoint>,
    pub activities: Vec<ActivityEntry>,
}

impl LicenseDetailView {
    pub fn build(details: &LicenseDetails) -> Self {
        let l = &details.license;
        let info = vec![
            field("License key", l.license_key.clone()),
            field("Company", or_dash(l.company_name.as_deref())),
            field("E-mail", or_dash(l.contact_email.as_deref())),
            field("Phone", or_dash(l.contact_phone.as_deref())),
            field("Status", status_label(&l.status)),
            field("Days remaining", format_days(l.days_remaining)),
            field("Expires", format_date(l.expires_at.as_deref())),
            field(
                "Max devices",
                l.max_devices.map_or_else(|| DASH.to_string(), |m| m.to_string()),
            ),
            field("Notes", or_dash(l.notes.as_deref())),
        ];

        let daily = details
            .daily_stats
            .iter()
            .rev()
            .map(|s| ChartPoint {
                label: format_date(s.stat_date.as_deref()),
                receipts: s.receipts,
                amount: s.amount,
            })
            .collect();

        Self {
            id: l.id,
            key: l.license_key.clone(),
            company: or_dash(l.company_name.as_deref()),
            status: status_label(&l.status).to_string(),
            tone: status_tone(&l.status),
            suspended: matches!(l.status, LicenseStatus::Suspended),
            info,
            users: users_table(&details.users),
            companies: details.companies.iter().map(CompanyStatRow::from).collect(),
            daily,
            activities: recent_activities(&details.activities),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: UserId,
    pub pc_name: String,
    pub license_key: String,
    pub online: bool,
    pub online_label: &'static str,
    pub receipts: i64,
    pub amount: String,
    pub last_seen: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            pc_name: or_dash(u.pc_name.as_deref()),
            license_key: or_dash(u.license_key.as_deref()),
            online: u.is_online,
            online_label: online_label(u.is_online),
            receipts: u.total_receipts.unwrap_or(0),
            amount: format_currency(u.total_amount.unwrap_or(0.0)),
            last_seen: format_date_time(u.last_seen.as_deref()),
        }
    }
}

pub fn users_table(users: &[User]) -> Vec<UserRow> {
    users.iter().map(UserRow::from).collect()
}

/// Session history row of the user drill-down
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHistoryRow {
    pub id: i64,
    pub started: String,
    /// `None` while still running
    pub ended: Option<String>,
    pub receipts: i64,
    pub amount: String,
    pub status: String,
    pub active: bool,
}

impl From<&Session> for SessionHistoryRow {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id,
            started: format_date_time(s.session_start.as_deref()),
            ended: s
                .session_end
                .as_deref()
                .filter(|e| !e.is_empty())
                .map(|e| format_date_time(Some(e))),
            receipts: s.total_receipts.unwrap_or(0),
            amount: format_currency(s.total_amount.unwrap_or(0.0)),
            status: or_dash(Some(&s.status)),
            active: s.is_active(),
        }
    }
}

/// User drill-down
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetailView {
    pub id: UserId,
    pub pc_name: String,
    pub info: Vec<Field>,
    pub online: bool,
    pub sessions: Vec<SessionHistoryRow>,
    pub companies: Vec<CompanyStatRow>,
    pub activities: Vec<ActivityEntry>,
}

impl UserDetailView {
    pub fn build(details: &UserDetails) -> Self {
        let row = UserRow::from(&details.user);
        let info = vec![
            field("PC name", row.pc_name.clone()),
            field("License", row.license_key.clone()),
            field("Status", row.online_label),
            field("Total receipts", row.receipts.to_string()),
            field("Total amount", row.amount.clone()),
            field("Last seen", row.last_seen.clone()),
        ];
        Self {
            id: row.id,
            pc_name: row.pc_name,
            info,
            online: row.online,
            sessions: details
                .sessions
                .iter()
                .take(DETAIL_SESSIONS)
                .map(SessionHistoryRow::from)
                .collect(),
            companies: details.companies.iter().map(CompanyStatRow::from).collect(),
            activities: recent_activities(&details.activities),
        }
    }
}

// ============================================================================
// Receipts
// ============================================================================

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => DASH.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => plain_text(other),
    }
}

/// One displayed receipt, cells in [`RECEIPT_COLUMNS`] order
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRow {
    pub cells: Vec<String>,
}

impl From<&ExportRow> for ReceiptRow {
    fn from(row: &ExportRow) -> Self {
        let cells = RECEIPT_COLUMNS
            .iter()
            .map(|col| {
                let text = cell_text(row.get(*col));
                if col.ends_with("(TL)") && text != DASH {
                    format!("{text} ₺")
                } else {
                    text
                }
            })
            .collect();
        Self { cells }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptsView {
    pub start_date: String,
    pub end_date: String,
    /// Rows returned by the server for the range
    pub total: usize,
    /// At most [`RECEIPT_PAGE_ROWS`] of them
    pub rows: Vec<ReceiptRow>,
}

impl ReceiptsView {
    pub fn build(rows: &[ExportRow], start_date: &str, end_date: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            total: rows.len(),
            rows: rows
                .iter()
                .take(RECEIPT_PAGE_ROWS)
                .map(ReceiptRow::from)
                .collect(),
        }
    }
}

// ============================================================================
// Activities
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub at: String,
    pub label: String,
    pub tone: Tone,
    pub details: String,
    pub company: String,
    pub receipt_no: String,
    pub amount: String,
}

impl From<&Activity> for ActivityRow {
    fn from(a: &Activity) -> Self {
        Self {
            at: format_date_time(a.created_at.as_deref()),
            label: action_label(&a.action_type).to_string(),
            tone: action_tone(&a.action_type),
            details: or_dash(a.action_details.as_deref()),
            company: or_dash(a.company_name.as_deref()),
            receipt_no: or_dash(a.receipt_no.as_deref()),
            amount: currency_or_dash(a.amount),
        }
    }
}

pub fn activities_table(activities: &[Activity]) -> Vec<ActivityRow> {
    activities.iter().map(ActivityRow::from).collect()
}

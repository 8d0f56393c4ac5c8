//! Session drill-down
//!
//! The sessions page fetches the full session list once and filters it
//! locally by license and user. Selecting a session loads its detail bundle,
//! which is turned into a [`SessionDetailView`] here.

use fispanel_types::{
    Activity, CompanySummary, License, LicenseId, Session, SessionDetails, SessionId,
    SessionReceipt, User, UserId,
};
use serde::{Deserialize, Serialize};

use crate::csv::session_file_name;
use crate::format::{
    action_label, action_tone, format_currency, format_date_time, format_time, or_dash,
    session_status_label, Tone, DASH,
};

/// Shown when a session printed nothing
pub const NO_RECEIPTS: &str = "No receipts in this session";

/// Shown when a session has no activity
pub const NO_ACTIVITY: &str = "No activity";

/// Shown when the filtered list is empty
pub const NO_SESSIONS: &str = "No sessions found";

const KEY_PREFIX_LEN: usize = 15;

/// Local filter over the cached session list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFilter {
    #[serde(default)]
    pub license_id: Option<LicenseId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl SessionFilter {
    pub fn is_empty(&self) -> bool {
        self.license_id.is_none() && self.user_id.is_none()
    }

    pub fn matches(&self, session: &Session) -> bool {
        self.license_id.map_or(true, |id| session.license_id == Some(id))
            && self.user_id.map_or(true, |id| session.user_id == Some(id))
    }
}

/// Sessions matching `filter`, in their original order
pub fn filter_sessions<'a>(all: &'a [Session], filter: &SessionFilter) -> Vec<&'a Session> {
    all.iter().filter(|s| filter.matches(s)).collect()
}

/// One entry of a filter dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}

/// License dropdown entries, alphabetical by company name
pub fn license_options(licenses: &[License], selected: Option<LicenseId>) -> Vec<FilterOption> {
    let mut sorted: Vec<&License> = licenses.iter().collect();
    sorted.sort_by_cached_key(|l| l.company_name.as_deref().unwrap_or("").to_lowercase());

    sorted
        .into_iter()
        .map(|l| {
            let prefix: String = l.license_key.chars().take(KEY_PREFIX_LEN).collect();
            FilterOption {
                value: l.id,
                label: format!("{} ({prefix}...)", or_dash(l.company_name.as_deref())),
                selected: selected == Some(l.id),
            }
        })
        .collect()
}

/// User dropdown entries, in server order
pub fn user_options(users: &[User], selected: Option<UserId>) -> Vec<FilterOption> {
    users
        .iter()
        .map(|u| FilterOption {
            value: u.id,
            label: or_dash(u.pc_name.as_deref()),
            selected: selected == Some(u.id),
        })
        .collect()
}

/// One row of the session list
#[derive(Debug, Clone, PartialEq)]
pub struct SessionListItem {
    pub id: SessionId,
    pub pc_name: String,
    pub active: bool,
    pub status: &'static str,
    pub started: String,
    pub receipts: i64,
    pub amount: String,
    pub selected: bool,
}

pub fn session_list(sessions: &[&Session], current: Option<SessionId>) -> Vec<SessionListItem> {
    sessions
        .iter()
        .map(|s| SessionListItem {
            id: s.id,
            pc_name: s.pc_name.clone().unwrap_or_else(|| "Unknown".to_string()),
            active: s.is_active(),
            status: session_status_label(s.is_active()),
            started: format_date_time(s.session_start.as_deref()),
            receipts: s.total_receipts.unwrap_or(0),
            amount: format_currency(s.total_amount.unwrap_or(0.0)),
            selected: current == Some(s.id),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub pc_name: String,
    pub started: String,
    /// End time, or `None` while the session is still running
    pub ended: Option<String>,
    pub total_receipts: i64,
    pub total_amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub receipt_no: String,
    pub amount: String,
    pub tax_base: String,
    pub vat_rate: String,
    pub vat_amount: String,
}

impl From<&SessionReceipt> for ReceiptLine {
    fn from(r: &SessionReceipt) -> Self {
        Self {
            receipt_no: or_dash(r.receipt_no.as_deref()),
            amount: format_currency(r.amount),
            tax_base: format_currency(r.tax_base()),
            vat_rate: format_rate(r.vat_rate),
            vat_amount: format_currency(r.vat_amount),
        }
    }
}

/// Receipts of one company within the session
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyGroup {
    pub name: String,
    pub receipt_count: i64,
    pub total_amount: String,
    /// `first - last` receipt number
    pub receipt_range: String,
    pub receipts: Vec<ReceiptLine>,
}

impl From<&CompanySummary> for CompanyGroup {
    fn from(c: &CompanySummary) -> Self {
        Self {
            name: or_dash(Some(&c.company_name)),
            receipt_count: c.receipt_count,
            total_amount: format_currency(c.total_amount),
            receipt_range: format!(
                "{} - {}",
                c.first_receipt.as_deref().unwrap_or(DASH),
                c.last_receipt.as_deref().unwrap_or(DASH)
            ),
            receipts: c.receipts.iter().map(ReceiptLine::from).collect(),
        }
    }
}

/// One entry of a compact activity feed
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLine {
    pub label: String,
    pub tone: Tone,
    pub time: String,
    pub details: String,
}

impl From<&Activity> for ActivityLine {
    fn from(a: &Activity) -> Self {
        Self {
            label: action_label(&a.action_type).to_string(),
            tone: action_tone(&a.action_type),
            time: format_time(a.created_at.as_deref()),
            details: or_dash(a.action_details.as_deref()),
        }
    }
}

/// Everything the drill-down panel shows for one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetailView {
    pub summary: SessionSummary,
    pub companies: Vec<CompanyGroup>,
    pub activities: Vec<ActivityLine>,
    pub export_file_name: String,
}

impl SessionDetailView {
    pub fn build(details: &SessionDetails) -> Self {
        let session = &details.session;
        Self {
            summary: SessionSummary {
                id: session.id,
                pc_name: or_dash(session.pc_name.as_deref()),
                started: format_date_time(session.session_start.as_deref()),
                ended: session
                    .session_end
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|s| format_date_time(Some(s))),
                total_receipts: session.total_receipts.unwrap_or(0),
                total_amount: format_currency(session.total_amount.unwrap_or(0.0)),
            },
            companies: details.companies.iter().map(CompanyGroup::from).collect(),
            activities: details.activities.iter().map(ActivityLine::from).collect(),
            export_file_name: session_file_name(session.id),
        }
    }
}

/// VAT rate without a trailing `.0`
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{}", rate as i64)
    } else {
        rate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fispanel_types::LicenseStatus;

    fn session(id: SessionId, license_id: LicenseId, user_id: UserId) -> Session {
        Session {
            id,
            license_id: Some(license_id),
            user_id: Some(user_id),
            pc_name: Some(format!("KASA-{id}")),
            session_start: None,
            session_end: None,
            total_receipts: None,
            total_amount: None,
            status: "ended".to_string(),
        }
    }

    fn license(id: LicenseId, company: Option<&str>, key: &str) -> License {
        License {
            id,
            license_key: key.to_string(),
            company_name: company.map(str::to_string),
            contact_email: None,
            contact_phone: None,
            status: LicenseStatus::Active,
            days_remaining: None,
            max_devices: None,
            active_devices: None,
            created_at: None,
            expires_at: None,
            notes: None,
        }
    }

    fn ids(sessions: &[&Session]) -> Vec<SessionId> {
        sessions.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_filter_by_license() {
        let all = vec![session(1, 5, 10), session(2, 7, 11)];
        let filter = SessionFilter {
            license_id: Some(5),
            user_id: None,
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec![1]);
    }

    #[test]
    fn test_filter_intersection() {
        let all = vec![session(1, 5, 10), session(2, 5, 11), session(3, 7, 10)];
        let filter = SessionFilter {
            license_id: Some(5),
            user_id: Some(10),
        };
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec![1]);
    }

    #[test]
    fn test_no_filter_keeps_everything_in_order() {
        let all = vec![session(3, 7, 10), session(1, 5, 10), session(2, 5, 11)];
        let filter = SessionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter_sessions(&all, &filter)), vec![3, 1, 2]);
    }

    #[test]
    fn test_session_without_license_never_matches_license_filter() {
        let mut orphan = session(4, 5, 10);
        orphan.license_id = None;
        let filter = SessionFilter {
            license_id: Some(5),
            user_id: None,
        };
        assert!(!filter.matches(&orphan));
    }

    #[test]
    fn test_license_options_sorted_and_labelled() {
        let licenses = vec![
            license(1, Some("Zeta Gıda"), "FIS-1111-2222-3333-4444"),
            license(2, None, "FIS-AAAA"),
            license(3, Some("acme"), "FIS-5555-6666-7777-8888"),
        ];
        let options = license_options(&licenses, Some(3));
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "- (FIS-AAAA...)",
                "acme (FIS-5555-6666-7...)",
                "Zeta Gıda (FIS-1111-2222-3...)"
            ]
        );
        assert!(options[1].selected);
        assert!(!options[0].selected);
    }

    #[test]
    fn test_list_marks_selected() {
        let all = vec![session(1, 5, 10), session(2, 7, 11)];
        let refs: Vec<&Session> = all.iter().collect();
        let items = session_list(&refs, Some(2));
        assert!(!items[0].selected);
        assert!(items[1].selected);
        assert_eq!(items[1].amount, "0,00 ₺");
        assert_eq!(items[1].status, "Ended");
    }

    #[test]
    fn test_detail_view() {
        let details: SessionDetails = serde_json::from_str(
            r#"{
                "success": true,
                "session": {"id": 9, "pc_name": "KASA-1", "session_start": "2025-02-01T09:00:00",
                            "session_end": null, "total_receipts": "2", "total_amount": "240", "status": "active"},
                "companies": [{
                    "company_name": "Acme",
                    "receipt_count": 2,
                    "total_amount": "240.00",
                    "first_receipt": "A-1",
                    "last_receipt": "A-2",
                    "receipts": [
                        {"receipt_no": "A-1", "amount": "120", "vat_amount": "20", "vat_rate": "20"},
                        {"receipt_no": "A-2", "amount": 110, "vat_amount": 10, "vat_rate": 10}
                    ]
                }],
                "activities": [
                    {"action_type": "receipt_print", "created_at": "2025-02-01T09:15:00"}
                ]
            }"#,
        )
        .unwrap();

        let view = SessionDetailView::build(&details);
        assert_eq!(view.summary.ended, None);
        assert_eq!(view.summary.total_receipts, 2);
        assert_eq!(view.summary.total_amount, "240,00 ₺");

        let group = &view.companies[0];
        assert_eq!(group.receipt_range, "A-1 - A-2");
        assert_eq!(group.receipts[0].tax_base, "100,00 ₺");
        assert_eq!(group.receipts[0].vat_rate, "20");
        assert_eq!(group.receipts[1].vat_amount, "10,00 ₺");

        assert_eq!(view.activities[0].time, "09:15");
        assert_eq!(view.activities[0].details, "-");
        assert_eq!(view.activities[0].tone, Tone::Primary);
        assert_eq!(view.export_file_name, "oturum_9_fisler.csv");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(20.0), "20");
        assert_eq!(format_rate(8.5), "8.5");
    }
}

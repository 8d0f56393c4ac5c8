//! Display formatting
//!
//! Currency uses Turkish grouping (`1.234,56 ₺`). Timestamps carrying an
//! offset are shown in local time; naive timestamps are shown as written.
//! Input that cannot be parsed is returned verbatim, missing input becomes
//! `-`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use fispanel_types::{ActionType, LicenseStatus};

/// Placeholder for a missing value
pub const DASH: &str = "-";

const CURRENCY_SUFFIX: &str = " ₺";

/// Format an amount as `1.234.567,89 ₺`
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}{CURRENCY_SUFFIX}")
}

/// Compact amount for stat cards: `2.5M ₺`, `12.3K ₺`, `950.00 ₺`
pub fn format_currency_short(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("{:.1}M{CURRENCY_SUFFIX}", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}K{CURRENCY_SUFFIX}", amount / 1_000.0)
    } else {
        format!("{amount:.2}{CURRENCY_SUFFIX}")
    }
}

/// Width multiplier for a stat card showing `amount`
pub fn card_scale(amount: f64) -> f32 {
    if amount >= 10_000_000.0 {
        1.3
    } else if amount >= 1_000_000.0 {
        1.2
    } else if amount >= 100_000.0 {
        1.1
    } else {
        1.0
    }
}

/// Parse the timestamp shapes the API emits
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn format_with(value: Option<&str>, pattern: &str) -> String {
    match value.filter(|s| !s.is_empty()) {
        None => DASH.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(ts) => ts.format(pattern).to_string(),
            None => raw.to_string(),
        },
    }
}

/// `dd.mm.yyyy`
pub fn format_date(value: Option<&str>) -> String {
    format_with(value, "%d.%m.%Y")
}

/// `dd.mm.yyyy HH:MM:SS`
pub fn format_date_time(value: Option<&str>) -> String {
    format_with(value, "%d.%m.%Y %H:%M:%S")
}

/// `HH:MM`
pub fn format_time(value: Option<&str>) -> String {
    format_with(value, "%H:%M")
}

/// Today's UTC date as `YYYY-MM-DD`
///
/// Stat days are keyed by UTC date, so the keys are too.
pub fn today_key() -> String {
    day_key(Utc::now())
}

/// The current UTC month as `YYYY-MM`
pub fn month_key() -> String {
    month_of(Utc::now())
}

pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn month_of(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Badge colour class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Primary,
    Info,
    Warning,
    Secondary,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Primary => "primary",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Secondary => "secondary",
        }
    }
}

pub fn status_label(status: &LicenseStatus) -> &str {
    match status {
        LicenseStatus::Active => "Active",
        LicenseStatus::Expired => "Expired",
        LicenseStatus::Suspended => "Suspended",
        LicenseStatus::Other(s) => s,
    }
}

pub fn status_tone(status: &LicenseStatus) -> Tone {
    match status {
        LicenseStatus::Active => Tone::Success,
        LicenseStatus::Suspended => Tone::Warning,
        _ => Tone::Danger,
    }
}

pub fn action_label(action: &ActionType) -> &str {
    match action {
        ActionType::Login => "Login",
        ActionType::Logout => "Logout",
        ActionType::ReceiptPrint => "Receipt",
        ActionType::CompanyAdd => "Company added",
        ActionType::CompanyEdit => "Company edited",
        ActionType::CompanyDelete => "Company deleted",
        ActionType::ExcelExport => "Excel export",
        ActionType::Other(s) => s,
    }
}

pub fn action_tone(action: &ActionType) -> Tone {
    match action {
        ActionType::Login => Tone::Success,
        ActionType::Logout | ActionType::CompanyDelete => Tone::Danger,
        ActionType::ReceiptPrint => Tone::Primary,
        ActionType::CompanyAdd | ActionType::ExcelExport => Tone::Info,
        ActionType::CompanyEdit => Tone::Warning,
        ActionType::Other(_) => Tone::Secondary,
    }
}

pub fn online_label(is_online: bool) -> &'static str {
    if is_online {
        "Online"
    } else {
        "Offline"
    }
}

pub fn session_status_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Ended"
    }
}

/// `N days`, or `-` when unknown
pub fn format_days(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(n) => format!("{n} days"),
        None => DASH.to_string(),
    }
}

/// Optional text, `-` when missing or empty
pub fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or(DASH)
        .to_string()
}

/// Optional amount, `-` when missing or zero
pub fn currency_or_dash(amount: Option<f64>) -> String {
    match amount {
        Some(a) if a != 0.0 => format_currency(a),
        _ => DASH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_keys_use_utc_date() {
        let late = Utc.with_ymd_and_hms(2025, 3, 31, 23, 30, 0).unwrap();
        assert_eq!(day_key(late), "2025-03-31");
        assert_eq!(month_of(late), "2025-03");

        let early = Utc.with_ymd_and_hms(2025, 4, 1, 0, 15, 0).unwrap();
        assert_eq!(day_key(early), "2025-04-01");
        assert_eq!(month_of(early), "2025-04");
    }

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(0.0), "0,00 ₺");
        assert_eq!(format_currency(5.5), "5,50 ₺");
        assert_eq!(format_currency(1234.5), "1.234,50 ₺");
        assert_eq!(format_currency(1234567.891), "1.234.567,89 ₺");
        assert_eq!(format_currency(100000.0), "100.000,00 ₺");
    }

    #[test]
    fn test_currency_sign() {
        assert_eq!(format_currency(-1234.5), "-1.234,50 ₺");
        assert_eq!(format_currency(-0.001), "0,00 ₺");
    }

    #[test]
    fn test_currency_always_two_decimals() {
        for amount in [0.1, 7.0, 99.999, 12345678.0, 0.005] {
            let text = format_currency(amount);
            assert!(text.ends_with(" ₺"), "{text}");
            let body = text.trim_end_matches(" ₺");
            let (_, decimals) = body.rsplit_once(',').unwrap();
            assert_eq!(decimals.len(), 2, "{text}");
        }
    }

    #[test]
    fn test_currency_short() {
        assert_eq!(format_currency_short(2_500_000.0), "2.5M ₺");
        assert_eq!(format_currency_short(12_340.0), "12.3K ₺");
        assert_eq!(format_currency_short(950.0), "950.00 ₺");
    }

    #[test]
    fn test_card_scale() {
        assert_eq!(card_scale(50.0), 1.0);
        assert_eq!(card_scale(100_000.0), 1.1);
        assert_eq!(card_scale(2_000_000.0), 1.2);
        assert_eq!(card_scale(10_000_000.0), 1.3);
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date(Some("2025-03-09")), "09.03.2025");
        assert_eq!(format_date(Some("2025-03-09T14:05:00")), "09.03.2025");
        assert_eq!(format_date_time(Some("2025-03-09 14:05:07")), "09.03.2025 14:05:07");
        assert_eq!(format_time(Some("2025-03-09T08:30:00.123")), "08:30");
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some("")), "-");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_zoned_timestamp_uses_local_time() {
        let raw = "2025-03-09T11:05:00Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .format("%d.%m.%Y %H:%M:%S")
            .to_string();
        assert_eq!(format_date_time(Some(raw)), expected);
    }

    #[test]
    fn test_labels() {
        assert_eq!(status_label(&LicenseStatus::Suspended), "Suspended");
        assert_eq!(status_label(&LicenseStatus::Other("trial".into())), "trial");
        assert_eq!(action_tone(&ActionType::CompanyEdit), Tone::Warning);
        assert_eq!(action_tone(&ActionType::Other("sync".into())).as_str(), "secondary");
        assert_eq!(action_label(&ActionType::ReceiptPrint), "Receipt");
        assert_eq!(format_days(Some(30)), "30 days");
        assert_eq!(currency_or_dash(Some(0.0)), "-");
    }
}

//! Daily statistics

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Receipt totals for one calendar day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatDay {
    /// `YYYY-MM-DD`, possibly with a time suffix
    #[serde(default)]
    pub stat_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub receipts: i64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
}

/// The `today` block of the dashboard summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TodayTotals {
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub total_receipts: i64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_amount: f64,
}

/// Response of `GET /api/admin/dashboard/today`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TodaySummary {
    #[serde(default)]
    pub today: Option<TodayTotals>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub active_sessions: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_day_from_numeric_strings() {
        let day: StatDay =
            serde_json::from_str(r#"{"stat_date":"2025-03-02","receipts":"14","amount":"1520.40"}"#)
                .unwrap();
        assert_eq!(day.receipts, 14);
        assert_eq!(day.amount, 1520.4);
    }

    #[test]
    fn test_today_summary_without_block() {
        let summary: TodaySummary = serde_json::from_str(r#"{"active_sessions":"2"}"#).unwrap();
        assert!(summary.today.is_none());
        assert_eq!(summary.active_sessions, Some(2));
    }
}

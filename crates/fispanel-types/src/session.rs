//! Session records and the session drill-down bundle
//!
//! A session is one continuous period of a device actively using a licensed
//! installation. The drill-down groups the receipts printed during the
//! session by the company they were printed for.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::{Activity, ExportRow, LicenseId, SessionId, UserId};

/// A session row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub license_id: Option<LicenseId>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub pc_name: Option<String>,
    #[serde(default)]
    pub session_start: Option<String>,
    #[serde(default)]
    pub session_end: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub total_receipts: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub status: String,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// One printed receipt inside a company group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReceipt {
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub receipt_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub vat_amount: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub vat_rate: f64,
}

impl SessionReceipt {
    /// Amount before VAT
    pub fn tax_base(&self) -> f64 {
        self.amount - self.vat_amount
    }
}

/// Per-company receipt statistics
///
/// The license, user and session drill-downs all report this shape; the
/// license endpoint calls the count `total_receipts`, the others
/// `receipt_count`. Only the session drill-down nests `receipts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub company_name: String,
    #[serde(default, alias = "total_receipts", deserialize_with = "lenient::i64_or_zero")]
    pub receipt_count: i64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub first_receipt: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub last_receipt: Option<String>,
    #[serde(default)]
    pub first_receipt_date: Option<String>,
    #[serde(default)]
    pub last_receipt_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub receipts: Vec<SessionReceipt>,
}

/// Response of `GET /api/admin/sessions/:id/details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub success: bool,
    pub session: Session,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub companies: Vec<CompanySummary>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub activities: Vec<Activity>,
}

/// Response of `GET /api/admin/sessions/:id/export`
///
/// `data` maps a VAT group title (`"KDV %10"`, `"KDV %20"`, ...) to the rows
/// of that group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionExport {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SessionExport {
    /// All rows of every VAT group, in the server's group order
    pub fn rows(&self) -> Vec<ExportRow> {
        let Some(groups) = &self.data else {
            return Vec::new();
        };
        groups
            .values()
            .filter_map(|group| group.as_array())
            .flatten()
            .filter_map(|row| row.as_object().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_base() {
        let receipt = SessionReceipt {
            receipt_no: Some("A-17".to_string()),
            amount: 120.0,
            vat_amount: 20.0,
            vat_rate: 20.0,
        };
        assert_eq!(receipt.tax_base(), 100.0);
    }

    #[test]
    fn test_company_count_alias() {
        let from_license: CompanySummary =
            serde_json::from_str(r#"{"company_name":"Acme","total_receipts":"4","total_amount":"10.5"}"#)
                .unwrap();
        let from_session: CompanySummary =
            serde_json::from_str(r#"{"company_name":"Acme","receipt_count":4,"total_amount":10.5}"#)
                .unwrap();
        assert_eq!(from_license.receipt_count, 4);
        assert_eq!(from_license, from_session);
    }

    #[test]
    fn test_export_rows_keep_group_order() {
        let export: SessionExport = serde_json::from_str(
            r#"{
                "success": true,
                "data": {
                    "KDV %10": [{"Fiş No": "1"}],
                    "KDV %20": [{"Fiş No": "2"}, {"Fiş No": "3"}]
                }
            }"#,
        )
        .unwrap();
        let numbers: Vec<_> = export
            .rows()
            .iter()
            .map(|row| row["Fiş No"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_details_with_null_fields() {
        let details: SessionDetails = serde_json::from_str(
            r#"{
                "success": true,
                "session": {"id": 4, "status": null},
                "companies": [{"company_name": null, "receipt_count": 1, "receipts": null}],
                "activities": [{"action_type": null}]
            }"#,
        )
        .unwrap();
        assert_eq!(details.companies[0].company_name, "");
        assert!(details.companies[0].receipts.is_empty());
        assert_eq!(details.activities.len(), 1);
    }

    #[test]
    fn test_session_status() {
        let session: Session =
            serde_json::from_str(r#"{"id":1,"license_id":"5","status":"active"}"#).unwrap();
        assert!(session.is_active());
        assert_eq!(session.license_id, Some(5));
    }
}

//! Activity log entries

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Kind of a logged activity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Login,
    Logout,
    ReceiptPrint,
    CompanyAdd,
    CompanyEdit,
    CompanyDelete,
    ExcelExport,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::ReceiptPrint => "receipt_print",
            Self::CompanyAdd => "company_add",
            Self::CompanyEdit => "company_edit",
            Self::CompanyDelete => "company_delete",
            Self::ExcelExport => "excel_export",
            Self::Other(s) => s,
        }
    }
}

impl Default for ActionType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ActionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "login" => Self::Login,
            "logout" => Self::Logout,
            "receipt_print" => Self::ReceiptPrint,
            "company_add" => Self::CompanyAdd,
            "company_edit" => Self::CompanyEdit,
            "company_delete" => Self::CompanyDelete,
            "excel_export" => Self::ExcelExport,
            _ => Self::Other(s),
        }
    }
}

impl From<ActionType> for String {
    fn from(action: ActionType) -> Self {
        action.as_str().to_string()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub action_type: ActionType,
    #[serde(default)]
    pub action_details: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub receipt_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub pc_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_actions() {
        let known: ActionType = serde_json::from_str(r#""receipt_print""#).unwrap();
        assert_eq!(known, ActionType::ReceiptPrint);

        let unknown: ActionType = serde_json::from_str(r#""backup""#).unwrap();
        assert_eq!(unknown, ActionType::Other("backup".to_string()));
        assert_eq!(unknown.as_str(), "backup");
    }

    #[test]
    fn test_activity_minimal() {
        let activity: Activity =
            serde_json::from_str(r#"{"action_type":"login","amount":"12.50","receipt_no":88}"#)
                .unwrap();
        assert_eq!(activity.action_type, ActionType::Login);
        assert_eq!(activity.amount, Some(12.5));
        assert_eq!(activity.receipt_no.as_deref(), Some("88"));
        assert!(activity.created_at.is_none());
    }
}

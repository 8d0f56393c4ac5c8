//! Lenient decoding
//!
//! The admin API sends aggregates as JSON numbers or as numeric strings
//! depending on the query that produced them. These helpers accept both, and
//! fall back to zero (or `None`) for anything else. Flags, labels and nested
//! lists may also arrive as an explicit `null`, which decodes to the default.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Decode `null` as `T::default()`
///
/// `#[serde(default)]` alone only covers a missing key.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode a number or numeric string, defaulting to `0.0`
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64).unwrap_or(0.0))
}

/// Decode a number or numeric string, `None` when absent or not numeric
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64))
}

/// Decode an integer or integer string, defaulting to `0`
pub fn i64_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64).unwrap_or(0))
}

/// Decode an integer or integer string, `None` when absent or not numeric
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_i64))
}

/// Decode a value that may be a string or a number into display text
///
/// Receipt numbers are stored as text on some tables and as integers on others.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "f64_or_zero")]
        amount: f64,
        #[serde(default, deserialize_with = "i64_or_zero")]
        count: i64,
        #[serde(default, deserialize_with = "opt_i64")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "opt_text")]
        receipt_no: Option<String>,
    }

    #[test]
    fn test_numbers_and_strings() {
        let p: Probe = serde_json::from_str(
            r#"{"amount":"1250.75","count":"12","id":7,"receipt_no":1042}"#,
        )
        .unwrap();
        assert_eq!(p.amount, 1250.75);
        assert_eq!(p.count, 12);
        assert_eq!(p.id, Some(7));
        assert_eq!(p.receipt_no.as_deref(), Some("1042"));
    }

    #[test]
    fn test_missing_and_garbage_fall_back() {
        let p: Probe = serde_json::from_str(r#"{"amount":null,"count":"n/a","id":"x"}"#).unwrap();
        assert_eq!(p.amount, 0.0);
        assert_eq!(p.count, 0);
        assert_eq!(p.id, None);
        assert_eq!(p.receipt_no, None);
    }

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "null_default")]
        online: bool,
        #[serde(default, deserialize_with = "null_default")]
        status: String,
        #[serde(default, deserialize_with = "null_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_null_takes_default() {
        let f: Flags = serde_json::from_str(r#"{"online":null,"status":null,"tags":null}"#).unwrap();
        assert!(!f.online);
        assert_eq!(f.status, "");
        assert!(f.tags.is_empty());

        let f: Flags = serde_json::from_str(r#"{"online":true,"status":"active"}"#).unwrap();
        assert!(f.online);
        assert_eq!(f.status, "active");
    }

    #[test]
    fn test_null_flag_in_list_keeps_rows() {
        let users: Vec<crate::User> =
            serde_json::from_str(r#"[{"id":1,"is_online":null},{"id":2,"is_online":true}]"#).unwrap();
        assert_eq!(users.len(), 2);
        assert!(!users[0].is_online);

        let sessions: Vec<crate::Session> =
            serde_json::from_str(r#"[{"id":1,"status":null}]"#).unwrap();
        assert_eq!(sessions[0].status, "");

        let licenses: Vec<crate::License> =
            serde_json::from_str(r#"[{"id":1,"license_key":"FIS-1","status":null}]"#).unwrap();
        assert_eq!(licenses[0].status, crate::LicenseStatus::default());
    }

    #[test]
    fn test_fractional_count_truncates() {
        let p: Probe = serde_json::from_str(r#"{"count":"3.9"}"#).unwrap();
        assert_eq!(p.count, 3);
    }
}

//! Client-side CSV conversion of export rows
//!
//! The header is taken from the keys of the first row. A string value is
//! wrapped in double quotes only when it contains a comma; any double quote
//! inside such a value is doubled. Null and missing values are empty.

use fispanel_types::{ExportRow, SessionId};
use serde_json::Value;

/// Convert export rows to CSV text, `\n` separated, no trailing newline
pub fn convert_to_csv(rows: &[ExportRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| cell(row.get(h.as_str())))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) if s.contains(',') => format!("\"{}\"", s.replace('"', "\"\"")),
        Some(Value::String(s)) => s.clone(),
        Some(other) => plain_text(other),
    }
}

/// Non-string JSON as plain text; whole floats lose their `.0`
pub(crate) fn plain_text(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Download name of a receipt range export
pub fn receipts_file_name(start_date: &str, end_date: &str) -> String {
    format!("fisler_{start_date}_{end_date}.csv")
}

/// Download name of a session export
pub fn session_file_name(session_id: SessionId) -> String {
    format!("oturum_{session_id}_fisler.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: Value) -> Vec<ExportRow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(convert_to_csv(&[]), "");
    }

    #[test]
    fn test_comma_values_are_quoted() {
        let data = rows(json!([{"a": "1,2", "b": "x"}]));
        assert_eq!(convert_to_csv(&data), "a,b\n\"1,2\",x");
    }

    #[test]
    fn test_header_from_first_row_in_server_order() {
        let data = rows(json!([
            {"Fiş No": "10", "Tutar (TL)": 120.5, "Açıklama": null},
            {"Fiş No": "11", "Tutar (TL)": 80, "Kasiyer": "Ayşe"}
        ]));
        assert_eq!(
            convert_to_csv(&data),
            "Fiş No,Tutar (TL),Açıklama\n10,120.5,\n11,80,"
        );
    }

    #[test]
    fn test_quotes_inside_quoted_value() {
        let data = rows(json!([{"name": "Acme, \"Ltd\""}]));
        assert_eq!(convert_to_csv(&data), "name\n\"Acme, \"\"Ltd\"\"\"");
    }

    #[test]
    fn test_quote_without_comma_is_raw() {
        let data = rows(json!([{"name": "5\" pipe", "ok": true}]));
        assert_eq!(convert_to_csv(&data), "name,ok\n5\" pipe,true");
    }

    #[test]
    fn test_whole_floats_drop_fraction() {
        let rows = rows(json!([{"amount": 120.0, "vat": 21.6, "count": 3, "paid": true}]));
        assert_eq!(convert_to_csv(&rows), "amount,vat,count,paid\n120,21.6,3,true");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            receipts_file_name("2025-01-01", "2025-01-31"),
            "fisler_2025-01-01_2025-01-31.csv"
        );
        assert_eq!(session_file_name(42), "oturum_42_fisler.csv");
    }
}

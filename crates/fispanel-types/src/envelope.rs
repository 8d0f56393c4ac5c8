//! Response envelopes

use serde::{Deserialize, Serialize};

use crate::lenient;

/// `{ "data": ... }` wrapper used by the list and export endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Answer of the mutating endpoints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Answer of `POST /api/admin/licenses/create`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatedLicense {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub success: bool,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::License;

    #[test]
    fn test_list_envelope() {
        let env: DataEnvelope<Vec<License>> = serde_json::from_str(
            r#"{"data":[{"id":1,"license_key":"K1","status":"active"}]}"#,
        )
        .unwrap();
        assert_eq!(env.data.len(), 1);
        assert!(env.data[0].status.is_active());
    }

    #[test]
    fn test_action_response_defaults() {
        let resp: ActionResponse = serde_json::from_str("{}").unwrap();
        assert!(!resp.success);
        assert!(resp.error.is_none());
    }
}

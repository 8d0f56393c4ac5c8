//! Credential file round trips

use fispanel_client::{CredentialStore, Credentials};
use fispanel_types::UserProfile;

fn credentials() -> Credentials {
    let mut user = UserProfile {
        username: "admin".to_string(),
        ..Default::default()
    };
    user.extra.insert("role".to_string(), serde_json::json!("owner"));
    Credentials {
        token: "tok-123".to_string(),
        user,
    }
}

#[test]
fn test_missing_file_is_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    assert!(store.load().unwrap().is_none());
    store.clear().unwrap();
}

#[test]
fn test_save_load_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("nested").join("credentials.json"));

    store.save(&credentials()).unwrap();
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, credentials());

    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_file_holds_exactly_two_string_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.json"));
    store.save(&credentials()).unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["token"], "tok-123");
    let user: serde_json::Value =
        serde_json::from_str(object["user"].as_str().unwrap()).unwrap();
    assert_eq!(user["username"], "admin");
}

#[test]
fn test_token_without_user_is_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, r#"{"token":"tok-123"}"#).unwrap();
    assert!(CredentialStore::new(path).load().unwrap().is_none());
}

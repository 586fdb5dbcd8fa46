mod common;

use medicare_hub::auth::{decode_claims, Role};
use medicare_hub::session::{
    CredentialStore, FileCredentialStore, SessionContext, SessionPolicy,
};

fn file_session(path: &std::path::Path) -> SessionContext {
    SessionContext::bootstrap(Box::new(FileCredentialStore::new(path)), SessionPolicy::default())
}

#[test]
fn test_each_role_decodes_to_itself() {
    for role in Role::ALL {
        let claims = decode_claims(&common::token_for(role.as_str())).unwrap();
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_malformed_stored_credentials_resolve_to_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let malformed = [
        "only.two".to_string(),
        "a.b.c.d".to_string(),
        "header.%%%.sig".to_string(),
        common::token_with_payload("\"just a string\""),
        common::token_with_payload(r#"{"role":"JANITOR"}"#),
    ];

    for token in malformed {
        FileCredentialStore::new(&path).save(&token).unwrap();
        let session = file_session(&path);

        assert!(!session.current().is_logged_in(), "accepted {}", token);
        assert_eq!(session.current().role(), None);
        assert_eq!(FileCredentialStore::new(&path).load().unwrap(), None);
    }
}

#[test]
fn test_login_persists_and_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let token = common::token_for("DOCTOR");

    let session = file_session(&path);
    session.log_in(&token).unwrap();
    assert_eq!(session.current().role(), Some(Role::Doctor));

    let restarted = file_session(&path);
    assert!(restarted.current().is_logged_in());
    assert_eq!(restarted.current().role(), Some(Role::Doctor));
    assert_eq!(restarted.token().as_deref(), Some(token.as_str()));
}

#[test]
fn test_login_then_logout_leaves_no_credential() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = file_session(&path);
    session.log_in(&common::token_for("PATIENT")).unwrap();
    session.log_out().unwrap();

    assert!(!session.current().is_logged_in());
    assert_eq!(session.token(), None);
    assert_eq!(FileCredentialStore::new(&path).load().unwrap(), None);
    assert!(!path.exists());
}

#[test]
fn test_expired_credential_is_logged_out_on_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileCredentialStore::new(&path)
        .save(&common::token_with_payload(r#"{"role":"ADMIN","exp":1000}"#))
        .unwrap();

    let session = file_session(&path);
    assert!(!session.current().is_logged_in());
    assert!(!path.exists());
}

mod common;

use medicare_hub::error::ClientError;
use medicare_hub::guard::{Decision, Redirect};
use medicare_hub::routes::Page;
use medicare_hub::session::{MemoryCredentialStore, SessionPolicy};
use medicare_hub::AppState;

fn state_with(store: MemoryCredentialStore) -> AppState {
    AppState::with_store("http://localhost:8080", Box::new(store), SessionPolicy::default())
        .unwrap()
}

#[test]
fn test_admin_scenario() {
    let state = state_with(MemoryCredentialStore::with_token(common::token_with_payload(
        r#"{"role":"ADMIN","sub":"42"}"#,
    )));

    let admin = state.guard.navigate("/admin/dashboard");
    assert_eq!(admin.decision, Decision::Allowed);

    let patient = state.guard.navigate("/patient/dashboard");
    assert_eq!(patient.decision, Decision::Redirected(Redirect::Unauthorized));
    assert_eq!(patient.destination(), "/unauthorized");
}

#[test]
fn test_logged_out_protected_routes_redirect_to_login() {
    let state = state_with(MemoryCredentialStore::new());

    for path in [
        "/admin/dashboard",
        "/admin/patients",
        "/admin/doctors",
        "/admin/appointments/today",
        "/admin/appointments/schedule",
        "/doctor/dashboard",
        "/patient/dashboard",
    ] {
        let navigation = state.guard.navigate(path);
        assert_eq!(navigation.decision, Decision::Redirected(Redirect::Login), "{}", path);
        assert_eq!(navigation.destination(), "/login");
    }

    for path in ["/", "/login", "/register", "/about", "/unknown"] {
        assert!(state.guard.navigate(path).decision.is_allowed(), "{}", path);
    }
}

#[test]
fn test_doctor_session() {
    let state = state_with(MemoryCredentialStore::with_token(common::token_for("DOCTOR")));

    assert_eq!(state.guard.navigate("/doctor/dashboard").decision, Decision::Allowed);
    assert_eq!(
        state.guard.navigate("/admin/patients").decision,
        Decision::Redirected(Redirect::Unauthorized)
    );
}

#[test]
fn test_enter_reports_redirect_as_error() {
    let state = state_with(MemoryCredentialStore::with_token(common::token_for("PATIENT")));

    assert!(state.enter(Page::PatientDashboard).is_ok());
    assert!(matches!(
        state.enter(Page::AdminDoctors),
        Err(ClientError::Redirected(Redirect::Unauthorized))
    ));
}

#[test]
fn test_logout_is_observed_by_guard_immediately() {
    let state = state_with(MemoryCredentialStore::with_token(common::token_for("ADMIN")));
    assert!(state.guard.navigate("/admin/dashboard").decision.is_allowed());

    state.session.log_out().unwrap();
    assert_eq!(
        state.guard.navigate("/admin/dashboard").decision,
        Decision::Redirected(Redirect::Login)
    );
}

#[test]
fn test_mixed_case_paths_are_still_guarded() {
    let state = state_with(MemoryCredentialStore::new());
    assert_eq!(
        state.guard.navigate("/Admin/Dashboard").decision,
        Decision::Redirected(Redirect::Login)
    );

    let state = state_with(MemoryCredentialStore::with_token(common::token_for("ADMIN")));
    assert!(state.guard.navigate("/ADMIN/patients").decision.is_allowed());
}

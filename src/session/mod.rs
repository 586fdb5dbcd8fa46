//! Session context shared by the API client and the route guard.
//!
//! The projection is always derived from a decoded credential. There is no way
//! to set a role directly: `log_in` decodes, `log_out` and `expire` clear.

pub mod store;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{decode_claims, Claims, Role};
use crate::error::ClientError;

pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StorageError};

/// Identity of a logged-in user, projected from credential claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    role: Role,
    subject: Option<String>,
    name: Option<String>,
    patient_id: Option<i64>,
    doctor_id: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            role: claims.role,
            subject: claims.sub.clone(),
            name: claims.name.clone(),
            patient_id: claims.patient_id,
            doctor_id: claims.doctor_id,
            expires_at: claims.expires_at(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn patient_id(&self) -> Option<i64> {
        self.patient_id
    }

    pub fn doctor_id(&self) -> Option<i64> {
        self.doctor_id
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum Session {
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(Identity::role)
    }

    pub fn user(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            Session::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// Treat an expired but well-formed credential as logged out.
    pub enforce_expiry: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            enforce_expiry: true,
        }
    }
}

pub struct SessionContext {
    store: Box<dyn CredentialStore>,
    state: ArcSwap<Session>,
    policy: SessionPolicy,
}

impl SessionContext {
    /// Restores the session from durable storage.
    ///
    /// A stored credential that cannot be read, does not decode or has expired
    /// is discarded and the session starts logged out.
    pub fn bootstrap(store: Box<dyn CredentialStore>, policy: SessionPolicy) -> Self {
        let context = Self {
            store,
            state: ArcSwap::from_pointee(Session::Anonymous),
            policy,
        };

        let stored = match context.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Discarding unreadable credential store: {}", e);
                context.clear_store();
                return context;
            }
        };

        let Some(token) = stored else {
            tracing::debug!("No stored credential, starting logged out");
            return context;
        };

        match decode_claims(&token) {
            Ok(claims) if context.policy.enforce_expiry && claims.is_expired(Utc::now()) => {
                tracing::info!("Stored credential has expired, starting logged out");
                context.clear_store();
            }
            Ok(claims) => {
                tracing::info!(role = %claims.role, "Restored session from stored credential");
                context
                    .state
                    .store(Arc::new(Session::Authenticated(Identity::from_claims(&claims))));
            }
            Err(e) => {
                tracing::warn!("Discarding malformed stored credential: {}", e);
                context.clear_store();
            }
        }

        context
    }

    /// Logs in with a credential issued by the backend.
    ///
    /// On any failure the previous session and stored credential are kept.
    pub fn log_in(&self, token: &str) -> Result<Claims, ClientError> {
        let token = token.trim();
        let claims = decode_claims(token)?;

        if self.policy.enforce_expiry && claims.is_expired(Utc::now()) {
            return Err(ClientError::Expired);
        }

        self.store.save(token)?;
        self.state
            .store(Arc::new(Session::Authenticated(Identity::from_claims(&claims))));
        tracing::info!(role = %claims.role, "Logged in");

        Ok(claims)
    }

    /// User-initiated logout.
    ///
    /// The session only becomes anonymous once the stored credential is gone.
    pub fn log_out(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.state.store(Arc::new(Session::Anonymous));
        tracing::info!("Logged out");
        Ok(())
    }

    /// Automatic logout after the backend rejected the credential.
    pub fn expire(&self) {
        self.state.store(Arc::new(Session::Anonymous));
        self.clear_store();
        tracing::warn!("Credential rejected by backend, session cleared");
    }

    pub fn current(&self) -> Arc<Session> {
        self.current_at(Utc::now())
    }

    /// Snapshot of the session as of `now`, expiring it lazily if needed.
    pub fn current_at(&self, now: DateTime<Utc>) -> Arc<Session> {
        let session = self.state.load_full();
        let expired = self.policy.enforce_expiry
            && session.user().map(|user| user.is_expired(now)).unwrap_or(false);

        if expired {
            tracing::info!("Session credential expired");
            self.state.store(Arc::new(Session::Anonymous));
            self.clear_store();
            return self.state.load_full();
        }

        session
    }

    /// Credential to attach to the next request, read from durable storage.
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read stored credential: {}", e);
                None
            }
        }
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear stored credential: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn token(payload: &str) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload))
    }

    fn context_with(store: MemoryCredentialStore) -> SessionContext {
        SessionContext::bootstrap(Box::new(store), SessionPolicy::default())
    }

    #[test]
    fn starts_logged_out_without_credential() {
        let context = context_with(MemoryCredentialStore::new());
        assert!(!context.current().is_logged_in());
        assert_eq!(context.current().role(), None);
    }

    #[test]
    fn restores_stored_credential() {
        let context = context_with(MemoryCredentialStore::with_token(token(
            r#"{"role":"DOCTOR","sub":"5","name":"Grey","doctorId":5}"#,
        )));
        let session = context.current();
        assert!(session.is_logged_in());
        assert_eq!(session.role(), Some(Role::Doctor));
        assert_eq!(session.user().and_then(Identity::name), Some("Grey"));
        assert_eq!(session.user().and_then(Identity::doctor_id), Some(5));
    }

    #[test]
    fn malformed_stored_credential_is_cleared() {
        let context = context_with(MemoryCredentialStore::with_token("garbage"));
        assert!(!context.current().is_logged_in());
        assert_eq!(context.token(), None);
    }

    #[test]
    fn expired_stored_credential_is_cleared() {
        let context =
            context_with(MemoryCredentialStore::with_token(token(r#"{"role":"ADMIN","exp":1}"#)));
        assert!(!context.current().is_logged_in());
        assert_eq!(context.token(), None);
    }

    #[test]
    fn expiry_can_be_ignored() {
        let context = SessionContext::bootstrap(
            Box::new(MemoryCredentialStore::with_token(token(r#"{"role":"ADMIN","exp":1}"#))),
            SessionPolicy {
                enforce_expiry: false,
            },
        );
        assert_eq!(context.current().role(), Some(Role::Admin));
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let context = context_with(MemoryCredentialStore::new());
        let admin = token(r#"{"role":"ADMIN"}"#);
        context.log_in(&admin).unwrap();

        assert!(context.log_in("not-a-token").is_err());
        assert_eq!(context.current().role(), Some(Role::Admin));
        assert_eq!(context.token().as_deref(), Some(admin.as_str()));
    }

    #[test]
    fn expired_login_is_rejected() {
        let context = context_with(MemoryCredentialStore::new());
        let result = context.log_in(&token(r#"{"role":"PATIENT","exp":1}"#));
        assert!(matches!(result, Err(ClientError::Expired)));
        assert!(!context.current().is_logged_in());
    }

    #[test]
    fn session_expires_lazily() {
        let context = context_with(MemoryCredentialStore::new());
        let exp = Utc::now().timestamp() + 60;
        context
            .log_in(&token(&format!(r#"{{"role":"PATIENT","exp":{}}}"#, exp)))
            .unwrap();

        assert!(context.current().is_logged_in());
        let later = Utc::now() + chrono::Duration::seconds(120);
        assert!(!context.current_at(later).is_logged_in());
        assert_eq!(context.token(), None);
    }

    struct StickyStore(MemoryCredentialStore);

    impl CredentialStore for StickyStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            self.0.load()
        }

        fn save(&self, token: &str) -> Result<(), StorageError> {
            self.0.save(token)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "session.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn failed_logout_keeps_session_consistent_with_store() {
        let stored = token(r#"{"role":"ADMIN","sub":"1"}"#);
        let context = SessionContext::bootstrap(
            Box::new(StickyStore(MemoryCredentialStore::with_token(stored.clone()))),
            SessionPolicy::default(),
        );

        assert!(matches!(context.log_out(), Err(ClientError::Storage(_))));
        assert_eq!(context.current().role(), Some(Role::Admin));
        assert_eq!(context.token(), Some(stored));
    }
}

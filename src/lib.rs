pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod session;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::ClientError;
use crate::guard::{Decision, RouteGuard};
use crate::routes::Page;
use crate::session::{CredentialStore, FileCredentialStore, SessionContext};

/// Everything a command needs, built once per process.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionContext>,
    pub api: ApiClient,
    pub guard: RouteGuard,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let store = FileCredentialStore::new(config.session_file.clone());
        let session = Arc::new(SessionContext::bootstrap(Box::new(store), config.session_policy()));
        let api = ApiClient::new(config, session.clone())?;
        Ok(Self::assemble(session, api))
    }

    /// Builds state over an arbitrary credential store and backend URL.
    pub fn with_store(
        base_url: &str,
        store: Box<dyn CredentialStore>,
        policy: session::SessionPolicy,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(SessionContext::bootstrap(store, policy));
        let api = ApiClient::with_base_url(base_url, session.clone())?;
        Ok(Self::assemble(session, api))
    }

    fn assemble(session: Arc<SessionContext>, api: ApiClient) -> Self {
        let guard = RouteGuard::new(session.clone());
        AppState { session, api, guard }
    }

    /// Gate for a page-backed operation: fails with the guard's redirect.
    pub fn enter(&self, page: Page) -> Result<(), ClientError> {
        let route = routes::route_for(page);
        match self.guard.check(route) {
            Decision::Allowed => Ok(()),
            Decision::Redirected(redirect) => {
                tracing::info!(path = route.path, redirect = redirect.path(), "Navigation redirected");
                Err(ClientError::Redirected(redirect))
            }
        }
    }
}

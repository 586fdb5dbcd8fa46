//! Per-navigation access decision.
//!
//! This is a UI gate over an unverified credential. The backend remains the
//! authority on every request; nothing here protects data.

use std::sync::Arc;

use crate::auth::Role;
use crate::routes::{self, Route, LOGIN_PATH, UNAUTHORIZED_PATH};
use crate::session::{Session, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Unauthorized,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Login => LOGIN_PATH,
            Redirect::Unauthorized => UNAUTHORIZED_PATH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Redirected(Redirect),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

pub fn authorize(session: &Session, allowed_roles: &[Role]) -> Decision {
    match session.role() {
        None if allowed_roles.is_empty() => Decision::Allowed,
        None => Decision::Redirected(Redirect::Login),
        Some(role) if allowed_roles.is_empty() || allowed_roles.contains(&role) => {
            Decision::Allowed
        }
        Some(_) => Decision::Redirected(Redirect::Unauthorized),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: &'static Route,
    pub decision: Decision,
}

impl Navigation {
    /// Path that ends up rendered.
    pub fn destination(&self) -> &'static str {
        match self.decision {
            Decision::Allowed => self.route.path,
            Decision::Redirected(redirect) => redirect.path(),
        }
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionContext>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }

    pub fn check(&self, route: &Route) -> Decision {
        let session = self.session.current();
        let decision = authorize(&session, route.allowed_roles);
        tracing::debug!(path = route.path, ?decision, "Route guard evaluated");
        decision
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let route = routes::resolve(path);
        Navigation {
            route,
            decision: self.check(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decode_claims;
    use crate::session::Identity;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn session_for(role: &str) -> Session {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(format!(r#"{{"role":"{}"}}"#, role)));
        Session::Authenticated(Identity::from_claims(&decode_claims(&token).unwrap()))
    }

    #[test]
    fn anonymous_sessions_reach_public_routes_only() {
        assert_eq!(authorize(&Session::Anonymous, &[]), Decision::Allowed);
        assert_eq!(
            authorize(&Session::Anonymous, &[Role::Admin]),
            Decision::Redirected(Redirect::Login)
        );
    }

    #[test]
    fn authenticated_sessions_need_a_matching_role() {
        let doctor = session_for("DOCTOR");
        assert_eq!(authorize(&doctor, &[]), Decision::Allowed);
        assert_eq!(authorize(&doctor, &[Role::Doctor]), Decision::Allowed);
        assert_eq!(authorize(&doctor, &[Role::Admin, Role::Doctor]), Decision::Allowed);
        assert_eq!(
            authorize(&doctor, &[Role::Admin]),
            Decision::Redirected(Redirect::Unauthorized)
        );
    }

    #[test]
    fn redirects_point_at_pages() {
        assert_eq!(Redirect::Login.path(), "/login");
        assert_eq!(Redirect::Unauthorized.path(), "/unauthorized");
    }
}

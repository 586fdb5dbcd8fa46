//! Page routes of the application and the roles allowed on each.

use crate::auth::Role;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Landing,
    Login,
    Register,
    About,
    Unauthorized,
    NotFound,
    AdminDashboard,
    AdminPatients,
    AdminDoctors,
    AdminTodayAppointments,
    AdminScheduleAppointment,
    DoctorDashboard,
    PatientDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    /// Empty means public.
    pub allowed_roles: &'static [Role],
}

const PUBLIC: &[Role] = &[];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
const PATIENT_ONLY: &[Role] = &[Role::Patient];

pub static ROUTES: &[Route] = &[
    Route { path: "/", page: Page::Landing, allowed_roles: PUBLIC },
    Route { path: LOGIN_PATH, page: Page::Login, allowed_roles: PUBLIC },
    Route { path: "/register", page: Page::Register, allowed_roles: PUBLIC },
    Route { path: "/about", page: Page::About, allowed_roles: PUBLIC },
    Route { path: UNAUTHORIZED_PATH, page: Page::Unauthorized, allowed_roles: PUBLIC },
    Route { path: "/admin/dashboard", page: Page::AdminDashboard, allowed_roles: ADMIN_ONLY },
    Route { path: "/admin/patients", page: Page::AdminPatients, allowed_roles: ADMIN_ONLY },
    Route { path: "/admin/doctors", page: Page::AdminDoctors, allowed_roles: ADMIN_ONLY },
    Route {
        path: "/admin/appointments/today",
        page: Page::AdminTodayAppointments,
        allowed_roles: ADMIN_ONLY,
    },
    Route {
        path: "/admin/appointments/schedule",
        page: Page::AdminScheduleAppointment,
        allowed_roles: ADMIN_ONLY,
    },
    Route { path: "/doctor/dashboard", page: Page::DoctorDashboard, allowed_roles: DOCTOR_ONLY },
    Route { path: "/patient/dashboard", page: Page::PatientDashboard, allowed_roles: PATIENT_ONLY },
];

static NOT_FOUND: Route = Route {
    path: "*",
    page: Page::NotFound,
    allowed_roles: PUBLIC,
};

/// Resolves a path to its route. Unknown paths land on the public not-found page.
pub fn resolve(path: &str) -> &'static Route {
    let path = normalize(path);
    ROUTES
        .iter()
        .find(|route| route.path.eq_ignore_ascii_case(path))
        .unwrap_or(&NOT_FOUND)
}

pub fn route_for(page: Page) -> &'static Route {
    ROUTES
        .iter()
        .find(|route| route.page == page)
        .unwrap_or(&NOT_FOUND)
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(resolve("/admin/patients").page, Page::AdminPatients);
        assert_eq!(resolve("/admin/patients/").page, Page::AdminPatients);
        assert_eq!(resolve("/doctor/dashboard?tab=today").page, Page::DoctorDashboard);
        assert_eq!(resolve("").page, Page::Landing);
    }

    #[test]
    fn matching_ignores_case() {
        let route = resolve("/Admin/Dashboard");
        assert_eq!(route.page, Page::AdminDashboard);
        assert_eq!(route.allowed_roles, &[Role::Admin]);
        assert_eq!(resolve("/LOGIN/").page, Page::Login);
    }

    #[test]
    fn unknown_paths_are_public_not_found() {
        let route = resolve("/no/such/page");
        assert_eq!(route.page, Page::NotFound);
        assert!(route.allowed_roles.is_empty());
    }

    #[test]
    fn dashboards_match_role_paths() {
        for role in Role::ALL {
            let route = resolve(role.dashboard_path());
            assert_eq!(route.allowed_roles, &[role]);
        }
    }

    #[test]
    fn every_page_has_a_route() {
        assert_eq!(route_for(Page::AdminScheduleAppointment).path, "/admin/appointments/schedule");
        assert_eq!(route_for(Page::Login).path, LOGIN_PATH);
    }
}

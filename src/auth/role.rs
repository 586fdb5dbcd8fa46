use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The closed set of roles a credential may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}', expected one of: ADMIN, DOCTOR, PATIENT")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    /// Wire spelling used in claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Patient => "PATIENT",
        }
    }

    /// Path segment of the role-specific login endpoint.
    pub fn login_segment(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Doctor => "/doctor/dashboard",
            Role::Patient => "/patient/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts the wire spelling case-insensitively so the CLI can take `admin`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "DOCTOR" => Ok(Role::Doctor),
            "PATIENT" => Ok(Role::Patient),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_and_cli_spellings() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("doctor".parse::<Role>(), Ok(Role::Doctor));
        assert_eq!(" Patient ".parse::<Role>(), Ok(Role::Patient));
        assert!("NURSE".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), r#""DOCTOR""#);
        let role: Role = serde_json::from_str(r#""PATIENT""#).unwrap();
        assert_eq!(role, Role::Patient);
    }

    #[test]
    fn maps_to_login_and_dashboard() {
        assert_eq!(Role::Admin.login_segment(), "admin");
        assert_eq!(Role::Patient.dashboard_path(), "/patient/dashboard");
    }
}

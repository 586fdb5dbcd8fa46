use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::client::ApiClient;
use crate::auth::{Claims, Role};
use crate::error::ClientError;
use crate::validation::{
    sanitize_string, validate_email, validate_max_len, validate_name, validate_password,
    validate_phone, validate_required, ValidationResult, ADDRESS_MAX_LEN,
};

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

impl PatientRegistration {
    pub fn validate(&self) -> ValidationResult {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_phone(&self.phone)?;
        validate_required("address", &self.address)?;
        validate_max_len("address", &self.address, ADDRESS_MAX_LEN)
    }

    fn sanitized(&self) -> Self {
        Self {
            name: sanitize_string(&self.name),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            address: sanitize_string(&self.address),
            date_of_birth: self.date_of_birth,
        }
    }
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub claims: Claims,
    /// Dashboard of the role the credential actually carries.
    pub landing: &'static str,
}

impl LoginOutcome {
    fn from_claims(claims: Claims) -> Self {
        let landing = claims.role.dashboard_path();
        Self { claims, landing }
    }
}

/// Authenticates against the login endpoint of `role`.
///
/// The session role comes from the returned credential, not from `role`.
pub async fn login(
    client: &ApiClient,
    role: Role,
    credentials: &Credentials,
) -> Result<LoginOutcome, ClientError> {
    credentials.validate()?;

    let path = format!("/{}/login", role.login_segment());
    let builder = client.json_body(client.public_request(Method::POST, &path)?, credentials);
    let response = client.send_public(builder, LOGIN_FAILED).await?;
    let token = extract_token(&response.text().await?)
        .ok_or_else(|| ClientError::InvalidResponse("login response carried no token".to_string()))?;

    let claims = client.session().log_in(&token)?;
    if claims.role != role {
        tracing::info!(requested = %role, granted = %claims.role, "Login endpoint issued a different role");
    }

    Ok(LoginOutcome::from_claims(claims))
}

/// Creates a patient account and logs it in.
pub async fn register_patient(
    client: &ApiClient,
    registration: &PatientRegistration,
) -> Result<LoginOutcome, ClientError> {
    registration.validate()?;

    let registration = registration.sanitized();
    let builder = client.json_body(
        client.public_request(Method::POST, "/patient/register")?,
        &registration,
    );
    let response = client.send_public(builder, REGISTRATION_FAILED).await?;
    let token = extract_token(&response.text().await?).ok_or_else(|| {
        ClientError::InvalidResponse("registration response carried no token".to_string())
    })?;

    let claims = client.session().log_in(&token)?;
    Ok(LoginOutcome::from_claims(claims))
}

pub fn logout(client: &ApiClient) -> Result<(), ClientError> {
    client.session().log_out()
}

/// Accepts a bare token, a JSON string, or an object with a `token` field.
pub fn extract_token(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let token = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(token)) => token,
        Ok(Value::Object(map)) => map.get("token")?.as_str()?.to_string(),
        Ok(_) => return None,
        Err(_) => body.to_string(),
    };

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

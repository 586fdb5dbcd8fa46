use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ClientError;
use crate::validation::{
    sanitize_string, validate_email, validate_max_len, validate_name, validate_password,
    validate_phone, validate_positive_id, ValidationResult, ADDRESS_MAX_LEN,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl NewPatient {
    pub fn validate(&self) -> ValidationResult {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_phone(&self.phone)?;
        if let Some(address) = &self.address {
            validate_max_len("address", address, ADDRESS_MAX_LEN)?;
        }
        Ok(())
    }

    fn sanitized(&self) -> Self {
        Self {
            name: sanitize_string(&self.name),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            address: self.address.as_deref().map(sanitize_string),
            date_of_birth: self.date_of_birth,
        }
    }
}

pub async fn list(client: &ApiClient) -> Result<Vec<Patient>, ClientError> {
    client
        .get_list("/admin/patients", &[], "Failed to fetch patients")
        .await
}

pub async fn create(client: &ApiClient, patient: &NewPatient) -> Result<(), ClientError> {
    patient.validate()?;
    client
        .post_json("/admin/patient", &patient.sanitized(), "Failed to add patient")
        .await?;
    tracing::info!("Patient created");
    Ok(())
}

pub async fn delete(client: &ApiClient, patient_id: i64) -> Result<(), ClientError> {
    validate_positive_id("patientId", patient_id)?;
    client
        .delete(&format!("/admin/patient/{}", patient_id), "Failed to delete patient")
        .await?;
    tracing::info!(patient_id, "Patient deleted");
    Ok(())
}

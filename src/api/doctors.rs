use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ClientError;
use crate::validation::{
    sanitize_string, validate_email, validate_max_len, validate_name, validate_password,
    validate_phone, validate_positive_id, ValidationResult, NAME_MAX_LEN,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub specialization: String,
    pub room_number: Option<String>,
}

impl NewDoctor {
    pub fn validate(&self) -> ValidationResult {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_phone(&self.phone)?;
        validate_max_len("specialization", &self.specialization, NAME_MAX_LEN)?;
        if let Some(room) = &self.room_number {
            validate_max_len("roomNumber", room, 20)?;
        }
        Ok(())
    }

    fn sanitized(&self) -> Self {
        Self {
            name: sanitize_string(&self.name),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            specialization: sanitize_string(&self.specialization),
            room_number: self.room_number.as_deref().map(sanitize_string),
        }
    }
}

pub async fn list(client: &ApiClient) -> Result<Vec<Doctor>, ClientError> {
    client
        .get_list("/admin/doctors", &[], "Failed to fetch doctors")
        .await
}

pub async fn create(client: &ApiClient, doctor: &NewDoctor) -> Result<(), ClientError> {
    doctor.validate()?;
    client
        .post_json("/admin/doctor", &doctor.sanitized(), "Failed to add doctor")
        .await?;
    tracing::info!("Doctor created");
    Ok(())
}

pub async fn delete(client: &ApiClient, doctor_id: i64) -> Result<(), ClientError> {
    validate_positive_id("doctorId", doctor_id)?;
    client
        .delete(&format!("/admin/doctor/{}", doctor_id), "Failed to delete doctor")
        .await?;
    tracing::info!(doctor_id, "Doctor deleted");
    Ok(())
}

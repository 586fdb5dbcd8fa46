use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::ApiClient;
use crate::error::ClientError;
use crate::validation::{
    sanitize_string, validate_max_len, validate_positive_id, validate_time_of_day,
    ValidationResult, FREE_TEXT_MAX_LEN,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Accepted => "ACCEPTED",
            AppointmentStatus::Rejected => "REJECTED",
            AppointmentStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub appointment_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub reason: String,
    pub doctor_id: i64,
    pub patient_id: i64,
}

impl NewAppointment {
    /// Appointments booked by an admin start out accepted.
    pub fn new(date: NaiveDate, time: impl Into<String>, doctor_id: i64, patient_id: i64) -> Self {
        Self {
            date,
            time: time.into(),
            status: AppointmentStatus::Accepted,
            reason: String::new(),
            doctor_id,
            patient_id,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn validate(&self) -> ValidationResult {
        validate_time_of_day("time", &self.time)?;
        validate_positive_id("doctorId", self.doctor_id)?;
        validate_positive_id("patientId", self.patient_id)?;
        validate_max_len("reason", &self.reason, FREE_TEXT_MAX_LEN)
    }

    fn sanitized(&self) -> Self {
        Self {
            time: self.time.trim().to_string(),
            reason: sanitize_string(&self.reason),
            ..self.clone()
        }
    }
}

/// All appointments on `date`, as seen by an admin.
pub async fn for_date(client: &ApiClient, date: NaiveDate) -> Result<Vec<Appointment>, ClientError> {
    client
        .get_list(
            "/admin/appointments/date",
            &[("date", date.format("%Y-%m-%d").to_string())],
            "Failed to fetch appointments",
        )
        .await
}

pub async fn for_doctor(client: &ApiClient, doctor_id: i64) -> Result<Vec<Appointment>, ClientError> {
    validate_positive_id("doctorId", doctor_id)?;
    client
        .get_list(
            "/doctor/appointments",
            &[("doctorId", doctor_id.to_string())],
            "Failed to fetch doctor appointments",
        )
        .await
}

/// Appointments of the logged-in patient.
pub async fn mine(client: &ApiClient) -> Result<Vec<Appointment>, ClientError> {
    client
        .get_list("/patient/appointments", &[], "Failed to fetch appointments")
        .await
}

pub async fn create(client: &ApiClient, appointment: &NewAppointment) -> Result<(), ClientError> {
    appointment.validate()?;
    client
        .post_json(
            "/admin/appointments",
            &appointment.sanitized(),
            "Failed to schedule appointment",
        )
        .await?;
    tracing::info!(
        doctor_id = appointment.doctor_id,
        patient_id = appointment.patient_id,
        date = %appointment.date,
        "Appointment scheduled"
    );
    Ok(())
}

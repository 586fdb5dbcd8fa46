use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use crate::error::ClientError;
use crate::validation::validate_positive_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(default)]
    pub id: Option<i64>,
    pub medication: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
}

pub async fn for_patient(
    client: &ApiClient,
    patient_id: i64,
) -> Result<Vec<Prescription>, ClientError> {
    validate_positive_id("patientId", patient_id)?;
    client
        .get_list(
            "/patient/prescriptions",
            &[("patientId", patient_id.to_string())],
            "Failed to fetch prescriptions",
        )
        .await
}

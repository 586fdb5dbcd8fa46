//! Compact credential decoding.
//!
//! A credential is `header.payload.signature`, each segment base64url encoded.
//! Only the payload is read. The signature is never verified here: the decoded
//! role drives which pages the client offers, while the backend re-checks the
//! credential on every call.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::role::Role;

pub const SEGMENT_SEPARATOR: char = '.';
const SEGMENT_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("credential must have 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("credential payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("credential payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("credential payload is not a JSON object")]
    NotAnObject,

    #[error("credential payload has no role claim")]
    MissingRole,

    #[error("credential carries unsupported role '{0}'")]
    UnknownRole(String),
}

/// Claims decoded from a credential's payload segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub role: Role,
    pub sub: Option<String>,
    pub name: Option<String>,
    /// Expiry in seconds since the Unix epoch.
    pub exp: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    sub: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    exp: Option<i64>,
    #[serde(default, rename = "patientId", deserialize_with = "lenient_id")]
    patient_id: Option<i64>,
    #[serde(default, rename = "doctorId", deserialize_with = "lenient_id")]
    doctor_id: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Credentials without an `exp` claim never expire client-side.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|at| at <= now).unwrap_or(false)
    }
}

/// Decodes the payload segment of `token` into typed claims.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.trim().split(SEGMENT_SEPARATOR).collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(DecodeError::SegmentCount(segments.len()));
    }

    let payload = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let value: Value = serde_json::from_slice(&payload)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }

    let raw: RawClaims = serde_json::from_value(value)?;
    let role = raw.role.ok_or(DecodeError::MissingRole)?;
    // Exact wire spelling only; the case-insensitive parse is for CLI input.
    let role = Role::ALL
        .into_iter()
        .find(|candidate| candidate.as_str() == role)
        .ok_or(DecodeError::UnknownRole(role))?;

    Ok(Claims {
        role,
        sub: raw.sub,
        name: raw.name,
        exp: raw.exp,
        patient_id: raw.patient_id,
        doctor_id: raw.doctor_id,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Any JSON number is a timestamp, fractional seconds truncated toward the past.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64)),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub fn token_with_payload(payload: &str) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode("not-a-real-signature")
    )
}

pub fn token_for(role: &str) -> String {
    token_with_payload(&format!(r#"{{"role":"{}","sub":"42"}}"#, role))
}

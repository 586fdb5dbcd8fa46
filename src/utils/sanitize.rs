use serde_json::Value;

/// Masks credential-bearing fields in JSON payloads before they are logged
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = if is_sensitive_field(key) {
                    mask_value(val)
                } else {
                    sanitize_json(val)
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

/// Shows only the first and last few characters of a credential.
pub fn mask_token(token: &str) -> String {
    match mask_value(&Value::String(token.to_string())) {
        Value::String(masked) => masked,
        _ => "****".to_string(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "password" | "token" | "authorization" | "secret" | "access_token" | "accesstoken"
    )
}

fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.chars().count() > 12 => {
            let chars: Vec<char> = s.chars().collect();
            let visible: String = chars[..4].iter().collect();
            let end: String = chars[chars.len() - 4..].iter().collect();
            Value::String(format!("{}****{}", visible, end))
        }
        _ => Value::String("****".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_password() {
        let input = json!({
            "email": "grey@hospital.example",
            "password": "hunter2"
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["password"], "****");
        assert_eq!(sanitized["email"], "grey@hospital.example");
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "session": {
                "token": "eyJhbGciOiJIUzI1NiJ9.e30.signature",
                "name": "Grey"
            }
        });

        let sanitized = sanitize_json(&input);
        let token = sanitized["session"]["token"].as_str().unwrap();
        assert_eq!(token, "eyJh****ture");
        assert_eq!(sanitized["session"]["name"], "Grey");
    }

    #[test]
    fn test_mask_short_token() {
        assert_eq!(mask_token("abc"), "****");
    }
}

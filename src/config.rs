use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::session::SessionPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SESSION_DIR: &str = ".medicare-hub";
const DEFAULT_SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub http_timeout: Duration,
    pub enforce_expiry: bool,
    pub log_request_body: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let session_file = match env::var("SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        Ok(Config {
            api_base_url: parse_base_url(&api_base_url)?,
            session_file,
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            enforce_expiry: parse_bool("SESSION_ENFORCE_EXPIRY", true)?,
            log_request_body: parse_bool("LOG_REQUEST_BODY", false)?,
        })
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            enforce_expiry: self.enforce_expiry,
        }
    }
}

pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid API_BASE_URL '{}'", raw))?;

    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("API_BASE_URL must use http or https, got '{}'", url.scheme());
    }
    if url.cannot_be_a_base() {
        anyhow::bail!("API_BASE_URL '{}' cannot be used as a base URL", raw);
    }

    Ok(url)
}

fn default_session_file() -> anyhow::Result<PathBuf> {
    let home = home::home_dir()
        .context("cannot determine home directory, set SESSION_FILE explicitly")?;
    Ok(home.join(DEFAULT_SESSION_DIR).join(DEFAULT_SESSION_FILE))
}

fn parse_bool(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{} must be a boolean, got '{}'", name, other),
        },
        Err(_) => Ok(default),
    }
}

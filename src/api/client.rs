use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::{self, Config};
use crate::error::ClientError;
use crate::session::SessionContext;
use crate::utils::sanitize::sanitize_json;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the hospital backend.
///
/// Authenticated requests carry the stored credential as a bearer token. A 401
/// on any of them clears the session; every other failure reaches the caller
/// as is.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionContext>,
    log_request_body: bool,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let mut client = Self::build(config.api_base_url.clone(), config.http_timeout, session)?;
        client.log_request_body = config.log_request_body;
        Ok(client)
    }

    /// Creates a client with default settings against `base_url`.
    pub fn with_base_url(base_url: &str, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let base_url =
            config::parse_base_url(base_url).map_err(|e| ClientError::Config(e.to_string()))?;
        Self::build(base_url, DEFAULT_TIMEOUT, session)
    }

    fn build(
        base_url: Url,
        timeout: Duration,
        session: Arc<SessionContext>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(ApiClient {
            http,
            base_url,
            session,
            log_request_body: false,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::Config(format!("invalid URL '{}': {}", joined, e)))
    }

    /// Request carrying the stored credential, if any.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let builder = self.public_request(method, path)?;
        Ok(match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        })
    }

    /// Request issued without a credential and without the 401 interceptor.
    pub(crate) fn public_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(method = %method, url = %url, "Outbound request");
        Ok(self.http.request(method, url))
    }

    pub(crate) fn json_body<B: Serialize>(
        &self,
        builder: RequestBuilder,
        body: &B,
    ) -> RequestBuilder {
        if self.log_request_body {
            match serde_json::to_value(body) {
                Ok(value) => tracing::debug!(body = %sanitize_json(&value), "Request body"),
                Err(e) => tracing::debug!("Request body is not JSON: {}", e),
            }
        }
        builder.json(body)
    }

    /// Sends an authenticated request, intercepting 401.
    pub(crate) async fn send(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<Response, ClientError> {
        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "Backend answered 401, logging out");
            self.session.expire();
            return Err(ClientError::Unauthorized);
        }

        ensure_success(response, fallback).await
    }

    /// Sends a request whose 401 means "bad credentials", not "session gone".
    pub(crate) async fn send_public(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        ensure_success(response, fallback).await
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<Vec<T>, ClientError> {
        let mut builder = self.request(Method::GET, path)?;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.send(builder, fallback).await?;
        let body = response.text().await?;

        // An empty body is an empty list.
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(Vec::new());
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("{} ({})", fallback, e)))
    }

    pub(crate) async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Response, ClientError> {
        let builder = self.json_body(self.request(Method::POST, path)?, body);
        self.send(builder, fallback).await
    }

    pub(crate) async fn delete(&self, path: &str, fallback: &str) -> Result<(), ClientError> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder, fallback).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status = %status, message = %message, "Backend returned an error");

    Err(ClientError::Api { status, message })
}

/// Pulls a human-readable message out of an error body: `error` first, then `message`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}

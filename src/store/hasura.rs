//! Hasura GraphQL transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::context::CallContext;
use crate::error::StoreError;
use crate::store::GraphqlTransport;

pub const URL_ENV: &str = "HASURA_GRAPHQL_URL";
pub const ADMIN_SECRET_ENV: &str = "HASURA_ADMIN_SECRET";

const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HasuraConfig {
    /// Full GraphQL endpoint, e.g. `http://localhost:8080/v1/graphql`.
    pub url: String,
    pub admin_secret: Option<String>,
    pub timeout: Duration,
}

impl HasuraConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            admin_secret: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `HASURA_GRAPHQL_URL` (required) and `HASURA_ADMIN_SECRET` (optional).
    pub fn from_env() -> Result<Self, StoreError> {
        let url = std::env::var(URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| StoreError::Config(format!("{} is not set", URL_ENV)))?;
        let mut config = Self::new(url);
        config.admin_secret = std::env::var(ADMIN_SECRET_ENV)
            .ok()
            .filter(|v| !v.is_empty());
        Ok(config)
    }
}

/// Response body. Request-level failures come back as a top-level
/// `{"error", "code"}` pair instead of `errors`.
#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphqlError {
    fn render(&self) -> String {
        match self
            .extensions
            .as_ref()
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
        {
            Some(code) => format!("{} ({})", self.message, code),
            None => self.message.clone(),
        }
    }
}

/// [`GraphqlTransport`] that POSTs to a Hasura endpoint.
#[derive(Debug, Clone)]
pub struct HasuraTransport {
    client: Client,
    url: String,
    admin_secret: Option<String>,
}

impl HasuraTransport {
    pub fn new(config: HasuraConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::Config("GraphQL url must not be empty".into()));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url,
            admin_secret: config.admin_secret,
        })
    }

    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(HasuraConfig::from_env()?)
    }
}

#[async_trait]
impl GraphqlTransport for HasuraTransport {
    async fn run(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: Value,
    ) -> Result<Value, StoreError> {
        let mut req = self
            .client
            .post(&self.url)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(secret) = &self.admin_secret {
            req = req.header(ADMIN_SECRET_HEADER, secret);
        }

        let resp = ctx.run(req.send()).await??;
        let status = resp.status();
        let body = ctx.run(resp.text()).await??;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "GraphQL response");

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(StoreError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(StoreError::Decode(e.to_string())),
        };
        unwrap_envelope(envelope, status.as_u16(), &body)
    }
}

fn unwrap_envelope(envelope: Envelope, status: u16, body: &str) -> Result<Value, StoreError> {
    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .iter()
            .map(GraphqlError::render)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(StoreError::from_backend_message(message));
    }
    if let Some(error) = envelope.error {
        let message = match envelope.code {
            Some(code) => format!("{} ({})", error, code),
            None => error,
        };
        return Err(StoreError::from_backend_message(message));
    }
    match envelope.data {
        Some(data) if !data.is_null() => Ok(data),
        _ if !(200..300).contains(&status) => Err(StoreError::Status {
            status,
            body: body.to_string(),
        }),
        _ => Err(StoreError::Decode("response has neither data nor errors".into())),
    }
}

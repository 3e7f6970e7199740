//! Low-level HTTP client: `ExchangeHttp`.
//!
//! Returns wire types; conversion to records happens in the exchange
//! adapters. Every request runs under the caller's [`CallContext`].

use crate::context::CallContext;
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Longest response body excerpt carried in error messages.
const ERROR_BODY_LIMIT: usize = 512;

/// Low-level JSON-over-HTTP client for an exchange REST API.
#[derive(Debug, Clone)]
pub struct ExchangeHttp {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl ExchangeHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::None,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `{base_url}/info`.
    pub async fn post_info<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &CallContext,
        body: &B,
    ) -> Result<T, HttpError> {
        let url = format!("{}/info", self.base_url);
        self.post(ctx, &url, body).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &CallContext,
        url: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let config = match self.retry.config() {
            None => return self.do_request(ctx, url, body).await,
            Some(config) => config,
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            if attempt > 0 {
                let delay = config.delay_for_attempt(attempt - 1);
                tracing::debug!(
                    attempt,
                    max = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request to {}",
                    url
                );
                ctx.sleep(delay).await?;
            }

            match self.do_request::<T, B>(ctx, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::Status { status, .. } => config.retries_status(*status),
                        HttpError::Reqwest(re) => re.is_connect() || re.is_timeout(),
                        _ => false,
                    };
                    if !should_retry {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &CallContext,
        url: &str,
        body: &B,
    ) -> Result<T, HttpError> {
        let req = self.client.post(url).json(body);

        let resp = ctx.run(req.send()).await??;
        let status = resp.status();
        let retry_after = parse_retry_after(resp.headers());
        let text = ctx.run(resp.text()).await??;

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|e| HttpError::Decode(format!("{}: {}", e, excerpt(&text))));
        }

        match status.as_u16() {
            429 => Err(HttpError::RateLimited { retry_after }),
            code => Err(HttpError::Status {
                status: code,
                body: excerpt(&text).to_string(),
            }),
        }
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

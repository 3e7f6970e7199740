//! Error taxonomy.
//!
//! `HttpError` and `StoreError` are layer errors. `IngestError` is what the
//! exchange adapters and the sync entry points return; it keeps rate limiting,
//! cancellation, and malformed upstream data as distinct, inspectable variants.

use std::time::Duration;

use thiserror::Error;

use crate::context::Interrupted;

/// Top-level ingestion error.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("{}", rate_limit_message(.exchange, .message, .retry_after))]
    RateLimited {
        exchange: String,
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation canceled")]
    Canceled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Missing required field `{field}` ({context})")]
    MissingRequiredField { field: &'static str, context: String },

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("HTTP error: {0}")]
    Http(HttpError),

    #[error("Store error: {0}")]
    Store(StoreError),
}

fn rate_limit_message(exchange: &str, message: &str, retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(
            "rate limit exceeded for {}: {} (retry after {:?})",
            exchange, message, delay
        ),
        None => format!("rate limit exceeded for {}: {}", exchange, message),
    }
}

impl IngestError {
    /// Lift a transport error raised while talking to `exchange`.
    ///
    /// 429s become `RateLimited` tagged with the exchange name and
    /// interruptions become `Canceled` / `DeadlineExceeded`.
    pub fn from_http(exchange: &str, err: HttpError) -> Self {
        match err {
            HttpError::RateLimited { retry_after } => IngestError::RateLimited {
                exchange: exchange.to_string(),
                message: "rate limit exceeded".to_string(),
                retry_after,
            },
            HttpError::Interrupted(i) => i.into(),
            other => IngestError::Http(other),
        }
    }

    pub fn missing(field: &'static str, context: impl Into<String>) -> Self {
        IngestError::MissingRequiredField {
            field,
            context: context.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, IngestError::RateLimited { .. })
    }

    /// Server-suggested backoff, when the venue sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            IngestError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// True for caller-side cancellation or deadline expiry.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, IngestError::Canceled | IngestError::DeadlineExceeded)
    }

    /// True when the upstream payload could not be normalized.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            IngestError::MissingRequiredField { .. } | IngestError::MalformedTimestamp(_)
        )
    }
}

impl From<Interrupted> for IngestError {
    fn from(i: Interrupted) -> Self {
        match i {
            Interrupted::Canceled => IngestError::Canceled,
            Interrupted::DeadlineExceeded => IngestError::DeadlineExceeded,
        }
    }
}

impl From<StoreError> for IngestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Interrupted(i) => i.into(),
            other => IngestError::Store(other),
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Persistence-layer errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Unique-constraint violation. Absorbed by the resilient writer.
    #[error("Duplicate record: {0}")]
    TransientDuplicate(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

/// Phrases the backend uses for unique-key violations (matched lowercase).
const DUPLICATE_SIGNATURES: &[&str] = &[
    "duplicate",
    "unique constraint",
    "violates unique constraint",
    "uniqueness violation",
    "already exists",
];

impl StoreError {
    /// Classify a backend error message, promoting unique-key violations to
    /// `TransientDuplicate`.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_duplicate_message(&message) {
            StoreError::TransientDuplicate(message)
        } else {
            StoreError::Backend(message)
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::TransientDuplicate(_))
    }
}

pub(crate) fn is_duplicate_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    DUPLICATE_SIGNATURES.iter().any(|sig| lower.contains(sig))
}

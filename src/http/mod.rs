//! HTTP client layer: `ExchangeHttp` with cancellation-aware requests and
//! retry policies.

pub mod client;
pub mod retry;

pub use client::ExchangeHttp;
pub use retry::{RetryConfig, RetryPolicy};

//! Hyperliquid adapter.
//!
//! Fills come from the paginated `userFillsByTime` info request; funding
//! settlements from the single-shot `userFunding` request.

mod paginate;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::context::CallContext;
use crate::domain::account::Account;
use crate::domain::funding::wire::HyperliquidFundingPayment;
use crate::domain::funding::FundingPaymentRecord;
use crate::domain::trade::wire::HyperliquidFill;
use crate::domain::trade::TradeRecord;
use crate::error::IngestError;
use crate::exchange::ExchangeClient;
use crate::http::{ExchangeHttp, RetryPolicy};
use crate::shared::Watermark;

use paginate::collect_fills;

/// Registry key and error tag for this adapter.
pub const EXCHANGE_NAME: &str = "hyperliquid";

/// Most fills `userFillsByTime` returns per request.
pub const DEFAULT_PAGE_LIMIT: usize = 2000;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a POST to `/info`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    user: &'a str,
    start_time: i64,
}

/// Hyperliquid [`ExchangeClient`]. Holds only immutable configuration.
#[derive(Debug, Clone)]
pub struct HyperliquidClient {
    http: ExchangeHttp,
    page_limit: usize,
}

impl HyperliquidClient {
    pub fn builder() -> HyperliquidClientBuilder {
        HyperliquidClientBuilder::default()
    }

    pub fn page_limit(&self) -> usize {
        self.page_limit
    }

    async fn fill_page(
        &self,
        ctx: &CallContext,
        user: &str,
        start_time: i64,
    ) -> Result<Vec<HyperliquidFill>, IngestError> {
        let request = InfoRequest {
            kind: "userFillsByTime",
            user,
            start_time,
        };
        self.http
            .post_info(ctx, &request)
            .await
            .map_err(|e| IngestError::from_http(EXCHANGE_NAME, e))
    }
}

#[async_trait]
impl ExchangeClient for HyperliquidClient {
    fn name(&self) -> &str {
        EXCHANGE_NAME
    }

    async fn fetch_trades(
        &self,
        ctx: &CallContext,
        account: &Account,
        since: Watermark,
    ) -> Result<Vec<TradeRecord>, IngestError> {
        ctx.check()?;
        let account = account.validate()?;
        let user = account.address.as_str();

        collect_fills(ctx, &account, since, self.page_limit, move |cursor| {
            self.fill_page(ctx, user, cursor)
        })
        .await
    }

    async fn fetch_funding_payments(
        &self,
        ctx: &CallContext,
        account: &Account,
        since: Watermark,
    ) -> Result<Vec<FundingPaymentRecord>, IngestError> {
        ctx.check()?;
        let account = account.validate()?;

        let request = InfoRequest {
            kind: "userFunding",
            user: &account.address,
            start_time: since.start_millis(),
        };
        let entries: Vec<HyperliquidFundingPayment> = self
            .http
            .post_info(ctx, &request)
            .await
            .map_err(|e| IngestError::from_http(EXCHANGE_NAME, e))?;

        let mut records = Vec::with_capacity(entries.len());
        for entry in &entries {
            if !since.admits(entry.timestamp()?) {
                continue;
            }
            records.push(entry.to_funding_record(account.id)?);
        }
        records.sort_by_key(|r| r.timestamp);

        tracing::debug!(
            exchange = EXCHANGE_NAME,
            received = entries.len(),
            kept = records.len(),
            "Fetched funding payments"
        );
        Ok(records)
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct HyperliquidClientBuilder {
    base_url: String,
    timeout: Duration,
    page_limit: usize,
    retry: RetryPolicy,
}

impl Default for HyperliquidClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::HYPERLIQUID_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_limit: DEFAULT_PAGE_LIMIT,
            retry: RetryPolicy::None,
        }
    }
}

impl HyperliquidClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Per-request HTTP timeout. The caller's context deadline still applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Page size at which another page is requested. Must match the server cap.
    pub fn page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<HyperliquidClient, IngestError> {
        if self.base_url.trim().is_empty() {
            return Err(IngestError::InvalidInput("base_url must not be empty".into()));
        }
        if self.page_limit == 0 {
            return Err(IngestError::InvalidInput("page_limit must be positive".into()));
        }
        let http = ExchangeHttp::new(&self.base_url, self.timeout)
            .map_err(|e| IngestError::from_http(EXCHANGE_NAME, e))?
            .with_retry(self.retry);

        Ok(HyperliquidClient {
            http,
            page_limit: self.page_limit,
        })
    }
}

//! Incremental sync of one account: watermark → fetch → persist.
//!
//! The watermark is the newest stored record's timestamp, inclusive. Records
//! at exactly that instant are fetched again and absorbed by the duplicate
//! tolerant writer.

use tracing::{debug, info, warn};

use crate::context::CallContext;
use crate::domain::account::Account;
use crate::error::IngestError;
use crate::exchange::ExchangeClient;
use crate::shared::Watermark;
use crate::store::{GraphqlTransport, LedgerStore};

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub exchange: String,
    pub fetched: usize,
    pub inserted: usize,
}

pub async fn sync_trades<G: GraphqlTransport>(
    ctx: &CallContext,
    client: &dyn ExchangeClient,
    store: &LedgerStore<G>,
    account: &Account,
) -> Result<SyncReport, IngestError> {
    let result = async {
        let validated = account.validate()?;
        let latest = store.latest_trades(ctx, &[validated.id]).await?;
        let since = Watermark::from(latest.get(&validated.id).map(|t| t.timestamp));

        let trades = client.fetch_trades(ctx, account, since).await?;
        let inserted = store.add_trades(ctx, &trades).await?;
        Ok::<_, IngestError>(SyncReport {
            exchange: client.name().to_string(),
            fetched: trades.len(),
            inserted: inserted.len(),
        })
    }
    .await;

    report(client.name(), "trades", account, result)
}

pub async fn sync_funding_payments<G: GraphqlTransport>(
    ctx: &CallContext,
    client: &dyn ExchangeClient,
    store: &LedgerStore<G>,
    account: &Account,
) -> Result<SyncReport, IngestError> {
    let result = async {
        let validated = account.validate()?;
        let latest = store.latest_funding_payment(ctx, validated.id).await?;
        let since = Watermark::from(latest.map(|p| p.timestamp));

        let payments = client.fetch_funding_payments(ctx, account, since).await?;
        let inserted = store.add_funding_payments(ctx, &payments).await?;
        Ok::<_, IngestError>(SyncReport {
            exchange: client.name().to_string(),
            fetched: payments.len(),
            inserted: inserted.len(),
        })
    }
    .await;

    report(client.name(), "funding_payments", account, result)
}

fn report(
    exchange: &str,
    kind: &'static str,
    account: &Account,
    result: Result<SyncReport, IngestError>,
) -> Result<SyncReport, IngestError> {
    match &result {
        Ok(r) => info!(
            exchange,
            kind,
            account = %account.id,
            fetched = r.fetched,
            inserted = r.inserted,
            "Sync complete"
        ),
        Err(e) if e.is_interrupted() => {
            debug!(exchange, kind, account = %account.id, error = %e, "Sync interrupted")
        }
        Err(e) if e.is_rate_limited() => warn!(
            exchange,
            kind,
            account = %account.id,
            retry_after_secs = e.retry_after().map(|d| d.as_secs()),
            "Sync rate limited"
        ),
        Err(e) if e.is_malformed_record() => {
            warn!(exchange, kind, account = %account.id, error = %e, "Malformed upstream record")
        }
        Err(e) => warn!(exchange, kind, account = %account.id, error = %e, "Sync failed"),
    }
    result
}

//! Behavior every `ExchangeClient` must show, as reusable checks.
//!
//! Each check takes a client already pointed at a venue holding some history
//! for `account`.

use chrono::{DateTime, Utc};
use perp_ledger::prelude::*;

pub fn check_name(client: &dyn ExchangeClient) {
    let name = client.name();
    assert!(!name.is_empty(), "exchange name must not be empty");
    assert_eq!(name, client.name(), "exchange name must be stable");
}

pub async fn check_precanceled_context(client: &dyn ExchangeClient, account: &Account) {
    let ctx = CallContext::background();
    ctx.cancel();

    let trades = client
        .fetch_trades(&ctx, account, Watermark::FULL_HISTORY)
        .await;
    assert!(
        matches!(trades, Err(IngestError::Canceled)),
        "fetch_trades on canceled context: {trades:?}"
    );

    let funding = client
        .fetch_funding_payments(&ctx, account, Watermark::FULL_HISTORY)
        .await;
    assert!(
        matches!(funding, Err(IngestError::Canceled)),
        "fetch_funding_payments on canceled context: {funding:?}"
    );
}

fn assert_ascending(stamps: &[DateTime<Utc>], what: &str) {
    assert!(
        stamps.windows(2).all(|w| w[0] <= w[1]),
        "{what} must be sorted ascending by timestamp"
    );
}

/// Full history is ordered, well-formed, and owned by `account`.
/// Returns the fetched trades for further assertions.
pub async fn check_full_history(client: &dyn ExchangeClient, account: &Account) -> Vec<TradeRecord> {
    let ctx = CallContext::background();
    let id = account.validate().unwrap().id;

    let trades = client
        .fetch_trades(&ctx, account, Watermark::FULL_HISTORY)
        .await
        .unwrap();
    let stamps: Vec<_> = trades.iter().map(|t| t.timestamp).collect();
    assert_ascending(&stamps, "trades");
    for t in &trades {
        assert!(!t.trade_id.is_empty());
        assert!(!t.base_asset.is_empty() && !t.quote_asset.is_empty());
        assert_eq!(t.account_id, id);
    }

    let funding = client
        .fetch_funding_payments(&ctx, account, Watermark::FULL_HISTORY)
        .await
        .unwrap();
    let stamps: Vec<_> = funding.iter().map(|f| f.timestamp).collect();
    assert_ascending(&stamps, "funding payments");
    for f in &funding {
        assert!(!f.payment_id.is_empty());
        assert_eq!(f.account_id, id);
    }

    trades
}

/// Every record returned for `since` is at or after it.
pub async fn check_watermark(client: &dyn ExchangeClient, account: &Account, since: DateTime<Utc>) {
    let ctx = CallContext::background();
    let mark = Watermark::since(since);

    let trades = client.fetch_trades(&ctx, account, mark).await.unwrap();
    assert!(trades.iter().all(|t| t.timestamp >= since));

    let funding = client
        .fetch_funding_payments(&ctx, account, mark)
        .await
        .unwrap();
    assert!(funding.iter().all(|f| f.timestamp >= since));
}

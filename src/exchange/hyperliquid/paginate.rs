//! Forward pagination over `userFillsByTime`.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, warn};

use crate::context::CallContext;
use crate::domain::account::ValidatedAccount;
use crate::domain::trade::wire::HyperliquidFill;
use crate::domain::trade::TradeRecord;
use crate::error::IngestError;
use crate::shared::Watermark;

/// Page forward from `since`, normalizing every fill.
///
/// `fetch_page(cursor)` returns the fills with `time >= cursor`, at most
/// `page_limit` of them. A short page ends the history; a full one moves the
/// cursor to one millisecond past the newest fill seen. The loop also stops
/// when the cursor would not move forward.
pub(crate) async fn collect_fills<F, Fut>(
    ctx: &CallContext,
    account: &ValidatedAccount,
    since: Watermark,
    page_limit: usize,
    mut fetch_page: F,
) -> Result<Vec<TradeRecord>, IngestError>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Vec<HyperliquidFill>, IngestError>>,
{
    let mut cursor = since.start_millis();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    loop {
        ctx.check()?;
        let page = fetch_page(cursor).await?;
        debug!(cursor, page_size = page.len(), "Fetched fills page");

        if page.is_empty() {
            break;
        }

        let mut newest: Option<i64> = None;
        for fill in &page {
            let timestamp = fill.timestamp()?;
            let millis = timestamp.timestamp_millis();
            newest = Some(newest.map_or(millis, |n| n.max(millis)));

            if !since.admits(timestamp) {
                continue;
            }
            let record = fill.to_trade_record(account.id)?;
            if seen.insert(record.trade_id.clone()) {
                records.push(record);
            }
        }

        if page.len() < page_limit {
            break;
        }
        let Some(newest) = newest else {
            break;
        };
        let next = newest.saturating_add(1);
        if next <= cursor {
            warn!(cursor, next, "Fill cursor did not advance; stopping pagination");
            break;
        }
        cursor = next;
    }

    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

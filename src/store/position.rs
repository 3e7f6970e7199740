//! Closed-position persistence: `positions` and the `position_trades`
//! junction table.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::wire::{PositionInsert, StoredPosition, StoredPositionTrade};
use super::{decode_field, insert_resilient, GraphqlTransport, LedgerStore};
use crate::context::CallContext;
use crate::domain::position::{PositionFilter, PositionRecord, PositionTradeLink};
use crate::error::StoreError;
use crate::shared::serde_util::loose_timestamp;

const POSITION_FIELDS: &str = "id exchange_account_id base_asset quote_asset side start_time \
                               end_time entry_avg_price exit_avg_price total_quantity \
                               total_fees realized_pnl";

const POSITION_TRADE_FIELDS: &str =
    "position_id trade_id allocation_percentage allocated_quantity allocated_fees";

fn create_position_mutation() -> String {
    format!(
        "mutation CreatePosition($object: positions_insert_input!) {{ \
         insert_positions_one(object: $object) {{ {} }} }}",
        POSITION_FIELDS
    )
}

fn insert_position_trades_mutation() -> String {
    format!(
        "mutation InsertPositionTrades($objects: [position_trades_insert_input!]!) {{ \
         insert_position_trades(objects: $objects) {{ returning {{ {} }} }} }}",
        POSITION_TRADE_FIELDS
    )
}

fn positions_query() -> String {
    format!(
        "query Positions($where: positions_bool_exp!) {{ \
         positions(where: $where, order_by: {{ end_time: desc }}) {{ {} }} }}",
        POSITION_FIELDS
    )
}

fn position_with_trades_query() -> String {
    format!(
        "query PositionWithTrades($id: uuid!) {{ \
         positions_by_pk(id: $id) {{ {} position_trades {{ {} }} }} }}",
        POSITION_FIELDS, POSITION_TRADE_FIELDS
    )
}

fn last_processed_trade_query() -> &'static str {
    "query LastProcessedTrade($exchange_account_id: uuid!, $base_asset: String!, \
     $quote_asset: String!) { \
     position_trades(where: { position: { exchange_account_id: { _eq: $exchange_account_id }, \
     base_asset: { _eq: $base_asset }, quote_asset: { _eq: $quote_asset } } }, \
     order_by: { trade: { timestamp: desc } }, limit: 1) { trade { timestamp } } }"
}

#[derive(Deserialize)]
struct ProcessedTrade {
    trade: TradeStamp,
}

#[derive(Deserialize)]
struct TradeStamp {
    #[serde(with = "loose_timestamp")]
    timestamp: DateTime<Utc>,
}

/// Hasura boolean expression for `filter`. An empty filter matches every row.
pub(crate) fn position_where(filter: &PositionFilter) -> Value {
    fn range(gte: Option<DateTime<Utc>>, lte: Option<DateTime<Utc>>) -> Option<Value> {
        let mut bounds = Map::new();
        if let Some(t) = gte {
            bounds.insert("_gte".into(), json!(t.timestamp_millis()));
        }
        if let Some(t) = lte {
            bounds.insert("_lte".into(), json!(t.timestamp_millis()));
        }
        (!bounds.is_empty()).then_some(Value::Object(bounds))
    }

    let mut clause = Map::new();
    if !filter.account_ids.is_empty() {
        clause.insert(
            "exchange_account_id".into(),
            json!({ "_in": filter.account_ids }),
        );
    }
    if let Some(base) = &filter.base_asset {
        clause.insert("base_asset".into(), json!({ "_eq": base }));
    }
    if let Some(quote) = &filter.quote_asset {
        clause.insert("quote_asset".into(), json!({ "_eq": quote }));
    }
    if let Some(side) = filter.side {
        clause.insert("side".into(), json!({ "_eq": side }));
    }
    if let Some(bounds) = range(filter.start_time_gte, filter.start_time_lte) {
        clause.insert("start_time".into(), bounds);
    }
    if let Some(bounds) = range(filter.end_time_gte, filter.end_time_lte) {
        clause.insert("end_time".into(), bounds);
    }
    Value::Object(clause)
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Decode(format!("{}: {}", what, e)))
}

impl<G: GraphqlTransport> LedgerStore<G> {
    pub async fn create_position(
        &self,
        ctx: &CallContext,
        position: &PositionRecord,
    ) -> Result<StoredPosition, StoreError> {
        let data = self
            .transport
            .run(
                ctx,
                &create_position_mutation(),
                json!({ "object": PositionInsert::from(position) }),
            )
            .await?;
        let row: Option<StoredPosition> = decode_field(data, "insert_positions_one")?;
        row.ok_or_else(|| StoreError::Decode("insert_positions_one returned no row".into()))
    }

    /// Link trades to positions, skipping links already stored.
    pub async fn add_position_trades(
        &self,
        ctx: &CallContext,
        links: &[PositionTradeLink],
    ) -> Result<Vec<StoredPositionTrade>, StoreError> {
        let mutation = insert_position_trades_mutation();
        insert_resilient(ctx, links, |batch| {
            self.insert_returning(ctx, &mutation, "insert_position_trades", batch.to_vec())
        })
        .await
    }

    /// Positions matching `filter`, most recently closed first.
    pub async fn positions(
        &self,
        ctx: &CallContext,
        filter: &PositionFilter,
    ) -> Result<Vec<StoredPosition>, StoreError> {
        let data = self
            .transport
            .run(ctx, &positions_query(), json!({ "where": position_where(filter) }))
            .await?;
        decode_field(data, "positions")
    }

    /// One position with its trade allocations, or `None` if no such row.
    pub async fn position_with_trades(
        &self,
        ctx: &CallContext,
        id: Uuid,
    ) -> Result<Option<(StoredPosition, Vec<StoredPositionTrade>)>, StoreError> {
        let data = self
            .transport
            .run(ctx, &position_with_trades_query(), json!({ "id": id }))
            .await?;
        let mut row: Value = decode_field(data, "positions_by_pk")?;
        if row.is_null() {
            return Ok(None);
        }

        let trades = match row.get_mut("position_trades").map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(trades) => decode(trades, "position_trades")?,
        };
        let position = decode(row, "positions_by_pk")?;
        Ok(Some((position, trades)))
    }

    /// Timestamp of the newest trade already allocated to a position of this
    /// account and pair. Position building resumes after it.
    pub async fn last_processed_trade_timestamp(
        &self,
        ctx: &CallContext,
        account_id: Uuid,
        base_asset: &str,
        quote_asset: &str,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let data = self
            .transport
            .run(
                ctx,
                last_processed_trade_query(),
                json!({
                    "exchange_account_id": account_id,
                    "base_asset": base_asset,
                    "quote_asset": quote_asset
                }),
            )
            .await?;
        let rows: Vec<ProcessedTrade> = decode_field(data, "position_trades")?;
        Ok(rows.into_iter().map(|r| r.trade.timestamp).max())
    }
}

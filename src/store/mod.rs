//! Ledger persistence over a GraphQL backend.
//!
//! [`LedgerStore`] owns the mutations and queries for the ledger tables:
//! `trades`, `funding_payments`, and the closed-position tables handled in
//! [`position`]. The transport is pluggable through [`GraphqlTransport`];
//! [`hasura::HasuraTransport`] is the production one.

pub mod batch;
pub mod hasura;
pub mod position;
pub mod wire;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::context::CallContext;
use crate::domain::funding::FundingPaymentRecord;
use crate::domain::trade::TradeRecord;
use crate::error::StoreError;

pub use batch::insert_resilient;
pub use wire::{
    FundingPaymentInsert, PositionInsert, StoredFundingPayment, StoredPosition,
    StoredPositionTrade, StoredTrade, TradeInsert,
};

/// Executes one GraphQL operation and returns its `data` object.
///
/// Backend-reported errors must be classified with
/// [`StoreError::from_backend_message`] so unique-key violations surface as
/// `TransientDuplicate`.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn run(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: Value,
    ) -> Result<Value, StoreError>;
}

#[async_trait]
impl<T: GraphqlTransport + ?Sized> GraphqlTransport for Arc<T> {
    async fn run(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: Value,
    ) -> Result<Value, StoreError> {
        (**self).run(ctx, query, variables).await
    }
}

// ── Operations ───────────────────────────────────────────────────────────────

const TRADE_FIELDS: &str = "id base_asset quote_asset side price quantity timestamp fee \
                            order_id trade_id exchange_account_id";

const FUNDING_FIELDS: &str =
    "id exchange_account_id base_asset quote_asset amount timestamp payment_id";

fn insert_trades_mutation() -> String {
    format!(
        "mutation InsertTrades($objects: [trades_insert_input!]!) {{ \
         insert_trades(objects: $objects) {{ returning {{ {} }} }} }}",
        TRADE_FIELDS
    )
}

fn insert_funding_payments_mutation() -> String {
    format!(
        "mutation InsertFundingPayments($objects: [funding_payments_insert_input!]!) {{ \
         insert_funding_payments(objects: $objects) {{ returning {{ {} }} }} }}",
        FUNDING_FIELDS
    )
}

fn latest_trades_query() -> String {
    format!(
        "query LatestTrades($exchange_account_ids: [uuid!]!) {{ \
         trades(where: {{ exchange_account_id: {{ _in: $exchange_account_ids }} }}, \
         distinct_on: exchange_account_id, \
         order_by: [{{ exchange_account_id: asc }}, {{ timestamp: desc }}]) {{ {} }} }}",
        TRADE_FIELDS
    )
}

fn latest_funding_payment_query() -> String {
    format!(
        "query LatestFundingPayment($exchange_account_id: uuid!) {{ \
         funding_payments(where: {{ exchange_account_id: {{ _eq: $exchange_account_id }} }}, \
         order_by: {{ timestamp: desc }}, limit: 1) {{ {} }} }}",
        FUNDING_FIELDS
    )
}

/// Trade and funding-payment persistence.
#[derive(Debug, Clone)]
pub struct LedgerStore<G> {
    transport: G,
}

impl<G: GraphqlTransport> LedgerStore<G> {
    pub fn new(transport: G) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &G {
        &self.transport
    }

    /// Insert trades, skipping ones already stored. Returns the new rows.
    pub async fn add_trades(
        &self,
        ctx: &CallContext,
        trades: &[TradeRecord],
    ) -> Result<Vec<StoredTrade>, StoreError> {
        let mutation = insert_trades_mutation();
        insert_resilient(ctx, trades, |batch| {
            let objects: Vec<TradeInsert> = batch.iter().map(TradeInsert::from).collect();
            self.insert_returning(ctx, &mutation, "insert_trades", objects)
        })
        .await
    }

    /// Insert funding payments, skipping ones already stored. Returns the new rows.
    pub async fn add_funding_payments(
        &self,
        ctx: &CallContext,
        payments: &[FundingPaymentRecord],
    ) -> Result<Vec<StoredFundingPayment>, StoreError> {
        let mutation = insert_funding_payments_mutation();
        insert_resilient(ctx, payments, |batch| {
            let objects: Vec<FundingPaymentInsert> =
                batch.iter().map(FundingPaymentInsert::from).collect();
            self.insert_returning(ctx, &mutation, "insert_funding_payments", objects)
        })
        .await
    }

    /// Newest stored trade per account. Accounts without trades are absent.
    pub async fn latest_trades(
        &self,
        ctx: &CallContext,
        account_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, StoredTrade>, StoreError> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let data = self
            .transport
            .run(
                ctx,
                &latest_trades_query(),
                json!({ "exchange_account_ids": account_ids }),
            )
            .await?;
        let rows: Vec<StoredTrade> = decode_field(data, "trades")?;

        let mut latest: HashMap<Uuid, StoredTrade> = HashMap::new();
        for row in rows {
            match latest.get(&row.exchange_account_id) {
                Some(current) if current.timestamp >= row.timestamp => {}
                _ => {
                    latest.insert(row.exchange_account_id, row);
                }
            }
        }
        Ok(latest)
    }

    pub async fn latest_funding_payment(
        &self,
        ctx: &CallContext,
        account_id: Uuid,
    ) -> Result<Option<StoredFundingPayment>, StoreError> {
        let data = self
            .transport
            .run(
                ctx,
                &latest_funding_payment_query(),
                json!({ "exchange_account_id": account_id }),
            )
            .await?;
        let rows: Vec<StoredFundingPayment> = decode_field(data, "funding_payments")?;
        Ok(rows.into_iter().max_by_key(|row| row.timestamp))
    }

    async fn insert_returning<O: Serialize, T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        mutation: &str,
        field: &str,
        objects: Vec<O>,
    ) -> Result<Vec<T>, StoreError> {
        let variables = json!({
            "objects": serde_json::to_value(&objects)
                .map_err(|e| StoreError::Decode(format!("encoding {}: {}", field, e)))?
        });
        let data = self.transport.run(ctx, mutation, variables).await?;
        let payload = data
            .get(field)
            .and_then(|f| f.get("returning"))
            .cloned()
            .ok_or_else(|| StoreError::Decode(format!("missing {}.returning", field)))?;
        serde_json::from_value(payload).map_err(|e| StoreError::Decode(format!("{}: {}", field, e)))
    }
}

fn decode_field<T: DeserializeOwned>(mut data: Value, field: &str) -> Result<T, StoreError> {
    let payload = data
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| StoreError::Decode(format!("missing {}", field)))?;
    serde_json::from_value(payload).map_err(|e| StoreError::Decode(format!("{}: {}", field, e)))
}

//! In-memory stand-in for the Hasura backend.
//!
//! Understands the ledger operations `LedgerStore` issues (position listing
//! with arbitrary filters excepted) and enforces the tables' unique keys the
//! way Postgres does: a batch that contains any colliding row is rejected as
//! a whole.

use async_trait::async_trait;
use perp_ledger::context::CallContext;
use perp_ledger::error::StoreError;
use perp_ledger::store::GraphqlTransport;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Table {
    rows: Vec<Value>,
    keys: HashSet<(String, String)>,
}

#[derive(Default)]
pub struct MemoryGraphql {
    trades: Mutex<Table>,
    funding_payments: Mutex<Table>,
    positions: Mutex<Table>,
    position_trades: Mutex<Table>,
    /// Operation name of every call, in order.
    pub operations: Mutex<Vec<String>>,
    /// Backend error message returned for the next insert of this natural key.
    pub poison_key: Mutex<Option<(String, String)>>,
}

impl MemoryGraphql {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.lock().unwrap().rows.len()
    }

    pub fn funding_count(&self) -> usize {
        self.funding_payments.lock().unwrap().rows.len()
    }

    pub fn position_trade_count(&self) -> usize {
        self.position_trades.lock().unwrap().rows.len()
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    fn insert(
        &self,
        table: &Mutex<Table>,
        key_columns: (&str, &str),
        constraint: &str,
        objects: &[Value],
    ) -> Result<Value, StoreError> {
        let mut table = table.lock().unwrap();
        let mut batch_keys = HashSet::new();
        for object in objects {
            let key = (
                object[key_columns.0].as_str().unwrap_or_default().to_string(),
                object[key_columns.1].as_str().unwrap_or_default().to_string(),
            );
            if self.poison_key.lock().unwrap().as_ref() == Some(&key) {
                return Err(StoreError::from_backend_message(
                    "connection to database lost (unexpected)",
                ));
            }
            if table.keys.contains(&key) || !batch_keys.insert(key) {
                return Err(StoreError::from_backend_message(format!(
                    "Uniqueness violation. duplicate key value violates unique constraint \"{}\" (constraint-violation)",
                    constraint
                )));
            }
        }

        let mut returning = Vec::with_capacity(objects.len());
        for object in objects {
            let mut row: Map<String, Value> = object.as_object().cloned().unwrap_or_default();
            row.insert("id".into(), json!(Uuid::new_v4()));
            let row = Value::Object(row);
            returning.push(row.clone());
            table.rows.push(row);
        }
        table.keys.extend(batch_keys);
        Ok(json!({ "returning": returning }))
    }
}

fn objects(variables: &Value) -> Vec<Value> {
    variables["objects"].as_array().cloned().unwrap_or_default()
}

fn time_key(row: &Value) -> String {
    // Trades store RFC-3339 text, funding payments epoch millis; both sort
    // correctly as zero-padded strings within one table.
    match &row["timestamp"] {
        Value::Number(n) => format!("{:020}", n.as_i64().unwrap_or_default()),
        other => other.as_str().unwrap_or_default().to_string(),
    }
}

#[async_trait]
impl GraphqlTransport for MemoryGraphql {
    async fn run(
        &self,
        ctx: &CallContext,
        query: &str,
        variables: Value,
    ) -> Result<Value, StoreError> {
        ctx.check()?;
        let operation = query
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.split('(').next())
            .unwrap_or_default()
            .to_string();
        self.operations.lock().unwrap().push(operation.clone());

        match operation.as_str() {
            "InsertTrades" => {
                let inserted = self.insert(
                    &self.trades,
                    ("exchange_account_id", "trade_id"),
                    "trades_exchange_account_id_trade_id_key",
                    &objects(&variables),
                )?;
                Ok(json!({ "insert_trades": inserted }))
            }
            "InsertFundingPayments" => {
                let inserted = self.insert(
                    &self.funding_payments,
                    ("exchange_account_id", "payment_id"),
                    "funding_payments_exchange_account_id_payment_id_key",
                    &objects(&variables),
                )?;
                Ok(json!({ "insert_funding_payments": inserted }))
            }
            "LatestTrades" => {
                let ids: Vec<Value> = variables["exchange_account_ids"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                let table = self.trades.lock().unwrap();
                let mut rows: Vec<Value> = table
                    .rows
                    .iter()
                    .filter(|r| ids.contains(&r["exchange_account_id"]))
                    .cloned()
                    .collect();
                rows.sort_by_key(|r| std::cmp::Reverse(time_key(r)));
                Ok(json!({ "trades": rows }))
            }
            "LatestFundingPayment" => {
                let id = &variables["exchange_account_id"];
                let table = self.funding_payments.lock().unwrap();
                let newest = table
                    .rows
                    .iter()
                    .filter(|r| &r["exchange_account_id"] == id)
                    .max_by_key(|r| time_key(r))
                    .cloned();
                Ok(json!({ "funding_payments": newest.into_iter().collect::<Vec<_>>() }))
            }
            "CreatePosition" => {
                let mut row: Map<String, Value> =
                    variables["object"].as_object().cloned().unwrap_or_default();
                row.insert("id".into(), json!(Uuid::new_v4()));
                let row = Value::Object(row);
                self.positions.lock().unwrap().rows.push(row.clone());
                Ok(json!({ "insert_positions_one": row }))
            }
            "InsertPositionTrades" => {
                let inserted = self.insert(
                    &self.position_trades,
                    ("position_id", "trade_id"),
                    "position_trades_pkey",
                    &objects(&variables),
                )?;
                // Junction rows carry no surrogate id.
                let returning: Vec<Value> = inserted["returning"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|mut r| {
                        if let Some(obj) = r.as_object_mut() {
                            obj.remove("id");
                        }
                        r
                    })
                    .collect();
                Ok(json!({ "insert_position_trades": { "returning": returning } }))
            }
            "PositionWithTrades" => {
                let id = &variables["id"];
                let position = self
                    .positions
                    .lock()
                    .unwrap()
                    .rows
                    .iter()
                    .find(|r| &r["id"] == id)
                    .cloned();
                let row = position.map(|mut row| {
                    let links: Vec<Value> = self
                        .position_trades
                        .lock()
                        .unwrap()
                        .rows
                        .iter()
                        .filter(|l| &l["position_id"] == id)
                        .cloned()
                        .collect();
                    row["position_trades"] = Value::Array(links);
                    row
                });
                Ok(json!({ "positions_by_pk": row }))
            }
            "LastProcessedTrade" => {
                let positions = self.positions.lock().unwrap();
                let trades = self.trades.lock().unwrap();
                let links = self.position_trades.lock().unwrap();
                let newest = links
                    .rows
                    .iter()
                    .filter(|l| {
                        positions.rows.iter().any(|p| {
                            p["id"] == l["position_id"]
                                && p["exchange_account_id"] == variables["exchange_account_id"]
                                && p["base_asset"] == variables["base_asset"]
                                && p["quote_asset"] == variables["quote_asset"]
                        })
                    })
                    .filter_map(|l| trades.rows.iter().find(|t| t["id"] == l["trade_id"]))
                    .max_by_key(|t| time_key(t))
                    .map(|t| json!({ "trade": { "timestamp": t["timestamp"] } }));
                Ok(json!({ "position_trades": newest.into_iter().collect::<Vec<_>>() }))
            }
            other => Err(StoreError::from_backend_message(format!(
                "unknown operation {}",
                other
            ))),
        }
    }
}

//! Wire types for the ledger tables.
//!
//! Insert objects are what the mutations send; `Stored*` rows are what the
//! backend returns, decoded through the loose-shape helpers in
//! [`crate::shared::serde_util`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::funding::FundingPaymentRecord;
use crate::domain::position::{PositionRecord, PositionSide};
use crate::domain::trade::TradeRecord;
use crate::shared::serde_util::{flexible_timestamp, text_or_number, timestamp_ms};
use crate::shared::Side;

/// `trades_insert_input` object.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TradeInsert {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    pub price: String,
    pub quantity: String,
    /// RFC-3339, millisecond precision.
    pub timestamp: String,
    pub fee: String,
    pub order_id: String,
    pub trade_id: String,
    pub exchange_account_id: Uuid,
}

impl From<&TradeRecord> for TradeInsert {
    fn from(t: &TradeRecord) -> Self {
        Self {
            base_asset: t.base_asset.clone(),
            quote_asset: t.quote_asset.clone(),
            side: t.side,
            price: t.price.clone(),
            quantity: t.quantity.clone(),
            timestamp: t.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            fee: t.fee.clone(),
            order_id: t.order_id.clone(),
            trade_id: t.trade_id.clone(),
            exchange_account_id: t.account_id,
        }
    }
}

/// `funding_payments_insert_input` object. The column is epoch milliseconds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FundingPaymentInsert {
    pub exchange_account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub amount: String,
    pub timestamp: i64,
    pub payment_id: String,
}

impl From<&FundingPaymentRecord> for FundingPaymentInsert {
    fn from(f: &FundingPaymentRecord) -> Self {
        Self {
            exchange_account_id: f.account_id,
            base_asset: f.base_asset.clone(),
            quote_asset: f.quote_asset.clone(),
            amount: f.amount.clone(),
            timestamp: f.timestamp.timestamp_millis(),
            payment_id: f.payment_id.clone(),
        }
    }
}

/// A row of the `trades` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoredTrade {
    pub id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    #[serde(with = "text_or_number")]
    pub price: String,
    #[serde(with = "text_or_number")]
    pub quantity: String,
    #[serde(with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(with = "text_or_number")]
    pub fee: String,
    pub order_id: String,
    pub trade_id: String,
    pub exchange_account_id: Uuid,
}

/// A row of the `funding_payments` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoredFundingPayment {
    pub id: Uuid,
    pub exchange_account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(with = "text_or_number")]
    pub amount: String,
    #[serde(with = "timestamp_ms")]
    pub timestamp: DateTime<Utc>,
    pub payment_id: String,
}

/// `positions_insert_input` object. Times are epoch milliseconds.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PositionInsert {
    pub exchange_account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub side: PositionSide,
    pub start_time: i64,
    pub end_time: i64,
    pub entry_avg_price: String,
    pub exit_avg_price: String,
    pub total_quantity: String,
    pub total_fees: String,
    pub realized_pnl: String,
}

impl From<&PositionRecord> for PositionInsert {
    fn from(p: &PositionRecord) -> Self {
        Self {
            exchange_account_id: p.account_id,
            base_asset: p.base_asset.clone(),
            quote_asset: p.quote_asset.clone(),
            side: p.side,
            start_time: p.start_time.timestamp_millis(),
            end_time: p.end_time.timestamp_millis(),
            entry_avg_price: p.entry_avg_price.clone(),
            exit_avg_price: p.exit_avg_price.clone(),
            total_quantity: p.total_quantity.clone(),
            total_fees: p.total_fees.clone(),
            realized_pnl: p.realized_pnl.clone(),
        }
    }
}

/// A row of the `positions` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoredPosition {
    pub id: Uuid,
    pub exchange_account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub side: PositionSide,
    #[serde(with = "timestamp_ms")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp_ms")]
    pub end_time: DateTime<Utc>,
    #[serde(with = "text_or_number")]
    pub entry_avg_price: String,
    #[serde(with = "text_or_number")]
    pub exit_avg_price: String,
    #[serde(with = "text_or_number")]
    pub total_quantity: String,
    #[serde(with = "text_or_number")]
    pub total_fees: String,
    #[serde(with = "text_or_number")]
    pub realized_pnl: String,
}

/// A row of the `position_trades` junction table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoredPositionTrade {
    pub position_id: Uuid,
    pub trade_id: Uuid,
    #[serde(with = "text_or_number")]
    pub allocation_percentage: String,
    #[serde(with = "text_or_number")]
    pub allocated_quantity: String,
    #[serde(with = "text_or_number")]
    pub allocated_fees: String,
}

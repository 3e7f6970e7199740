//! Trade domain: normalized fills.

mod convert;
pub mod wire;

use crate::shared::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A write-ready trade execution record.
///
/// Numeric fields are decimal text exactly as normalized from the wire.
/// `trade_id` identifies a single fill; it is never a transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRecord {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
    pub price: String,
    pub quantity: String,
    pub fee: String,
    pub timestamp: DateTime<Utc>,
    pub order_id: String,
    pub trade_id: String,
    pub account_id: Uuid,
}

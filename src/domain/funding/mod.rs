//! Funding domain: periodic perpetual funding settlements.

mod convert;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A write-ready funding payment.
///
/// `amount` is signed decimal text: positive when received, negative when paid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundingPaymentRecord {
    pub account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub amount: String,
    pub timestamp: DateTime<Utc>,
    pub payment_id: String,
}

/// Deterministic payment id for venues that do not supply a per-account one.
///
/// Assumes at most one settlement per asset per millisecond per account.
pub fn synthesize_payment_id(timestamp: DateTime<Utc>, base_asset: &str) -> String {
    format!("{}_{}", timestamp.timestamp_millis(), base_asset)
}

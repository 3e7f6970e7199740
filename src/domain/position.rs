//! Closed positions and the trades allocated to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed position, ready to store. Numeric fields are decimal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub account_id: Uuid,
    pub base_asset: String,
    pub quote_asset: String,
    pub side: PositionSide,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub entry_avg_price: String,
    pub exit_avg_price: String,
    pub total_quantity: String,
    pub total_fees: String,
    pub realized_pnl: String,
}

/// Share of one stored trade attributed to one stored position.
///
/// Both ids are backend row ids, not exchange ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTradeLink {
    pub position_id: Uuid,
    pub trade_id: Uuid,
    pub allocation_percentage: String,
    pub allocated_quantity: String,
    pub allocated_fees: String,
}

/// Filter for listing positions. Unset fields do not constrain; time bounds
/// are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionFilter {
    pub account_ids: Vec<Uuid>,
    pub base_asset: Option<String>,
    pub quote_asset: Option<String>,
    pub side: Option<PositionSide>,
    pub start_time_gte: Option<DateTime<Utc>>,
    pub start_time_lte: Option<DateTime<Utc>>,
    pub end_time_gte: Option<DateTime<Utc>>,
    pub end_time_lte: Option<DateTime<Utc>>,
}

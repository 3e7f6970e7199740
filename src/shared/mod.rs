//! Shared newtypes and normalization utilities used across all domain modules.

pub mod normalize;
pub mod serde_util;

pub use normalize::{normalize_side, numeric_to_text, parse_asset_pair, parse_timestamp, WireValue};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Side ────────────────────────────────────────────────────────────────────

/// Canonical trade direction. Serializes as `"buy"` / `"sell"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Watermark ───────────────────────────────────────────────────────────────

/// Lower bound (inclusive) on record timestamps requested from an exchange.
///
/// The empty watermark means "fetch full history" and disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Watermark(Option<DateTime<Utc>>);

impl Watermark {
    pub const FULL_HISTORY: Watermark = Watermark(None);

    pub fn since(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_full_history(&self) -> bool {
        self.0.is_none()
    }

    /// Whether a record stamped `ts` passes the filter.
    pub fn admits(&self, ts: DateTime<Utc>) -> bool {
        match self.0 {
            Some(since) => ts >= since,
            None => true,
        }
    }

    /// Epoch milliseconds used to seed the pagination cursor (0 for full history).
    pub fn start_millis(&self) -> i64 {
        self.0.map(|t| t.timestamp_millis().max(0)).unwrap_or(0)
    }
}

impl From<DateTime<Utc>> for Watermark {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::since(instant)
    }
}

impl From<Option<DateTime<Utc>>> for Watermark {
    fn from(instant: Option<DateTime<Utc>>) -> Self {
        Self(instant)
    }
}

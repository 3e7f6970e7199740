//! Wire → canonical normalization.
//!
//! Exchanges send numeric fields as either JSON numbers or strings, timestamps
//! in several encodings, and venue-specific side codes. Everything here is a
//! pure function; nothing holds state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IngestError;
use crate::network::DEFAULT_QUOTE_ASSET;
use crate::shared::Side;

/// A scalar that may arrive as a JSON number or as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Number(serde_json::Number),
    Text(String),
}

impl WireValue {
    pub fn text(s: impl Into<String>) -> Self {
        WireValue::Text(s.into())
    }

    /// True for an empty or whitespace-only string. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, WireValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Number(n) => write!(f, "{}", n),
            WireValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        WireValue::Number(v.into())
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        WireValue::Text(v.to_string())
    }
}

/// Render a numeric wire value as decimal text.
///
/// Strings pass through untouched. Integers are printed exactly. Floats use
/// the shortest representation that parses back to the same `f64`, never in
/// exponent form, with trailing zeros and a dangling decimal point removed.
pub fn numeric_to_text(value: &WireValue) -> String {
    match value {
        WireValue::Text(s) => s.clone(),
        WireValue::Number(n) => number_to_text(n),
    }
}

fn number_to_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => trim_fraction(format!("{}", f)),
        None => n.to_string(),
    }
}

fn trim_fraction(formatted: String) -> String {
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Parse epoch milliseconds (number or numeric text) or an RFC-3339 string
/// into a UTC instant.
pub fn parse_timestamp(value: &WireValue) -> Result<DateTime<Utc>, IngestError> {
    match value {
        WireValue::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => Some(ms),
                None => n.as_f64().and_then(truncate_millis),
            };
            millis
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .ok_or_else(|| IngestError::MalformedTimestamp(n.to_string()))
        }
        WireValue::Text(s) => {
            let trimmed = s.trim();
            let millis = trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate_millis));
            if let Some(ms) = millis {
                return DateTime::<Utc>::from_timestamp_millis(ms)
                    .ok_or_else(|| IngestError::MalformedTimestamp(s.clone()));
            }
            DateTime::parse_from_rfc3339(trimmed)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|_| IngestError::MalformedTimestamp(s.clone()))
        }
    }
}

/// Fractional milliseconds are dropped.
fn truncate_millis(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

/// Map a venue side code onto [`Side`], case-insensitively.
///
/// Close and liquidation codes count as sells. Unrecognized codes fall back
/// to `Buy`; that fallback hides bad input and is pinned by tests.
pub fn normalize_side(code: &str) -> Side {
    match code.trim().to_uppercase().as_str() {
        "B" | "BUY" | "LONG" => Side::Buy,
        "S" | "SELL" | "SHORT" => Side::Sell,
        "A" | "CLOSE" | "LIQUIDATION" => Side::Sell,
        _ => Side::Buy,
    }
}

/// Split `"BASE-QUOTE"`. A symbol without a separator is all base, quoted in
/// [`DEFAULT_QUOTE_ASSET`].
pub fn parse_asset_pair(symbol: &str) -> (String, String) {
    let mut parts = symbol.split('-');
    let base = parts.next().unwrap_or_default();
    match parts.next() {
        Some(quote) if !quote.is_empty() => (base.to_string(), quote.to_string()),
        _ => (base.to_string(), DEFAULT_QUOTE_ASSET.to_string()),
    }
}

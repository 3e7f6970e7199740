//! Conversions from wire fills to trade records.

use super::wire::HyperliquidFill;
use super::TradeRecord;
use crate::error::IngestError;
use crate::shared::{normalize_side, numeric_to_text, parse_asset_pair, parse_timestamp, WireValue};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl HyperliquidFill {
    /// Execution time of the fill.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, IngestError> {
        match &self.time {
            Some(time) if !time.is_blank() => parse_timestamp(time),
            _ => Err(IngestError::missing("time", self.describe())),
        }
    }

    /// Per-fill id as text, if present.
    pub fn fill_id(&self) -> Option<String> {
        self.tid
            .as_ref()
            .filter(|tid| !tid.is_blank())
            .map(numeric_to_text)
    }

    pub fn to_trade_record(&self, account_id: Uuid) -> Result<TradeRecord, IngestError> {
        let coin = self
            .coin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IngestError::missing("coin", self.describe()))?;
        let (base_asset, quote_asset) = parse_asset_pair(coin);
        if base_asset.trim().is_empty() {
            return Err(IngestError::missing("coin", self.describe()));
        }

        Ok(TradeRecord {
            base_asset,
            quote_asset,
            side: normalize_side(self.side.as_deref().unwrap_or_default()),
            price: self.required("px", &self.px)?,
            quantity: self.required("sz", &self.sz)?,
            fee: self.required("fee", &self.fee)?,
            timestamp: self.timestamp()?,
            order_id: self.required("oid", &self.oid)?,
            trade_id: self
                .fill_id()
                .ok_or_else(|| IngestError::missing("tid", self.describe()))?,
            account_id,
        })
    }

    fn required(
        &self,
        field: &'static str,
        value: &Option<WireValue>,
    ) -> Result<String, IngestError> {
        match value {
            Some(v) if !v.is_blank() => Ok(numeric_to_text(v)),
            _ => Err(IngestError::missing(field, self.describe())),
        }
    }

    /// Identifying fields for error context.
    fn describe(&self) -> String {
        let show = |v: &Option<WireValue>| v.as_ref().map(|v| v.to_string()).unwrap_or_default();
        format!(
            "fill coin={} tid={} oid={} hash={} time={}",
            self.coin.as_deref().unwrap_or_default(),
            show(&self.tid),
            show(&self.oid),
            self.hash.as_deref().unwrap_or_default(),
            show(&self.time),
        )
    }
}

//! Conversions from wire funding entries to funding payment records.

use super::wire::HyperliquidFundingPayment;
use super::{synthesize_payment_id, FundingPaymentRecord};
use crate::error::IngestError;
use crate::shared::{numeric_to_text, parse_asset_pair, parse_timestamp};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl HyperliquidFundingPayment {
    pub fn timestamp(&self) -> Result<DateTime<Utc>, IngestError> {
        match &self.time {
            Some(time) if !time.is_blank() => parse_timestamp(time),
            _ => Err(IngestError::missing("time", self.describe())),
        }
    }

    pub fn to_funding_record(&self, account_id: Uuid) -> Result<FundingPaymentRecord, IngestError> {
        let timestamp = self.timestamp()?;
        let delta = self
            .delta
            .as_ref()
            .ok_or_else(|| IngestError::missing("delta", self.describe()))?;
        let coin = delta
            .coin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| IngestError::missing("delta.coin", self.describe()))?;
        let amount = delta
            .usdc
            .as_ref()
            .filter(|v| !v.is_blank())
            .map(numeric_to_text)
            .ok_or_else(|| IngestError::missing("delta.usdc", self.describe()))?;

        let (base_asset, quote_asset) = parse_asset_pair(coin);
        if base_asset.trim().is_empty() {
            return Err(IngestError::missing("delta.coin", self.describe()));
        }
        Ok(FundingPaymentRecord {
            account_id,
            payment_id: synthesize_payment_id(timestamp, &base_asset),
            base_asset,
            quote_asset,
            amount,
            timestamp,
        })
    }

    fn describe(&self) -> String {
        format!(
            "funding coin={} hash={} time={}",
            self.delta
                .as_ref()
                .and_then(|d| d.coin.as_deref())
                .unwrap_or_default(),
            self.hash.as_deref().unwrap_or_default(),
            self.time.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        )
    }
}

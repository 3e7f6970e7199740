//! Wire types for funding history responses.

use crate::shared::WireValue;
use serde::{Deserialize, Serialize};

/// One element of Hyperliquid's `userFunding` response array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HyperliquidFundingPayment {
    pub time: Option<WireValue>,
    pub hash: Option<String>,
    pub delta: Option<FundingDelta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FundingDelta {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub coin: Option<String>,
    pub usdc: Option<WireValue>,
    pub szi: Option<WireValue>,
    pub funding_rate: Option<WireValue>,
    pub n_samples: Option<WireValue>,
}

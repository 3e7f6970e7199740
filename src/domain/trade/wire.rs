//! Wire types for exchange fill responses.

use crate::shared::WireValue;
use serde::{Deserialize, Serialize};

/// One element of Hyperliquid's `userFillsByTime` response array.
///
/// Every field is optional so that a record with a missing field decodes and
/// can be reported precisely instead of failing the whole page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HyperliquidFill {
    pub coin: Option<String>,
    pub px: Option<WireValue>,
    pub sz: Option<WireValue>,
    pub side: Option<String>,
    pub time: Option<WireValue>,
    pub start_position: Option<WireValue>,
    pub dir: Option<String>,
    pub closed_pnl: Option<WireValue>,
    /// Transaction hash. Shared by every fill of one transaction.
    pub hash: Option<String>,
    pub oid: Option<WireValue>,
    pub crossed: Option<bool>,
    pub fee: Option<WireValue>,
    /// Per-fill id.
    pub tid: Option<WireValue>,
    pub fee_token: Option<String>,
}

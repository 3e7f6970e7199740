//! Network URL constants and venue defaults.

/// Default Hyperliquid REST API base URL.
pub const HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";

/// Quote asset assumed when a symbol carries no separator.
pub const DEFAULT_QUOTE_ASSET: &str = "USDC";

//! # perp-ledger
//!
//! Ingests trading history (fills and funding payments) from on-chain
//! derivatives exchanges and normalizes it into write-ready records.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Shared**: Normalization of loosely-typed wire values, newtypes, watermarks
//! 2. **Domain**: Canonical records, wire types, wire → record conversions
//! 3. **HTTP**: `ExchangeHttp` with cancellation-aware requests and retry policies
//! 4. **Exchange**: The `ExchangeClient` trait, adapters, and the registry
//! 5. **Store**: Duplicate-tolerant batch persistence over a GraphQL backend
//! 6. **Sync**: Watermark → fetch → persist entry points
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perp_ledger::prelude::*;
//!
//! let client = HyperliquidClient::builder().build()?;
//! let account = Account::new("6f1c...", "0xabc...");
//! let ctx = CallContext::with_timeout(Duration::from_secs(30));
//!
//! let trades = client.fetch_trades(&ctx, &account, Watermark::FULL_HISTORY).await?;
//! let stored = store.add_trades(&ctx, &trades).await?;
//! ```

// ── Layer 1: Shared ──────────────────────────────────────────────────────────

/// Normalization helpers and shared newtypes.
pub mod shared;

/// Cancellable deadline context threaded through every outbound call.
pub mod context;

/// Error taxonomy.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Domain ──────────────────────────────────────────────────────────

/// Domain modules (vertical slices): records, wire types, conversions.
pub mod domain;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// HTTP client with retry policies.
pub mod http;

// ── Layer 4: Exchange adapters ───────────────────────────────────────────────

/// `ExchangeClient` contract, registry, and per-exchange adapters.
pub mod exchange;

// ── Layer 5: Persistence ─────────────────────────────────────────────────────

/// Resilient batch persistence.
pub mod store;

// ── Layer 6: Sync ────────────────────────────────────────────────────────────

/// Incremental sync of one account into the store.
pub mod sync;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{Side, Watermark};

    // Context
    pub use crate::context::{CallContext, Interrupted};

    // Domain types
    pub use crate::domain::account::{Account, ValidatedAccount};
    pub use crate::domain::funding::FundingPaymentRecord;
    pub use crate::domain::position::{
        PositionFilter, PositionRecord, PositionSide, PositionTradeLink,
    };
    pub use crate::domain::trade::TradeRecord;

    // Errors
    pub use crate::error::{HttpError, IngestError, StoreError};

    // Network
    pub use crate::network::{DEFAULT_QUOTE_ASSET, HYPERLIQUID_API_URL};

    // HTTP
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // Exchange
    pub use crate::exchange::hyperliquid::{HyperliquidClient, HyperliquidClientBuilder};
    pub use crate::exchange::{ExchangeClient, ExchangeRegistry};

    // Store
    pub use crate::store::hasura::{HasuraConfig, HasuraTransport};
    pub use crate::store::{
        GraphqlTransport, LedgerStore, StoredFundingPayment, StoredPosition, StoredPositionTrade,
        StoredTrade,
    };

    // Sync
    pub use crate::sync::{sync_funding_payments, sync_trades, SyncReport};
}

//! Exchange adapters.
//!
//! Each venue implements [`ExchangeClient`] and is looked up by name through
//! [`ExchangeRegistry`].

pub mod hyperliquid;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::context::CallContext;
use crate::domain::account::Account;
use crate::domain::funding::FundingPaymentRecord;
use crate::domain::trade::TradeRecord;
use crate::error::IngestError;
use crate::shared::Watermark;

/// Contract every exchange adapter satisfies.
///
/// Both fetch operations:
/// - check `ctx` before any network operation and between pages, returning
///   `Canceled` / `DeadlineExceeded` with no partial results;
/// - return only records with `timestamp >= since` (everything for
///   [`Watermark::FULL_HISTORY`]), sorted ascending by timestamp;
/// - abort with `MissingRequiredField` / `MalformedTimestamp` on a record
///   that cannot be normalized, instead of dropping it.
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl ExchangeClient for MyVenue {
///     fn name(&self) -> &str {
///         "myvenue"
///     }
///
///     async fn fetch_trades(&self, ctx: &CallContext, account: &Account, since: Watermark)
///         -> Result<Vec<TradeRecord>, IngestError> {
///         // Implementation
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Stable, non-empty exchange identifier (e.g. `"hyperliquid"`).
    fn name(&self) -> &str;

    async fn fetch_trades(
        &self,
        ctx: &CallContext,
        account: &Account,
        since: Watermark,
    ) -> Result<Vec<TradeRecord>, IngestError>;

    async fn fetch_funding_payments(
        &self,
        ctx: &CallContext,
        account: &Account,
        since: Watermark,
    ) -> Result<Vec<FundingPaymentRecord>, IngestError>;
}

/// Exchange name → adapter.
#[derive(Default, Clone)]
pub struct ExchangeRegistry {
    clients: HashMap<String, Arc<dyn ExchangeClient>>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in adapter with default configuration.
    pub fn with_defaults() -> Result<Self, IngestError> {
        let mut registry = Self::new();
        registry.register(Arc::new(hyperliquid::HyperliquidClient::builder().build()?));
        Ok(registry)
    }

    /// Register an adapter under its own `name()`, replacing any previous one.
    pub fn register(&mut self, client: Arc<dyn ExchangeClient>) {
        let name = client.name().to_string();
        info!(exchange = %name, "Registering exchange client");
        self.clients.insert(name, client);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExchangeClient>> {
        self.clients.get(name).cloned()
    }

    /// Registered exchange names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clients.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ExchangeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRegistry")
            .field("exchanges", &self.names())
            .finish()
    }
}

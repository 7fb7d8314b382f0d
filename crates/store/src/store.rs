//! Shared store handle.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use kassenwart_core::usage::UsageCache;
use kassenwart_core::voucher::{PostingContext, Sphere};
use kassenwart_shared::{AppConfig, CashAdvanceConfig, LedgerConfig};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::repositories::{
    BudgetRepository, CashAdvanceRepository, EarmarkRepository, VoucherRepository,
};
use crate::state::LedgerState;

/// In-memory ledger store.
///
/// Cloning is cheap; clones share the same state, cache and clock.
/// Writers hold the lock for the whole validate-then-write unit.
#[derive(Clone)]
pub struct Store {
    state: Arc<RwLock<LedgerState>>,
    cache: UsageCache,
    ledger: Arc<LedgerConfig>,
    default_sphere: Option<Sphere>,
    cash_advance: CashAdvanceConfig,
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Creates an empty store using the wall clock.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an empty store with an injected clock.
    #[must_use]
    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let ledger = config.ledger.clone();
        let default_sphere = parse_default_sphere(&ledger.default_sphere);
        Self {
            state: Arc::new(RwLock::new(LedgerState::new(ledger.locked_until))),
            cache: UsageCache::with_config(
                ledger.usage_cache_capacity,
                ledger.usage_cache_ttl_secs,
            ),
            ledger: Arc::new(ledger),
            default_sphere,
            cash_advance: config.cash_advance,
            clock,
        }
    }

    /// Voucher repository over this store.
    #[must_use]
    pub fn vouchers(&self) -> VoucherRepository {
        VoucherRepository::new(self.clone())
    }

    /// Budget repository over this store.
    #[must_use]
    pub fn budgets(&self) -> BudgetRepository {
        BudgetRepository::new(self.clone())
    }

    /// Earmark repository over this store.
    #[must_use]
    pub fn earmarks(&self) -> EarmarkRepository {
        EarmarkRepository::new(self.clone())
    }

    /// Cash advance repository over this store.
    #[must_use]
    pub fn cash_advances(&self) -> CashAdvanceRepository {
        CashAdvanceRepository::new(self.clone())
    }

    /// Usage cache shared by all repositories.
    #[must_use]
    pub fn cache(&self) -> &UsageCache {
        &self.cache
    }

    /// Ledger settings.
    #[must_use]
    pub fn ledger_config(&self) -> &LedgerConfig {
        &self.ledger
    }

    /// Sphere for generated counter vouchers, if configured and valid.
    #[must_use]
    pub const fn default_sphere(&self) -> Option<Sphere> {
        self.default_sphere
    }

    /// Cash advance policies.
    #[must_use]
    pub const fn cash_advance_config(&self) -> &CashAdvanceConfig {
        &self.cash_advance
    }

    /// Current instant from the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current date from the injected clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Current period lock.
    pub async fn locked_until(&self) -> Option<NaiveDate> {
        self.state.read().await.locked_until
    }

    /// Moves the period lock. `None` unlocks everything.
    pub async fn set_locked_until(&self, locked_until: Option<NaiveDate>) {
        let mut state = self.state.write().await;
        state.locked_until = locked_until;
        info!(locked_until = ?locked_until, "Period lock moved");
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().await
    }

    /// Posting context for a unit running under `state`'s lock.
    pub(crate) fn posting_context(&self, state: &LedgerState) -> PostingContext {
        PostingContext::new(self.today(), state.locked_until)
    }
}

/// Blank means no default. An unknown code is logged and ignored.
fn parse_default_sphere(raw: &str) -> Option<Sphere> {
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse::<Sphere>() {
        Ok(sphere) => Some(sphere),
        Err(e) => {
            warn!(
                default_sphere = raw,
                error = %e,
                "Invalid ledger.default_sphere ignored"
            );
            None
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("ledger", &self.ledger)
            .field("default_sphere", &self.default_sphere)
            .field("cash_advance", &self.cash_advance)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

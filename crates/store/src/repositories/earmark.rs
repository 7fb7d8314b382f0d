//! Earmark repository.

use kassenwart_core::earmark::{
    CreateEarmarkInput, Earmark, EarmarkError, EarmarkService, UpdateEarmarkInput,
};
use kassenwart_core::usage::{EarmarkUsage, UsageAggregator};
use kassenwart_shared::EarmarkId;
use tracing::{debug, info, warn};

use crate::store::Store;

/// Earmark repository for CRUD operations and usage.
#[derive(Debug, Clone)]
pub struct EarmarkRepository {
    store: Store,
}

impl EarmarkRepository {
    /// Creates a new earmark repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates an earmark with a unique code.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCode`, `DuplicateCode` or `NegativeAmount`.
    pub async fn create(&self, input: CreateEarmarkInput) -> Result<Earmark, EarmarkError> {
        let mut state = self.store.write().await;
        let id = state.earmark_ids.next_id();
        let earmark = EarmarkService::create(id, input, self.store.now(), |code| {
            state.earmarks.values().any(|e| e.code == code)
        })?;
        state.earmarks.insert(earmark.id, earmark.clone());

        info!(earmark_id = %earmark.id, code = %earmark.code, "Earmark created");
        Ok(earmark)
    }

    /// Gets an earmark by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the earmark does not exist.
    pub async fn get(&self, id: EarmarkId) -> Result<Earmark, EarmarkError> {
        self.store
            .read()
            .await
            .earmarks
            .get(&id)
            .cloned()
            .ok_or(EarmarkError::NotFound(id))
    }

    /// Lists earmarks ordered by code.
    pub async fn list(&self, include_archived: bool) -> Vec<Earmark> {
        let state = self.store.read().await;
        let mut earmarks: Vec<Earmark> = state
            .earmarks
            .values()
            .filter(|e| include_archived || !e.archived)
            .cloned()
            .collect();
        earmarks.sort_by(|a, b| a.code.cmp(&b.code));
        earmarks
    }

    /// Updates an earmark.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `EmptyCode`, `DuplicateCode` or `NegativeAmount`.
    pub async fn update(
        &self,
        id: EarmarkId,
        input: UpdateEarmarkInput,
    ) -> Result<Earmark, EarmarkError> {
        let mut state = self.store.write().await;
        let existing = state.earmarks.get(&id).ok_or(EarmarkError::NotFound(id))?;
        let earmark = EarmarkService::apply_update(existing, input, self.store.now(), |code| {
            state.earmarks.values().any(|e| e.id != id && e.code == code)
        })?;

        state.earmarks.insert(id, earmark.clone());
        self.store.cache().invalidate_earmark(id);

        info!(earmark_id = %id, code = %earmark.code, "Earmark updated");
        Ok(earmark)
    }

    /// Deletes an earmark no voucher allocates to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `InUse`.
    pub async fn delete(&self, id: EarmarkId) -> Result<(), EarmarkError> {
        let mut state = self.store.write().await;
        if !state.earmarks.contains_key(&id) {
            return Err(EarmarkError::NotFound(id));
        }
        let vouchers = state.earmark_voucher_count(id);
        if vouchers > 0 {
            warn!(earmark_id = %id, vouchers, "Earmark delete rejected, still referenced");
            return Err(EarmarkError::InUse {
                earmark_id: id,
                vouchers,
            });
        }

        state.earmarks.remove(&id);
        self.store.cache().invalidate_earmark(id);
        info!(earmark_id = %id, "Earmark deleted");
        Ok(())
    }

    /// Usage of an earmark, cached between writes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the earmark does not exist.
    pub async fn usage(&self, id: EarmarkId) -> Result<EarmarkUsage, EarmarkError> {
        let state = self.store.read().await;
        let earmark = state.earmarks.get(&id).ok_or(EarmarkError::NotFound(id))?;

        if let Some(usage) = self.store.cache().earmark(id) {
            debug!(earmark_id = %id, "Earmark usage cache hit");
            return Ok(usage);
        }

        let usage = UsageAggregator::earmark_usage(earmark, state.vouchers.values());
        self.store.cache().put_earmark(usage);
        Ok(usage)
    }
}

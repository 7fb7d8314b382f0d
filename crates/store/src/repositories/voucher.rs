//! Voucher repository: the ledger's atomic create, update and delete units.

use std::collections::HashSet;

use kassenwart_core::budget::Budget;
use kassenwart_core::earmark::Earmark;
use kassenwart_core::voucher::{
    Voucher, VoucherDraft, VoucherError, VoucherFilter, VoucherPatch, VoucherQuery,
    VoucherReference, VoucherSort, VoucherWarning,
};
use kassenwart_shared::{PageRequest, PageResponse, VoucherId};
use serde::Serialize;
use tracing::{info, warn};

use crate::store::Store;

/// A persisted voucher with the warnings produced while writing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoucherWrite {
    /// Stored voucher.
    pub voucher: Voucher,
    /// Non-blocking warnings.
    pub warnings: Vec<VoucherWarning>,
}

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    store: Store,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Validates and stores a new voucher.
    ///
    /// The number is assigned inside the same write-locked unit, so
    /// concurrent creates never share a sequence number.
    ///
    /// # Errors
    ///
    /// Returns any validation error; nothing is stored in that case.
    pub async fn create(&self, draft: &VoucherDraft) -> Result<VoucherWrite, VoucherError> {
        let mut state = self.store.write().await;
        let ctx = self.store.posting_context(&state);
        let scheme = self.store.ledger_config().classification_scheme;

        match state.insert_voucher(draft, scheme, &ctx, self.store.cache(), self.store.now()) {
            Ok((voucher, warnings)) => {
                info!(
                    voucher_id = %voucher.id,
                    voucher_no = %voucher.voucher_no,
                    warnings = warnings.len(),
                    "Voucher created"
                );
                Ok(VoucherWrite { voucher, warnings })
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Voucher rejected");
                Err(e)
            }
        }
    }

    /// Applies a patch to a stored voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `ConcurrentModification`, `PeriodLocked` or any
    /// validation error.
    pub async fn update(
        &self,
        id: VoucherId,
        patch: &VoucherPatch,
    ) -> Result<VoucherWrite, VoucherError> {
        let mut state = self.store.write().await;
        let ctx = self.store.posting_context(&state);
        let scheme = self.store.ledger_config().classification_scheme;

        match state.update_voucher(id, patch, scheme, &ctx, self.store.cache(), self.store.now()) {
            Ok((voucher, warnings)) => {
                info!(voucher_id = %id, version = voucher.version, "Voucher updated");
                Ok(VoucherWrite { voucher, warnings })
            }
            Err(e) => {
                warn!(
                    voucher_id = %id,
                    error = %e,
                    code = e.error_code(),
                    "Voucher update rejected"
                );
                Err(e)
            }
        }
    }

    /// Deletes a voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `ReferencedElsewhere` or `PeriodLocked`.
    pub async fn delete(&self, id: VoucherId) -> Result<(), VoucherError> {
        let mut state = self.store.write().await;
        let ctx = self.store.posting_context(&state);

        match state.delete_voucher(id, &ctx, self.store.cache()) {
            Ok(voucher) => {
                info!(voucher_id = %id, voucher_no = %voucher.voucher_no, "Voucher deleted");
                Ok(())
            }
            Err(e) => {
                warn!(
                    voucher_id = %id,
                    error = %e,
                    code = e.error_code(),
                    "Voucher delete rejected"
                );
                Err(e)
            }
        }
    }

    /// Registers a dependent record pointing at a voucher.
    ///
    /// # Errors
    ///
    /// Returns `ReservedReference` for cash advance links and `NotFound` if
    /// the voucher does not exist.
    pub async fn link_reference(
        &self,
        id: VoucherId,
        reference: VoucherReference,
    ) -> Result<(), VoucherError> {
        ensure_caller_managed(id, reference)?;
        let mut state = self.store.write().await;
        if !state.vouchers.contains_key(&id) {
            return Err(VoucherError::NotFound(id));
        }
        state.references.entry(id).or_default().insert(reference);
        info!(voucher_id = %id, reference = ?reference, "Voucher reference linked");
        Ok(())
    }

    /// Removes a dependent record. Returns whether it was registered.
    ///
    /// # Errors
    ///
    /// Returns `ReservedReference` for cash advance links and `NotFound` if
    /// the voucher does not exist.
    pub async fn unlink_reference(
        &self,
        id: VoucherId,
        reference: VoucherReference,
    ) -> Result<bool, VoucherError> {
        ensure_caller_managed(id, reference)?;
        let mut state = self.store.write().await;
        if !state.vouchers.contains_key(&id) {
            return Err(VoucherError::NotFound(id));
        }
        let removed = state
            .references
            .get_mut(&id)
            .is_some_and(|refs| refs.remove(&reference));
        if state.references.get(&id).is_some_and(HashSet::is_empty) {
            state.references.remove(&id);
        }
        info!(voucher_id = %id, reference = ?reference, removed, "Voucher reference unlinked");
        Ok(removed)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Gets a voucher by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the voucher does not exist.
    pub async fn get(&self, id: VoucherId) -> Result<Voucher, VoucherError> {
        self.store
            .read()
            .await
            .vouchers
            .get(&id)
            .cloned()
            .ok_or(VoucherError::NotFound(id))
    }

    /// Dependent records pointing at a voucher.
    pub async fn references(&self, id: VoucherId) -> Vec<VoucherReference> {
        self.store
            .read()
            .await
            .references
            .get(&id)
            .map(|refs| refs.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Filters, sorts and paginates vouchers.
    pub async fn list(
        &self,
        filter: &VoucherFilter,
        sort: VoucherSort,
        page: PageRequest,
    ) -> PageResponse<Voucher> {
        let state = self.store.read().await;
        VoucherQuery::run(
            state.vouchers.values(),
            filter,
            sort,
            page,
            |id| state.budgets.get(&id).map(Budget::label),
            |id| state.earmarks.get(&id).map(Earmark::label),
        )
    }
}

fn ensure_caller_managed(id: VoucherId, reference: VoucherReference) -> Result<(), VoucherError> {
    if reference.is_caller_managed() {
        return Ok(());
    }
    warn!(voucher_id = %id, reference = ?reference, "Reserved voucher reference rejected");
    Err(VoucherError::ReservedReference(reference))
}

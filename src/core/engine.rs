//! Settlement engine
//!
//! This module provides the SettlementEngine that owns the ledger store and
//! routes incoming activity to it: debits and credits become new entries,
//! payments run the settlement allocation.
//!
//! The engine enforces business rules such as:
//! - Party ids must be non-nil before any ledger is touched
//! - Debit status and outstanding amounts change only through settlement
//! - Payments allocate against a single (vendor, buyer) pair at a time

use rust_decimal::Decimal;

use crate::core::ledger_store::LedgerStore;
use crate::core::settlement::{settle_pair, validate_settle_args};
use crate::types::{
    ActivityRecord, BuyerId, EntryDraft, EntryKind, PairKey, SettlementError, SettlementReport,
    VendorId,
};

/// Settlement engine over the synchronous ledger store
///
/// Owns the LedgerStore. All mutation of entry status, outstanding amounts,
/// and payment dates happens inside `settle`.
pub struct SettlementEngine {
    store: LedgerStore,
}

impl SettlementEngine {
    /// Create a new SettlementEngine
    ///
    /// Initializes an empty engine with no recorded pairs.
    ///
    /// # Returns
    ///
    /// A new SettlementEngine ready to process activity
    pub fn new() -> Self {
        SettlementEngine {
            store: LedgerStore::new(),
        }
    }

    /// Process a single activity record
    ///
    /// Routes the record by kind: debits and credits are appended to the
    /// pair's ledger, payments run the full settlement allocation.
    ///
    /// # Arguments
    ///
    /// * `record` - The activity record to process
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the record was processed successfully
    /// * `Err(SettlementError)` if the record failed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A party id is nil
    /// - The amount is invalid for the record's kind
    /// - A payment's allocation halted mid-way
    pub fn apply(&mut self, record: ActivityRecord) -> Result<(), SettlementError> {
        match record.kind {
            EntryKind::Debit | EntryKind::Credit => {
                self.store.create(EntryDraft {
                    vendor: record.vendor,
                    buyer: record.buyer,
                    kind: record.kind,
                    amount: record.amount,
                    remarks: record.remarks,
                    created_at: None,
                })?;
                Ok(())
            }
            EntryKind::Payment => self
                .settle(record.vendor, record.buyer, record.amount, record.remarks)
                .map(|_| ()),
        }
    }

    /// Settle a payment from a buyer to a vendor
    ///
    /// Records the payment entry, then allocates it across the pair's
    /// outstanding debits, oldest first.
    ///
    /// # Arguments
    ///
    /// * `vendor` - The vendor receiving the payment
    /// * `buyer` - The buyer the payment came from
    /// * `payment_amount` - The raw amount received; must be non-negative
    /// * `remarks` - Annotation carried onto the payment entry
    ///
    /// # Returns
    ///
    /// * `Ok(SettlementReport)` with the full allocation outcome
    /// * `Err(SettlementError)` if validation failed or the allocation
    ///   halted part-way
    pub fn settle(
        &mut self,
        vendor: VendorId,
        buyer: BuyerId,
        payment_amount: Decimal,
        remarks: Option<String>,
    ) -> Result<SettlementReport, SettlementError> {
        // Validate before pair_mut so a rejected request cannot create
        // an empty pair ledger.
        validate_settle_args(vendor, buyer, payment_amount)?;

        let ledger = self.store.pair_mut(PairKey::new(vendor, buyer));
        settle_pair(ledger, vendor, buyer, payment_amount, remarks)
    }

    /// Read access to the underlying store for queries and output
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new()
    }
}

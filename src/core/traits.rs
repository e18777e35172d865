//! Core traits for pair-scoped ledger access
//!
//! This module defines the storage seam the settlement routine runs
//! against. Anything that can record, list, and update one pair's
//! entries can be settled: the in-memory ledgers used by both engines,
//! or instrumented doubles in tests.

use rust_decimal::Decimal;

use crate::types::{LedgerEntry, SettlementError};

/// Storage operations for one `(vendor, buyer)` pair's ledger
///
/// The settlement routine is generic over this trait. Implementations
/// must keep entry identity fields write-once: `update` persists only
/// the settlement-owned fields (`outstanding_amount`, `payment_status`,
/// `payment_date`) of an existing entry.
pub trait PairStore {
    /// Persist a newly constructed entry
    fn record(&mut self, entry: LedgerEntry) -> Result<(), SettlementError>;

    /// All outstanding debits for the pair, oldest first
    ///
    /// Returns entries with `kind = debit` and a non-`Paid` status,
    /// ordered ascending by `created_at` (ties break on id). This
    /// ordering carries the FIFO allocation policy.
    fn outstanding_debits(&self) -> Result<Vec<LedgerEntry>, SettlementError>;

    /// Persist the mutated settlement fields of an existing entry
    ///
    /// Fails with `EntryNotFound` if the entry's id is unknown.
    fn update(&mut self, entry: &LedgerEntry) -> Result<(), SettlementError>;

    /// Sum of `outstanding_amount` across the pair's outstanding debits
    fn sum_outstanding(&self) -> Result<Decimal, SettlementError>;
}

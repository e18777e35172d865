//! Per-pair ledger storage
//!
//! This module provides the `PairLedger` struct, the entry list for one
//! `(vendor, buyer)` pair. Both the synchronous and the thread-safe
//! stores keep one `PairLedger` per pair and delegate the settlement
//! operations to it, so the storage semantics live in exactly one place.
//!
//! # Invariants
//!
//! Entries are append-only: nothing is ever removed. `update` writes
//! only the settlement-owned fields of an existing entry; the identity
//! fields keep the values they were created with.

use rust_decimal::Decimal;

use crate::types::{LedgerEntry, SettlementError};

use super::traits::PairStore;

/// Entry list for one `(vendor, buyer)` pair
#[derive(Debug, Default)]
pub struct PairLedger {
    /// Every entry recorded for the pair, in insertion order
    entries: Vec<LedgerEntry>,
}

impl PairLedger {
    /// Create an empty pair ledger
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// All entries for the pair, in insertion order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Number of entries recorded for the pair
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pair has no entries yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PairStore for PairLedger {
    fn record(&mut self, entry: LedgerEntry) -> Result<(), SettlementError> {
        self.entries.push(entry);
        Ok(())
    }

    fn outstanding_debits(&self) -> Result<Vec<LedgerEntry>, SettlementError> {
        let mut debits: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.is_outstanding_debit())
            .cloned()
            .collect();

        // Oldest first; v7 entry ids break creation-time ties.
        debits.sort_by_key(|entry| (entry.created_at, entry.id));
        Ok(debits)
    }

    fn update(&mut self, updated: &LedgerEntry) -> Result<(), SettlementError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == updated.id)
            .ok_or_else(|| SettlementError::entry_not_found(updated.id, "update"))?;

        // Only the settlement-owned fields are written back.
        entry.outstanding_amount = updated.outstanding_amount;
        entry.payment_status = updated.payment_status;
        entry.payment_date = updated.payment_date;
        Ok(())
    }

    fn sum_outstanding(&self) -> Result<Decimal, SettlementError> {
        let mut total = Decimal::ZERO;
        for entry in self.entries.iter().filter(|e| e.is_outstanding_debit()) {
            total = total
                .checked_add(entry.outstanding_amount)
                .ok_or_else(|| SettlementError::arithmetic_overflow("sum_outstanding"))?;
        }
        Ok(total)
    }
}

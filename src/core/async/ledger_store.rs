//! Thread-safe ledger store using DashMap
//!
//! This module provides `AsyncLedgerStore`, a concurrent implementation of
//! the ledger store. Pair ledgers are held in a DashMap keyed by
//! (vendor, buyer), so activity for different pairs proceeds in parallel
//! while activity for the same pair synchronizes on that pair's entry.
//!
//! # Thread Safety
//!
//! - Operations on different pairs proceed concurrently
//! - `with_pair` holds the pair's entry lock for the whole closure, which
//!   is what serializes read-modify-write settlement cycles for a pair
//! - No global lock; contention is per pair

use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::core::pair_ledger::PairLedger;
use crate::core::traits::PairStore;
use crate::types::{
    BuyerId, EntryDraft, LedgerEntry, PairBalance, PairKey, SettlementError, VendorId,
    VendorSummary,
};

/// Concurrent store of all pair ledgers
#[derive(Debug, Default)]
pub struct AsyncLedgerStore {
    pairs: DashMap<PairKey, PairLedger>,
}

impl AsyncLedgerStore {
    /// Create a new empty AsyncLedgerStore
    pub fn new() -> Self {
        Self {
            pairs: DashMap::new(),
        }
    }

    /// Construct an entry from a draft and record it under its pair
    ///
    /// The draft is validated before the pair's entry is touched, so a
    /// rejected draft never creates an empty pair ledger.
    pub fn create(&self, draft: EntryDraft) -> Result<LedgerEntry, SettlementError> {
        let entry = LedgerEntry::from_draft(draft)?;
        let key = PairKey::new(entry.vendor, entry.buyer);
        self.pairs.entry(key).or_default().record(entry.clone())?;
        Ok(entry)
    }

    /// Run a closure against one pair's ledger under its entry lock
    ///
    /// The lock is held for the closure's whole duration, so a settlement's
    /// fetch, allocate, and write-back happen as one unit with respect to
    /// other callers of the same pair. Different pairs do not block each
    /// other.
    ///
    /// The closure must not call back into this store; re-entering the map
    /// while a pair's entry is held can deadlock on the shard lock.
    pub fn with_pair<T, F>(&self, key: PairKey, f: F) -> T
    where
        F: FnOnce(&mut PairLedger) -> T,
    {
        let mut pair = self.pairs.entry(key).or_default();
        f(pair.value_mut())
    }

    /// Outstanding debits for a pair, oldest first
    pub fn find_outstanding_debits(
        &self,
        vendor: VendorId,
        buyer: BuyerId,
    ) -> Result<Vec<LedgerEntry>, SettlementError> {
        match self.pairs.get(&PairKey::new(vendor, buyer)) {
            Some(pair) => pair.value().outstanding_debits(),
            None => Ok(Vec::new()),
        }
    }

    /// Write an entry's settlement fields back to its pair ledger
    ///
    /// # Returns
    ///
    /// * `Err(SettlementError::EntryNotFound)` - No entry with this id
    ///   exists under the entry's pair
    pub fn update(&self, entry: &LedgerEntry) -> Result<(), SettlementError> {
        let key = PairKey::new(entry.vendor, entry.buyer);
        match self.pairs.get_mut(&key) {
            Some(mut pair) => pair.value_mut().update(entry),
            None => Err(SettlementError::entry_not_found(entry.id, "update")),
        }
    }

    /// Total outstanding debt a buyer owes a vendor
    pub fn sum_outstanding(
        &self,
        vendor: VendorId,
        buyer: BuyerId,
    ) -> Result<Decimal, SettlementError> {
        match self.pairs.get(&PairKey::new(vendor, buyer)) {
            Some(pair) => pair.value().sum_outstanding(),
            None => Ok(Decimal::ZERO),
        }
    }

    /// Every entry involving a buyer, across all vendors, oldest first
    pub fn entries_for_buyer(&self, buyer: BuyerId) -> Vec<LedgerEntry> {
        self.collect_sorted(|key| key.buyer == buyer)
    }

    /// Every entry involving a vendor, across all buyers, oldest first
    pub fn entries_for_vendor(&self, vendor: VendorId) -> Vec<LedgerEntry> {
        self.collect_sorted(|key| key.vendor == vendor)
    }

    fn collect_sorted<F: Fn(&PairKey) -> bool>(&self, keep: F) -> Vec<LedgerEntry> {
        let mut entries = Vec::new();
        for pair in self.pairs.iter() {
            if keep(pair.key()) {
                entries.extend(pair.value().entries().iter().cloned());
            }
        }
        entries.sort_by_key(|entry| (entry.created_at, entry.id));
        entries
    }

    /// Aggregate a vendor's position across all buyers
    pub fn vendor_summary(&self, vendor: VendorId) -> Result<VendorSummary, SettlementError> {
        VendorSummary::from_entries(self.entries_for_vendor(vendor))
    }

    /// Outstanding balance of every pair the store has seen
    ///
    /// Settled pairs are included with a zero balance. Ordered by pair
    /// key so output is stable across runs.
    pub fn outstanding_balances(&self) -> Result<Vec<PairBalance>, SettlementError> {
        let mut balances = Vec::with_capacity(self.pairs.len());
        for pair in self.pairs.iter() {
            balances.push(PairBalance {
                vendor: pair.key().vendor,
                buyer: pair.key().buyer,
                outstanding: pair.value().sum_outstanding()?,
            });
        }
        balances.sort_by_key(|balance| (balance.vendor, balance.buyer));
        Ok(balances)
    }
}

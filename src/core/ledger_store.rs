//! Synchronous ledger store
//!
//! Owns every pair ledger, keyed by (vendor, buyer). Entry construction
//! goes through `LedgerEntry::from_draft`, so a debit can only ever enter
//! the store as `Pending` with its full amount outstanding.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::types::{
    BuyerId, EntryDraft, LedgerEntry, PairBalance, PairKey, SettlementError, VendorId,
    VendorSummary,
};

use super::pair_ledger::PairLedger;
use super::traits::PairStore;

/// In-memory store of all pair ledgers
#[derive(Debug, Default)]
pub struct LedgerStore {
    pairs: HashMap<PairKey, PairLedger>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            pairs: HashMap::new(),
        }
    }

    /// Construct an entry from a draft and record it under its pair
    ///
    /// The draft is validated before any pair ledger is created, so a
    /// rejected draft leaves the store exactly as it was.
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerEntry)` - The recorded entry, including its generated id
    /// * `Err(SettlementError)` - The draft failed validation
    pub fn create(&mut self, draft: EntryDraft) -> Result<LedgerEntry, SettlementError> {
        let entry = LedgerEntry::from_draft(draft)?;
        let key = PairKey::new(entry.vendor, entry.buyer);
        self.pairs.entry(key).or_default().record(entry.clone())?;
        Ok(entry)
    }

    /// Outstanding debits for a pair, oldest first
    ///
    /// A pair with no history yields an empty list.
    pub fn find_outstanding_debits(
        &self,
        vendor: VendorId,
        buyer: BuyerId,
    ) -> Result<Vec<LedgerEntry>, SettlementError> {
        match self.pairs.get(&PairKey::new(vendor, buyer)) {
            Some(ledger) => ledger.outstanding_debits(),
            None => Ok(Vec::new()),
        }
    }

    /// Write an entry's settlement fields back to its pair ledger
    ///
    /// # Returns
    ///
    /// * `Err(SettlementError::EntryNotFound)` - No entry with this id
    ///   exists under the entry's pair
    pub fn update(&mut self, entry: &LedgerEntry) -> Result<(), SettlementError> {
        let key = PairKey::new(entry.vendor, entry.buyer);
        match self.pairs.get_mut(&key) {
            Some(ledger) => ledger.update(entry),
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
            Some(ledger) => ledger.sum_outstanding(),
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
        let mut entries: Vec<LedgerEntry> = self
            .pairs
            .iter()
            .filter(|(key, _)| keep(key))
            .flat_map(|(_, ledger)| ledger.entries().iter().cloned())
            .collect();
        entries.sort_by_key(|entry| (entry.created_at, entry.id));
        entries
    }

    /// Aggregate a vendor's position across all buyers
    ///
    /// Billed, received, and outstanding are reported separately; the
    /// recent list holds the newest entries first.
    pub fn vendor_summary(&self, vendor: VendorId) -> Result<VendorSummary, SettlementError> {
        VendorSummary::from_entries(self.entries_for_vendor(vendor))
    }

    /// Outstanding balance of every pair the store has seen
    ///
    /// Settled pairs are included with a zero balance. Ordered by pair
    /// key so output is stable across runs.
    pub fn outstanding_balances(&self) -> Result<Vec<PairBalance>, SettlementError> {
        let mut balances = Vec::with_capacity(self.pairs.len());
        for (key, ledger) in &self.pairs {
            balances.push(PairBalance {
                vendor: key.vendor,
                buyer: key.buyer,
                outstanding: ledger.sum_outstanding()?,
            });
        }
        balances.sort_by_key(|balance| (balance.vendor, balance.buyer));
        Ok(balances)
    }

    /// Mutable access to one pair's ledger, creating it on first use
    ///
    /// Scoped to the crate: settlement mutates entries, callers outside
    /// the engines read through the query methods.
    pub(crate) fn pair_mut(&mut self, key: PairKey) -> &mut PairLedger {
        self.pairs.entry(key).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntryKind, PaymentStatus};
    use chrono::{DateTime, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn draft(
        vendor: VendorId,
        buyer: BuyerId,
        kind: EntryKind,
        cents: i64,
        at_secs: i64,
    ) -> EntryDraft {
        EntryDraft {
            vendor,
            buyer,
            kind,
            amount: dec(cents),
            remarks: None,
            created_at: Some(ts(at_secs)),
        }
    }

    #[test]
    fn test_create_debit_starts_pending() {
        let mut store = LedgerStore::new();
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        let entry = store
            .create(draft(vendor, buyer, EntryKind::Debit, 10000, 100))
            .unwrap();

        assert_eq!(entry.payment_status, PaymentStatus::Pending);
        assert_eq!(entry.outstanding_amount, dec(10000));

        let debits = store.find_outstanding_debits(vendor, buyer).unwrap();
        assert_eq!(debits.len(), 1);
        assert_eq!(debits[0].id, entry.id);
    }

    #[test]
    fn test_pairs_are_isolated() {
        // Setup: same vendor, two buyers
        let mut store = LedgerStore::new();
        let vendor = VendorId::new();
        let (buyer_a, buyer_b) = (BuyerId::new(), BuyerId::new());

        store
            .create(draft(vendor, buyer_a, EntryKind::Debit, 10000, 100))
            .unwrap();

        assert!(store.find_outstanding_debits(vendor, buyer_b).unwrap().is_empty());
        assert_eq!(store.sum_outstanding(vendor, buyer_b).unwrap(), Decimal::ZERO);
        assert_eq!(store.sum_outstanding(vendor, buyer_a).unwrap(), dec(10000));
    }

    #[test]
    fn test_rejected_draft_leaves_store_unchanged() {
        let mut store = LedgerStore::new();
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        let result = store.create(draft(vendor, buyer, EntryKind::Debit, 0, 100));

        assert!(matches!(
            result,
            Err(SettlementError::InvalidAmount { .. })
        ));
        assert!(store.outstanding_balances().unwrap().is_empty());
    }

    #[test]
    fn test_update_unknown_entry_fails() {
        let mut store = LedgerStore::new();
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        let entry = LedgerEntry::from_draft(draft(vendor, buyer, EntryKind::Debit, 5000, 100))
            .unwrap();
        let result = store.update(&entry);

        assert!(matches!(
            result,
            Err(SettlementError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_update_writes_settlement_fields() {
        let mut store = LedgerStore::new();
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        let mut entry = store
            .create(draft(vendor, buyer, EntryKind::Debit, 5000, 100))
            .unwrap();
        entry.outstanding_amount = dec(2000);
        entry.payment_status = PaymentStatus::PartiallyPaid;

        store.update(&entry).unwrap();

        assert_eq!(store.sum_outstanding(vendor, buyer).unwrap(), dec(2000));
        let debits = store.find_outstanding_debits(vendor, buyer).unwrap();
        assert_eq!(debits[0].payment_status, PaymentStatus::PartiallyPaid);
    }

    #[test]
    fn test_entries_for_buyer_spans_vendors() {
        // Setup: one buyer billed by two vendors, out of order in time
        let mut store = LedgerStore::new();
        let buyer = BuyerId::new();
        let (vendor_a, vendor_b) = (VendorId::new(), VendorId::new());

        let later = store
            .create(draft(vendor_a, buyer, EntryKind::Debit, 10000, 200))
            .unwrap();
        let earlier = store
            .create(draft(vendor_b, buyer, EntryKind::Debit, 5000, 100))
            .unwrap();

        let entries = store.entries_for_buyer(buyer);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, earlier.id);
        assert_eq!(entries[1].id, later.id);
    }

    #[test]
    fn test_entries_for_vendor_spans_buyers() {
        let mut store = LedgerStore::new();
        let vendor = VendorId::new();
        let (buyer_a, buyer_b) = (BuyerId::new(), BuyerId::new());

        store
            .create(draft(vendor, buyer_a, EntryKind::Debit, 10000, 100))
            .unwrap();
        store
            .create(draft(vendor, buyer_b, EntryKind::Debit, 5000, 200))
            .unwrap();
        store
            .create(draft(VendorId::new(), buyer_a, EntryKind::Debit, 2500, 300))
            .unwrap();

        let entries = store.entries_for_vendor(vendor);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.vendor == vendor));
    }

    #[test]
    fn test_vendor_summary_totals() {
        // Setup: two debits and one payment for the same vendor
        let mut store = LedgerStore::new();
        let vendor = VendorId::new();
        let buyer = BuyerId::new();

        store
            .create(draft(vendor, buyer, EntryKind::Debit, 10000, 100))
            .unwrap();
        store
            .create(draft(vendor, buyer, EntryKind::Debit, 5000, 200))
            .unwrap();
        store
            .create(draft(vendor, buyer, EntryKind::Payment, 3000, 300))
            .unwrap();

        let summary = store.vendor_summary(vendor).unwrap();

        assert_eq!(summary.entry_count, 3);
        assert_eq!(summary.total_billed, dec(15000));
        assert_eq!(summary.total_received, dec(3000));
        assert_eq!(summary.total_outstanding, dec(15000));
    }

    #[test]
    fn test_vendor_summary_recent_is_newest_first_capped() {
        let mut store = LedgerStore::new();
        let vendor = VendorId::new();
        let buyer = BuyerId::new();

        let mut newest = None;
        for i in 0..7 {
            let entry = store
                .create(draft(vendor, buyer, EntryKind::Debit, 1000, 100 + i))
                .unwrap();
            newest = Some(entry);
        }

        let summary = store.vendor_summary(vendor).unwrap();

        assert_eq!(summary.entry_count, 7);
        assert_eq!(summary.recent.len(), 5);
        assert_eq!(summary.recent[0].id, newest.unwrap().id);
        assert!(summary
            .recent
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[test]
    fn test_outstanding_balances_includes_settled_pairs() {
        let mut store = LedgerStore::new();
        let vendor = VendorId::new();
        let (buyer_a, buyer_b) = (BuyerId::new(), BuyerId::new());

        let mut entry = store
            .create(draft(vendor, buyer_a, EntryKind::Debit, 10000, 100))
            .unwrap();
        store
            .create(draft(vendor, buyer_b, EntryKind::Debit, 5000, 200))
            .unwrap();

        // Settle pair A completely
        entry.outstanding_amount = Decimal::ZERO;
        entry.payment_status = PaymentStatus::Paid;
        entry.payment_date = Some(ts(300));
        store.update(&entry).unwrap();

        let balances = store.outstanding_balances().unwrap();
        assert_eq!(balances.len(), 2);

        let pair_a = balances.iter().find(|b| b.buyer == buyer_a).unwrap();
        assert_eq!(pair_a.outstanding, Decimal::ZERO);
        let pair_b = balances.iter().find(|b| b.buyer == buyer_b).unwrap();
        assert_eq!(pair_b.outstanding, dec(5000));
    }
}

//! Settlement orchestration for async batch processing
//!
//! This module provides the `AsyncSettlementEngine` struct, which routes
//! activity records to the thread-safe `AsyncLedgerStore` and runs payment
//! settlements under per-pair locking.
//!
//! # Design
//!
//! Debits and credits append to a pair's ledger; payments run the shared
//! settlement allocation against that ledger. The whole settlement cycle
//! for a pair (fetch outstanding debits, allocate, write back) executes
//! under the pair's entry lock, so concurrent settlements for the same
//! pair serialize while different pairs proceed in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncSettlementEngine
//!     └── Arc<AsyncLedgerStore>  (thread-safe pair ledgers)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cloneable (via Clone trait) and can be safely shared
//! across multiple async tasks. All ledger state is protected by the
//! DashMap inside AsyncLedgerStore.
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::settlement::{settle_pair, validate_settle_args};
use crate::types::{
    ActivityRecord, BuyerId, EntryDraft, EntryKind, PairKey, SettlementError, SettlementReport,
    VendorId,
};

use super::AsyncLedgerStore;

/// Settlement orchestrator for async batch processing
///
/// `AsyncSettlementEngine` applies activity records against the concurrent
/// ledger store. It can be cloned and shared across multiple async tasks
/// for concurrent processing.
///
/// # Thread Safety
///
/// The engine is safe to clone and use from multiple threads/tasks
/// concurrently. Settlements for one (vendor, buyer) pair are serialized
/// by the pair's entry lock inside AsyncLedgerStore.
#[derive(Debug, Clone)]
pub struct AsyncSettlementEngine {
    /// Thread-safe ledger store
    ///
    /// Wrapped in Arc to enable sharing across async tasks. The store uses
    /// DashMap internally for fine-grained locking per pair.
    store: Arc<AsyncLedgerStore>,
}

impl AsyncSettlementEngine {
    /// Create a new AsyncSettlementEngine
    ///
    /// # Arguments
    ///
    /// * `store` - Arc-wrapped AsyncLedgerStore holding the pair ledgers
    ///
    /// # Returns
    ///
    /// A new `AsyncSettlementEngine` that can be cloned and shared across
    /// async tasks.
    pub fn new(store: Arc<AsyncLedgerStore>) -> Self {
        Self { store }
    }

    /// Process a single activity record
    ///
    /// Routes the record by kind: debits and credits are appended to the
    /// pair's ledger, payments run the full settlement allocation under
    /// the pair's entry lock.
    ///
    /// # Arguments
    ///
    /// * `record` - The activity record to process
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the record was processed successfully
    /// * `Err(SettlementError)` if the record failed
    pub fn apply(&self, record: ActivityRecord) -> Result<(), SettlementError> {
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
    /// The whole record-fetch-allocate-write cycle runs under the pair's
    /// entry lock, so two settlements for the same pair can never observe
    /// each other's intermediate state.
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
        &self,
        vendor: VendorId,
        buyer: BuyerId,
        payment_amount: Decimal,
        remarks: Option<String>,
    ) -> Result<SettlementReport, SettlementError> {
        // Validate before with_pair so a rejected request cannot create
        // an empty pair ledger.
        validate_settle_args(vendor, buyer, payment_amount)?;

        let key = PairKey::new(vendor, buyer);
        self.store.with_pair(key, |ledger| {
            settle_pair(ledger, vendor, buyer, payment_amount, remarks)
        })
    }

    /// Read access to the underlying store for queries and output
    pub fn store(&self) -> &AsyncLedgerStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentStatus;
    use std::thread;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn record(
        vendor: VendorId,
        buyer: BuyerId,
        kind: EntryKind,
        cents: i64,
    ) -> ActivityRecord {
        ActivityRecord {
            kind,
            vendor,
            buyer,
            amount: dec(cents),
            remarks: None,
        }
    }

    #[test]
    fn test_new_shares_store() {
        let store = Arc::new(AsyncLedgerStore::new());
        let _engine = AsyncSettlementEngine::new(Arc::clone(&store));

        assert!(Arc::strong_count(&store) >= 2); // Original + engine
    }

    #[test]
    fn test_clones_share_state() {
        let store = Arc::new(AsyncLedgerStore::new());
        let engine = AsyncSettlementEngine::new(Arc::clone(&store));
        let engine_clone = engine.clone();
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        engine
            .apply(record(vendor, buyer, EntryKind::Debit, 10000))
            .unwrap();

        assert_eq!(
            engine_clone.store().sum_outstanding(vendor, buyer).unwrap(),
            dec(10000)
        );
    }

    #[test]
    fn test_apply_payment_settles_outstanding_debt() {
        let engine = AsyncSettlementEngine::new(Arc::new(AsyncLedgerStore::new()));
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        engine
            .apply(record(vendor, buyer, EntryKind::Debit, 10000))
            .unwrap();
        engine
            .apply(record(vendor, buyer, EntryKind::Payment, 6000))
            .unwrap();

        assert_eq!(
            engine.store().sum_outstanding(vendor, buyer).unwrap(),
            dec(4000)
        );
    }

    #[test]
    fn test_settle_returns_full_report() {
        let engine = AsyncSettlementEngine::new(Arc::new(AsyncLedgerStore::new()));
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        engine
            .apply(record(vendor, buyer, EntryKind::Debit, 10000))
            .unwrap();

        let report = engine.settle(vendor, buyer, dec(12000), None).unwrap();

        assert_eq!(report.amount_applied_to_debits, dec(10000));
        assert_eq!(report.remaining_unapplied, dec(2000));
        assert_eq!(report.current_overall_due, Decimal::ZERO);
    }

    #[test]
    fn test_settle_with_nil_buyer_creates_no_pair() {
        let engine = AsyncSettlementEngine::new(Arc::new(AsyncLedgerStore::new()));
        let nil_buyer = BuyerId::from_uuid(uuid::Uuid::nil());

        let result = engine.settle(VendorId::new(), nil_buyer, dec(1000), None);

        assert!(matches!(result, Err(SettlementError::NilParty { .. })));
        assert!(engine.store().outstanding_balances().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_settlements_same_pair() {
        // Setup: one debit of 100.00, ten threads each paying 10.00.
        // The pair lock serializes the settlements, so in aggregate the
        // payments apply exactly once each and the debt reaches zero.
        let engine = AsyncSettlementEngine::new(Arc::new(AsyncLedgerStore::new()));
        let (vendor, buyer) = (VendorId::new(), BuyerId::new());

        engine
            .apply(record(vendor, buyer, EntryKind::Debit, 10000))
            .unwrap();

        let mut handles = vec![];
        for _ in 0..10 {
            let engine_clone = engine.clone();
            let handle = thread::spawn(move || {
                engine_clone.settle(vendor, buyer, dec(1000), None).unwrap()
            });
            handles.push(handle);
        }

        let mut total_applied = Decimal::ZERO;
        for handle in handles {
            let report = handle.join().unwrap();
            total_applied += report.amount_applied_to_debits;
        }

        assert_eq!(total_applied, dec(10000));
        assert_eq!(
            engine.store().sum_outstanding(vendor, buyer).unwrap(),
            Decimal::ZERO
        );

        let entries = engine.store().entries_for_buyer(buyer);
        let payments = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Payment)
            .count();
        assert_eq!(payments, 10);
    }

    #[test]
    fn test_concurrent_settlements_different_pairs() {
        let engine = AsyncSettlementEngine::new(Arc::new(AsyncLedgerStore::new()));
        let vendor = VendorId::new();
        let buyers: Vec<BuyerId> = (0..8).map(|_| BuyerId::new()).collect();

        for buyer in &buyers {
            engine
                .apply(record(vendor, *buyer, EntryKind::Debit, 5000))
                .unwrap();
        }

        let mut handles = vec![];
        for buyer in &buyers {
            let engine_clone = engine.clone();
            let buyer = *buyer;
            let handle = thread::spawn(move || {
                engine_clone.settle(vendor, buyer, dec(5000), None).unwrap();
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        for buyer in &buyers {
            assert_eq!(
                engine.store().sum_outstanding(vendor, *buyer).unwrap(),
                Decimal::ZERO
            );
        }

        let summary = engine.store().vendor_summary(vendor).unwrap();
        assert_eq!(summary.total_outstanding, Decimal::ZERO);
        assert_eq!(summary.total_billed, dec(40000));
        assert!(summary
            .recent
            .iter()
            .filter(|e| e.kind == EntryKind::Debit)
            .all(|e| e.payment_status == PaymentStatus::Paid));
    }
}

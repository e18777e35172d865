//! Settlement outcome and reporting types
//!
//! These types describe what a settlement did: the payment entry it
//! recorded, the debits it touched with their before and after states,
//! and the derived totals callers show to vendors and buyers.

use rust_decimal::Decimal;

use super::entry::{EntryKind, LedgerEntry, PaymentStatus};
use super::error::SettlementError;
use super::ids::{BuyerId, VendorId};

/// One debit touched by a settlement, with its before and after states
#[derive(Debug, Clone, PartialEq)]
pub struct DebitUpdate {
    /// The debit as persisted after the allocation
    pub entry: LedgerEntry,

    /// How much of the payment this debit absorbed
    pub applied: Decimal,

    /// Outstanding amount before the allocation
    pub outstanding_before: Decimal,

    /// Payment status before the allocation
    pub status_before: PaymentStatus,
}

/// Full outcome of one settlement
///
/// `payment_received` always equals `amount_applied_to_debits` plus
/// `remaining_unapplied`; the split tells the vendor how much of the
/// payment found matching debt.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReport {
    /// Raw amount the buyer paid
    pub payment_received: Decimal,

    /// Portion of the payment that covered outstanding debits
    pub amount_applied_to_debits: Decimal,

    /// Portion left over after every debit was covered
    pub remaining_unapplied: Decimal,

    /// Pair's total outstanding debt after this settlement
    pub current_overall_due: Decimal,

    /// The payment entry recorded for this settlement
    pub payment_entry: LedgerEntry,

    /// Debits touched by this settlement, in allocation order
    pub debits_updated: Vec<DebitUpdate>,
}

/// Outstanding balance of one (vendor, buyer) pair
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PairBalance {
    pub vendor: VendorId,
    pub buyer: BuyerId,
    pub outstanding: Decimal,
}

/// How many entries a vendor summary lists as recent activity
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// A vendor's aggregate position across all buyers
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSummary {
    /// Total number of ledger entries involving the vendor
    pub entry_count: usize,

    /// Sum of all debit amounts
    pub total_billed: Decimal,

    /// Sum of all payment amounts
    pub total_received: Decimal,

    /// Sum of all debit outstanding amounts
    pub total_outstanding: Decimal,

    /// The five most recent entries, newest first
    pub recent: Vec<LedgerEntry>,
}

impl VendorSummary {
    /// Aggregate a summary from a vendor's entries, oldest first
    ///
    /// Billed, received, and outstanding totals are kept separate so the
    /// caller never has to untangle money billed from money received.
    pub fn from_entries(mut entries: Vec<LedgerEntry>) -> Result<Self, SettlementError> {
        let mut total_billed = Decimal::ZERO;
        let mut total_received = Decimal::ZERO;
        let mut total_outstanding = Decimal::ZERO;

        for entry in &entries {
            match entry.kind {
                EntryKind::Debit => {
                    total_billed = total_billed
                        .checked_add(entry.amount)
                        .ok_or_else(|| SettlementError::arithmetic_overflow("vendor summary"))?;
                    total_outstanding = total_outstanding
                        .checked_add(entry.outstanding_amount)
                        .ok_or_else(|| SettlementError::arithmetic_overflow("vendor summary"))?;
                }
                EntryKind::Payment => {
                    total_received = total_received
                        .checked_add(entry.amount)
                        .ok_or_else(|| SettlementError::arithmetic_overflow("vendor summary"))?;
                }
                EntryKind::Credit => {}
            }
        }

        let entry_count = entries.len();
        entries.reverse();
        entries.truncate(RECENT_ACTIVITY_LIMIT);

        Ok(VendorSummary {
            entry_count,
            total_billed,
            total_received,
            total_outstanding,
            recent: entries,
        })
    }
}

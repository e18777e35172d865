//! Settlement allocation
//!
//! This module implements the reconciliation routine both engines share:
//! apply one incoming payment against a pair's outstanding debits, oldest
//! first, and report exactly what happened.
//!
//! # Allocation contract
//!
//! 1. Record one payment entry for the raw amount, unconditionally. The
//!    audit trail exists even when no debt matches.
//! 2. Fetch the pair's outstanding debits, oldest first.
//! 3. Cover debits in order until the payment runs out. A debit driven to
//!    zero becomes `Paid` and gets its completion date; a debit partially
//!    covered becomes `PartiallyPaid`. Debits past the point the payment
//!    runs out are untouched.
//! 4. Report the applied/unapplied split, the derived overall due, the
//!    payment entry, and the per-debit before/after states.
//!
//! Overpayment is reported as `remaining_unapplied`, never stored as a
//! credit entry and never discarded. Two identical calls allocate twice:
//! each call is a distinct real-world payment event.
//!
//! # Failure semantics
//!
//! If a store operation fails after the payment entry was recorded, the
//! routine stops and returns `AllocationHalted`, carrying the payment
//! entry and the exact list of debits persisted before the failure. No
//! debit is ever left with partially written fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{
    BuyerId, DebitUpdate, EntryDraft, EntryKind, LedgerEntry, PaymentStatus, SettlementError,
    SettlementReport, VendorId,
};

use super::traits::PairStore;

/// Check the settle preconditions without touching any store
///
/// Engines call this before acquiring the pair's ledger so that an
/// invalid request cannot create an empty pair as a side effect.
pub fn validate_settle_args(
    vendor: VendorId,
    buyer: BuyerId,
    payment_amount: Decimal,
) -> Result<(), SettlementError> {
    if vendor.is_nil() {
        return Err(SettlementError::nil_party("vendor"));
    }
    if buyer.is_nil() {
        return Err(SettlementError::nil_party("buyer"));
    }
    if payment_amount < Decimal::ZERO {
        return Err(SettlementError::invalid_amount("settle", payment_amount));
    }
    Ok(())
}

/// Computed allocation against a snapshot of outstanding debits
struct AllocationPlan {
    /// Post-state and before-state of every debit the payment covers
    updates: Vec<DebitUpdate>,

    /// Total the payment covers
    amount_applied: Decimal,

    /// Payment left over once every debit is covered
    remaining: Decimal,
}

/// Allocate a payment across outstanding debits, oldest first
///
/// Pure arithmetic on the fetched snapshot; nothing is persisted here.
fn plan_allocation(
    debits: Vec<LedgerEntry>,
    payment_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<AllocationPlan, SettlementError> {
    let mut remaining = payment_amount;
    let mut updates = Vec::new();

    for mut debit in debits {
        if remaining.is_zero() {
            break;
        }

        let applied = debit.outstanding_amount.min(remaining);
        let outstanding_before = debit.outstanding_amount;
        let status_before = debit.payment_status;

        debit.outstanding_amount = debit
            .outstanding_amount
            .checked_sub(applied)
            .ok_or_else(|| SettlementError::arithmetic_underflow("allocate debit"))?;
        remaining = remaining
            .checked_sub(applied)
            .ok_or_else(|| SettlementError::arithmetic_underflow("allocate payment"))?;

        if debit.outstanding_amount.is_zero() {
            debit.payment_status = PaymentStatus::Paid;
            debit.payment_date = Some(now);
        } else {
            debit.payment_status = PaymentStatus::PartiallyPaid;
        }

        updates.push(DebitUpdate {
            entry: debit,
            applied,
            outstanding_before,
            status_before,
        });
    }

    let amount_applied = payment_amount
        .checked_sub(remaining)
        .ok_or_else(|| SettlementError::arithmetic_underflow("applied total"))?;

    Ok(AllocationPlan {
        updates,
        amount_applied,
        remaining,
    })
}

/// Settle a payment against one pair's ledger
///
/// # Arguments
///
/// * `store` - The pair's ledger; the caller is responsible for holding
///   whatever lock serializes settlements for this pair
/// * `vendor`, `buyer` - The already-authenticated parties
/// * `payment_amount` - The raw amount received; must be non-negative
/// * `remarks` - Annotation carried onto the payment entry
///
/// # Returns
///
/// * `Ok(SettlementReport)` - The full outcome of the allocation
/// * `Err(SettlementError::NilParty)` - A party id was nil
/// * `Err(SettlementError::InvalidAmount)` - The amount was negative
/// * `Err(SettlementError::AllocationHalted)` - A store operation failed
///   after the payment entry was recorded; carries the accurate partial
///   update list
pub fn settle_pair<S: PairStore>(
    store: &mut S,
    vendor: VendorId,
    buyer: BuyerId,
    payment_amount: Decimal,
    remarks: Option<String>,
) -> Result<SettlementReport, SettlementError> {
    validate_settle_args(vendor, buyer, payment_amount)?;

    // Step 1: record the payment before anything else can fail.
    let payment = LedgerEntry::from_draft(EntryDraft {
        vendor,
        buyer,
        kind: EntryKind::Payment,
        amount: payment_amount,
        remarks,
        created_at: None,
    })?;
    store.record(payment.clone())?;
    let now = payment.created_at;

    // Step 2: fetch targets, oldest first.
    let debits = match store.outstanding_debits() {
        Ok(debits) => debits,
        Err(cause) => {
            return Err(SettlementError::allocation_halted(
                payment,
                Vec::new(),
                cause,
            ))
        }
    };

    // Step 3: plan on the snapshot, then persist debit by debit.
    let plan = match plan_allocation(debits, payment_amount, now) {
        Ok(plan) => plan,
        Err(cause) => {
            return Err(SettlementError::allocation_halted(
                payment,
                Vec::new(),
                cause,
            ))
        }
    };

    let mut applied = Vec::with_capacity(plan.updates.len());
    for update in plan.updates {
        if let Err(cause) = store.update(&update.entry) {
            return Err(SettlementError::allocation_halted(payment, applied, cause));
        }
        applied.push(update);
    }

    // Step 4: the overall due is derived from the ledger, never stored.
    let current_overall_due = match store.sum_outstanding() {
        Ok(due) => due,
        Err(cause) => return Err(SettlementError::allocation_halted(payment, applied, cause)),
    };

    Ok(SettlementReport {
        payment_received: payment_amount,
        amount_applied_to_debits: plan.amount_applied,
        remaining_unapplied: plan.remaining,
        current_overall_due,
        payment_entry: payment,
        debits_updated: applied,
    })
}

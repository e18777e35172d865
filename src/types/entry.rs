//! Ledger entry types for the Settlement Engine
//!
//! This module defines the entry kinds, payment status lifecycle, and the
//! `LedgerEntry` record that every economic event between a buyer and a
//! vendor is stored as.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::SettlementError;
use super::ids::{BuyerId, EntryId, VendorId};

/// Kinds of ledger entries
///
/// Each variant represents a different economic event between exactly one
/// buyer and one vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// The buyer owes the vendor the entry's amount
    ///
    /// Debits carry outstanding state and are the targets of settlement
    /// allocation. A new debit is always fully outstanding.
    Debit,

    /// A reduction of the buyer's debt not tied to a payment
    ///
    /// Recorded for audit purposes alongside debits and payments; credits
    /// carry no outstanding state of their own.
    Credit,

    /// Money the buyer actually transferred to the vendor
    ///
    /// Exactly one payment entry is recorded per settlement call,
    /// regardless of how much debt it ends up covering.
    Payment,
}

/// Payment lifecycle of a debit entry
///
/// A debit moves `Pending -> PartiallyPaid -> Paid` as settlements
/// allocate against it, and never reverses. The status is always
/// consistent with the entry's outstanding amount: `Pending` means fully
/// outstanding, `Paid` means zero outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has been allocated against the debit yet
    Pending,

    /// Some, but not all, of the debit has been covered
    PartiallyPaid,

    /// The debit is fully covered; its outstanding amount is zero
    Paid,
}

/// One economic event between a buyer and a vendor
///
/// `id`, `buyer`, `vendor`, `amount`, `kind`, `remarks`, and `created_at`
/// are write-once. `outstanding_amount`, `payment_status`, and
/// `payment_date` are the only mutable fields, and only settlement
/// allocation mutates them after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Unique identifier, assigned at creation
    pub id: EntryId,

    /// The party owing
    pub buyer: BuyerId,

    /// The party owed
    pub vendor: VendorId,

    /// The entry's nominal magnitude
    ///
    /// Strictly positive for debits and credits; non-negative for
    /// payments (a zero payment is a valid audit no-op).
    pub amount: Decimal,

    /// What kind of economic event this entry records
    pub kind: EntryKind,

    /// Payment lifecycle state; meaningful only for debits
    ///
    /// Credits and payments are stored `Paid` with zero outstanding.
    pub payment_status: PaymentStatus,

    /// Remaining unpaid portion of a debit
    ///
    /// Initialized to `amount` for debits, zero otherwise. Monotonically
    /// non-increasing.
    pub outstanding_amount: Decimal,

    /// Free-text annotation supplied by the caller
    pub remarks: Option<String>,

    /// Creation timestamp; the FIFO allocation order key
    pub created_at: DateTime<Utc>,

    /// Completion marker
    ///
    /// Set when a debit's outstanding amount reaches zero, or at creation
    /// for a payment entry.
    pub payment_date: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for a new ledger entry
///
/// The draft deliberately has no status or outstanding fields: those are
/// derived from `kind` and `amount` at construction, so a caller cannot
/// persist a debit that is anything but fully outstanding and pending.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// The party owed
    pub vendor: VendorId,

    /// The party owing
    pub buyer: BuyerId,

    /// What kind of economic event to record
    pub kind: EntryKind,

    /// The entry's nominal magnitude
    pub amount: Decimal,

    /// Free-text annotation
    pub remarks: Option<String>,

    /// Creation timestamp override; `None` stamps the current time
    ///
    /// Explicit timestamps let historical activity be seeded in a known
    /// order.
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Construct a ledger entry from a draft, enforcing the creation
    /// invariants
    ///
    /// - `vendor` and `buyer` must be non-nil.
    /// - Debit and credit amounts must be strictly positive; payment
    ///   amounts must be non-negative.
    /// - A debit is persisted `Pending` and fully outstanding; credits
    ///   and payments are persisted `Paid` with zero outstanding.
    /// - A payment's `payment_date` equals its `created_at`.
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerEntry)` - The entry with its assigned id
    /// * `Err(SettlementError::NilParty)` - If either party id is nil
    /// * `Err(SettlementError::InvalidAmount)` - If the amount violates
    ///   the kind's bounds
    pub fn from_draft(draft: EntryDraft) -> Result<Self, SettlementError> {
        if draft.vendor.is_nil() {
            return Err(SettlementError::nil_party("vendor"));
        }
        if draft.buyer.is_nil() {
            return Err(SettlementError::nil_party("buyer"));
        }

        let created_at = draft.created_at.unwrap_or_else(Utc::now);

        let (payment_status, outstanding_amount, payment_date) = match draft.kind {
            EntryKind::Debit => {
                if draft.amount <= Decimal::ZERO {
                    return Err(SettlementError::invalid_amount("create debit", draft.amount));
                }
                (PaymentStatus::Pending, draft.amount, None)
            }
            EntryKind::Credit => {
                if draft.amount <= Decimal::ZERO {
                    return Err(SettlementError::invalid_amount(
                        "create credit",
                        draft.amount,
                    ));
                }
                (PaymentStatus::Paid, Decimal::ZERO, None)
            }
            EntryKind::Payment => {
                if draft.amount < Decimal::ZERO {
                    return Err(SettlementError::invalid_amount(
                        "create payment",
                        draft.amount,
                    ));
                }
                (PaymentStatus::Paid, Decimal::ZERO, Some(created_at))
            }
        };

        Ok(LedgerEntry {
            id: EntryId::new(),
            buyer: draft.buyer,
            vendor: draft.vendor,
            amount: draft.amount,
            kind: draft.kind,
            payment_status,
            outstanding_amount,
            remarks: draft.remarks,
            created_at,
            payment_date,
        })
    }

    /// Whether this entry is a debit with unpaid remainder
    pub fn is_outstanding_debit(&self) -> bool {
        self.kind == EntryKind::Debit && self.payment_status != PaymentStatus::Paid
    }
}

/// One parsed row of ledger activity from the replay input
///
/// Debit and credit rows create entries; payment rows trigger a
/// settlement for the pair.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    /// What kind of activity this row records
    pub kind: EntryKind,

    /// The vendor side of the pair
    pub vendor: VendorId,

    /// The buyer side of the pair
    pub buyer: BuyerId,

    /// The row's amount
    pub amount: Decimal,

    /// Optional free-text annotation carried onto the created entry
    pub remarks: Option<String>,
}

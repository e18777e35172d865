//! Rust Settlement Engine Library
//! # Overview
//!
//! This library provides the settlement core of a QR-code vendor/buyer
//! payment tracker: a ledger of debits, credits, and payments per
//! (vendor, buyer) pair, and a FIFO allocation routine that settles
//! incoming payments against outstanding debits. A streaming CSV replay
//! surface drives the engine in both a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (LedgerEntry, SettlementReport, ids, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::settlement`] - The FIFO payment allocation routine
//!   - [`core::engine`] - Synchronous settlement orchestration
//!   - [`core::ledger_store`] - Pair ledger storage and query surface
//!   - [`core::async`] - Thread-safe store, engine, and batch processor
//! - [`io`] - CSV input/output with pluggable processing strategies
//! - [`qr`] - Vendor QR payload encoding and parsing
//!
//! # Entry Kinds
//!
//! The ledger records three kinds of economic events:
//!
//! - **Debit**: The buyer owes the vendor the entry's amount
//! - **Credit**: A reduction of buyer debt not tied to a payment
//! - **Payment**: Money actually transferred; settles outstanding debits
//!
//! # Settlement
//!
//! A payment is always recorded as an audit entry, then allocated across
//! the pair's outstanding debits oldest first. Each debit tracks:
//! - `outstanding_amount`: the unpaid remainder
//! - `payment_status`: pending, partially paid, or paid
//! - `payment_date`: set when the debit is fully covered
//!
//! Overpayment is reported but never stored as credit; nothing is ever
//! deleted.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod qr;
pub mod strategy;
pub mod types;

pub use core::{AsyncLedgerStore, AsyncSettlementEngine, LedgerStore, SettlementEngine};
pub use io::write_balances_csv;
pub use qr::QrPayload;
pub use types::{
    BuyerId, EntryDraft, EntryId, EntryKind, LedgerEntry, PairKey, PaymentStatus, SettlementError,
    SettlementReport, VendorId,
};

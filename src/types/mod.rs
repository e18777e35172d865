//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `ids`: Strongly-typed party and entry identifiers
//! - `entry`: Ledger entry kinds, status lifecycle, and records
//! - `settlement`: Settlement report and summary shapes
//! - `error`: Error types for the settlement engine

pub mod entry;
pub mod error;
pub mod ids;
pub mod settlement;

pub use entry::{ActivityRecord, EntryDraft, EntryKind, LedgerEntry, PaymentStatus};
pub use error::SettlementError;
pub use ids::{BuyerId, EntryId, PairKey, VendorId};
pub use settlement::{DebitUpdate, PairBalance, SettlementReport, VendorSummary};

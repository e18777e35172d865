//! Error types for the Settlement Engine
//!
//! This module defines all error types that can occur while recording
//! ledger activity and settling payments. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid data types, etc.
//! - **Argument Errors**: Nil party ids, malformed ids, negative amounts
//! - **Store Errors**: Missing entries, persistence failures
//! - **Arithmetic Errors**: Overflow/underflow in balance calculations
//! - **Allocation Errors**: A settlement stopped partway, with the audit
//!   trail of what was applied before the failure

use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::LedgerEntry;
use super::ids::EntryId;
use super::settlement::DebitUpdate;

/// Main error type for the settlement engine
///
/// This enum represents all possible errors that can occur while
/// processing ledger activity. Each variant includes relevant context
/// to help diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    ///
    /// This is typically a fatal error (file permissions, disk full, etc.).
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Identifier string did not parse as a uuid
    ///
    /// Raised at input boundaries (CSV rows, QR payloads). Recoverable:
    /// the offending record is skipped.
    #[error("Invalid {role} id '{value}'")]
    InvalidId {
        /// Which identifier was malformed ("vendor", "buyer", "entry")
        role: String,
        /// The string that failed to parse
        value: String,
    },

    /// A nil identifier was passed where a real party is required
    ///
    /// Settlement and entry creation both require non-nil parties.
    #[error("Nil {role} id")]
    NilParty {
        /// Which party was nil ("vendor" or "buyer")
        role: String,
    },

    /// Amount violates the operation's bounds
    ///
    /// Payments must be non-negative; debit and credit entries must be
    /// strictly positive. This is a recoverable error.
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// Operation that rejected the amount
        operation: String,
        /// The offending amount
        amount: Decimal,
    },

    /// Referenced ledger entry does not exist
    ///
    /// Entries are never deleted, so this guards against an entry
    /// vanishing between read and write rather than an expected path.
    #[error("Entry {entry} not found for {operation}")]
    EntryNotFound {
        /// Entry id that was not found
        entry: EntryId,
        /// Operation that failed
        operation: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// The mutation is rejected to keep the ledger consistent.
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// Arithmetic underflow would occur
    ///
    /// The mutation is rejected to keep the ledger consistent.
    #[error("Arithmetic underflow in {operation}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
    },

    /// Underlying persistence failed
    ///
    /// Not retried by the engine; the caller decides whether to retry
    /// the whole settlement.
    #[error("Store failure in {operation}: {message}")]
    StoreFailure {
        /// Operation that was being performed
        operation: String,
        /// Description of the failure
        message: String,
    },

    /// A settlement stopped partway through allocation
    ///
    /// The payment entry was already recorded and zero or more debits
    /// were already updated when a store operation failed. The carried
    /// state is the accurate audit trail for reconciliation: `updates`
    /// lists exactly the debits persisted before the failure.
    #[error("Settlement halted after {} debit update(s): {cause}", updates.len())]
    AllocationHalted {
        /// The payment entry recorded by this settlement
        payment: Box<LedgerEntry>,
        /// Debits persisted before the failure, in allocation order
        updates: Vec<DebitUpdate>,
        /// The error that stopped allocation
        cause: Box<SettlementError>,
    },

    /// QR payload did not match the `vendor:<name>:<id>` format
    ///
    /// This is a recoverable error - the scan is rejected.
    #[error("Invalid QR payload '{payload}'")]
    InvalidQrPayload {
        /// The payload that failed to parse
        payload: String,
    },
}

// Conversion from io::Error to SettlementError
impl From<std::io::Error> for SettlementError {
    fn from(error: std::io::Error) -> Self {
        SettlementError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to SettlementError
impl From<csv::Error> for SettlementError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        SettlementError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl SettlementError {
    /// Create an InvalidId error
    pub fn invalid_id(role: &str, value: &str) -> Self {
        SettlementError::InvalidId {
            role: role.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a NilParty error
    pub fn nil_party(role: &str) -> Self {
        SettlementError::NilParty {
            role: role.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: Decimal) -> Self {
        SettlementError::InvalidAmount {
            operation: operation.to_string(),
            amount,
        }
    }

    /// Create an EntryNotFound error
    pub fn entry_not_found(entry: EntryId, operation: &str) -> Self {
        SettlementError::EntryNotFound {
            entry,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        SettlementError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str) -> Self {
        SettlementError::ArithmeticUnderflow {
            operation: operation.to_string(),
        }
    }

    /// Create a StoreFailure error
    pub fn store_failure(operation: &str, message: &str) -> Self {
        SettlementError::StoreFailure {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }

    /// Create an AllocationHalted error
    pub fn allocation_halted(
        payment: LedgerEntry,
        updates: Vec<DebitUpdate>,
        cause: SettlementError,
    ) -> Self {
        SettlementError::AllocationHalted {
            payment: Box::new(payment),
            updates,
            cause: Box::new(cause),
        }
    }

    /// Create an InvalidQrPayload error
    pub fn invalid_qr_payload(payload: &str) -> Self {
        SettlementError::InvalidQrPayload {
            payload: payload.to_string(),
        }
    }
}

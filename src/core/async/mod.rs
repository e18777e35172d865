//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of the core
//! settlement components using DashMap for locking.
//!
//! # Architecture
//!
//! The async implementations expose the same semantics as the synchronous
//! versions but with concurrent data structures:
//!
//! - **AsyncLedgerStore**: Thread-safe pair ledgers using DashMap
//! - **AsyncSettlementEngine**: Orchestrates settlement under per-pair locks
//! - **BatchProcessor**: Partitions batches by pair for parallel processing
//!
//! # Thread Safety
//!
//! All components are designed for safe concurrent access:
//! - Activity for different pairs proceeds in parallel
//! - Settlements for the same pair are properly serialized
//! - No global locks - fine-grained locking per pair

pub mod batch_processor;
pub mod engine;
pub mod ledger_store;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::AsyncSettlementEngine;
pub use ledger_store::AsyncLedgerStore;

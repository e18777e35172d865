//! Core business logic module
//!
//! This module contains the core settlement components:
//! - `traits` - Trait abstraction over a pair's ledger storage
//! - `pair_ledger` - Entry storage for one (vendor, buyer) pair
//! - `ledger_store` - Synchronous store of all pair ledgers
//! - `settlement` - The shared FIFO payment allocation routine
//! - `engine` - Synchronous settlement orchestration
//! - `async` - Asynchronous implementations

pub mod r#async;
pub mod engine;
pub mod ledger_store;
pub mod pair_ledger;
pub mod settlement;
pub mod traits;

pub use engine::SettlementEngine;
pub use ledger_store::LedgerStore;
pub use pair_ledger::PairLedger;
pub use r#async::{AsyncLedgerStore, AsyncSettlementEngine, BatchProcessor};
pub use settlement::{settle_pair, validate_settle_args};
pub use traits::PairStore;

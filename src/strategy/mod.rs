//! Processing strategy module for ledger activity replay
//!
//! This module defines the Strategy pattern for complete activity processing
//! pipelines, encompassing both CSV parsing and settlement processing. This
//! allows different processing implementations (synchronous, asynchronous
//! batch) to be selected at runtime.

use crate::cli::StrategyType;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete activity processing pipelines
///
/// This trait defines the interface for different activity replay
/// implementations. Each strategy must be able to read activity records from
/// a CSV file, process them through the appropriate settlement engine, and
/// write the final outstanding balances to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process activity from input file and write balances to output
    ///
    /// This method reads activity records from the specified CSV file,
    /// processes them through the appropriate settlement engine, and writes
    /// the final outstanding balance of every (vendor, buyer) pair to the
    /// provided output writer.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file containing activity records
    /// * `output` - Mutable reference to a writer for outputting pair balances
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed successfully (or with
    ///   recoverable errors)
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error,
    ///   etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A fatal I/O error occurs during reading or writing
    /// - The CSV structure is fundamentally invalid
    /// - Output cannot be written
    ///
    /// Individual record processing errors should be logged to stderr but
    /// should not cause this method to return an error. Processing should
    /// continue with the next record.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// This factory function implements the Strategy pattern by selecting and
/// instantiating the appropriate processing strategy implementation at runtime
/// based on the provided strategy type and optional configuration.
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<crate::strategy::BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

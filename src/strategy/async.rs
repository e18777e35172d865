//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It processes ledger activity in batches using
//! thread-based parallelism with pair-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (pair partitioning + threading)
//!     └── AsyncSettlementEngine (thread-safe settlement)
//!         └── AsyncLedgerStore (thread-safe pair ledgers)
//! ```
//!
//! # Thread-Based Parallelism
//!
//! This strategy uses true thread-based parallelism:
//! - Processes batches sequentially to maintain per-pair ordering across the
//!   entire file
//! - Within each batch, partitions by (vendor, buyer) pair for parallel
//!   processing
//! - Spawns worker threads via tokio multi-threaded runtime
//! - Maintains per-pair activity ordering both within and across batches
//! - Uses Arc + DashMap for thread-safe shared state

use crate::core::r#async::{AsyncLedgerStore, AsyncSettlementEngine, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how activity records are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of activity records per batch
    pub batch_size: usize,
    /// Maximum number of batches processing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            eprintln!(
                "Warning: Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            eprintln!(
                "Warning: Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Implements the ProcessingStrategy trait using multi-threaded, asynchronous
/// batch processing. Activity is read in batches and processed sequentially
/// (batch-by-batch) to maintain ordering guarantees. Within each batch,
/// records are partitioned by (vendor, buyer) pair and processed in parallel
/// across multiple threads.
///
/// # Thread Safety
///
/// AsyncProcessingStrategy is Send + Sync and uses thread-safe components
/// internally (Arc-wrapped AsyncSettlementEngine with DashMap-based state).
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of records per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    ///
    /// # Returns
    ///
    /// A new `AsyncProcessingStrategy` configured for batch processing
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process ledger activity from input file and write balances to output
    ///
    /// This method implements the complete asynchronous batch pipeline:
    /// 1. Creates thread-safe engine components (AsyncLedgerStore, engine)
    /// 2. Creates a BatchProcessor for pair-based partitioning
    /// 3. Creates a tokio multi-threaded runtime
    /// 4. Reads activity in batches from CSV using AsyncReader
    /// 5. Processes each batch sequentially (waits for completion before the
    ///    next batch)
    /// 6. Within each batch, processes different pairs in parallel
    /// 7. Collects final outstanding balances per pair
    /// 8. Writes the balances to output using the csv_format module
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file
    /// * `output` - Mutable reference to a writer for outputting pair balances
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed successfully
    /// * `Err(String)` if a fatal error occurred
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors, runtime errors) are returned
    /// immediately. Individual record errors are logged to stderr and
    /// processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        // Create tokio runtime for async execution
        // Use multi-threaded runtime with configured number of worker threads
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        // Execute async processing within the runtime
        runtime.block_on(async {
            // Create thread-safe engine components
            let store = Arc::new(AsyncLedgerStore::new());
            let engine = Arc::new(AsyncSettlementEngine::new(Arc::clone(&store)));

            // Create batch processor
            let processor = BatchProcessor::new(Arc::clone(&engine));

            // Open the CSV file
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            // Create async CSV reader
            let mut reader = AsyncReader::new(compat_file);

            // Process batches sequentially to maintain per-pair ordering
            // across the entire file. Each batch is still processed in
            // parallel across different pairs.
            loop {
                // Read a batch of records using AsyncReader
                let batch = reader.read_batch(self.config.batch_size).await;

                // If batch is empty, we've reached end of file
                if batch.is_empty() {
                    break;
                }

                // Process batch and wait for completion before reading the
                // next batch. This ensures that if a pair's activity spans
                // multiple batches, it is processed in the correct order.
                let results = processor.process_batch(batch).await;
                for result in results {
                    if let Err(e) = result.result {
                        eprintln!("Activity processing error: {}", e);
                    }
                }
            }

            // Get final outstanding balances per pair
            let balances = store.outstanding_balances().map_err(|e| e.to_string())?;

            // Write pair balances to output using csv_format module
            write_balances_csv(&balances, output)?;

            Ok(())
        })
    }
}

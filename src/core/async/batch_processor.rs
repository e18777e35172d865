//! Batch processing with pair-based partitioning for async settlement
//!
//! This module provides the `BatchProcessor` struct, which manages concurrent
//! batch processing with pair-based partitioning to enable parallel processing
//! while maintaining per-pair activity ordering.
//!
//! # Design
//!
//! The `BatchProcessor` partitions batches by (vendor, buyer) pair, allowing
//! activity for different pairs to be processed concurrently while maintaining
//! sequential ordering for each individual pair's activity. Sequential
//! per-pair processing is what keeps FIFO allocation meaningful: a pair's
//! debits are always recorded before the payments that target them.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<AsyncSettlementEngine>  (shared settlement processor)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! All internal state is protected by Arc, and the underlying engine uses
//! thread-safe components.

use std::collections::HashMap;
use std::sync::Arc;

use super::AsyncSettlementEngine;
use crate::types::{ActivityRecord, PairKey, SettlementError};

/// Result of processing a single activity record
///
/// Contains the original record and the result of processing it.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The activity record that was processed
    pub record: ActivityRecord,

    /// The result of processing (success or error)
    pub result: Result<(), SettlementError>,
}

/// Batch processor with pair-based partitioning
///
/// `BatchProcessor` manages concurrent batch processing by partitioning
/// activity by (vendor, buyer) pair. This enables parallel processing of
/// activity for different pairs while maintaining sequential ordering for
/// each pair.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Thread-safe settlement engine
    ///
    /// Wrapped in Arc to enable sharing across async tasks.
    engine: Arc<AsyncSettlementEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `engine` - Arc-wrapped AsyncSettlementEngine for activity processing
    ///
    /// # Returns
    ///
    /// A new `BatchProcessor` that can be cloned and shared across async tasks.
    pub fn new(engine: Arc<AsyncSettlementEngine>) -> Self {
        Self { engine }
    }

    /// Partition a batch of activity records by (vendor, buyer) pair
    ///
    /// This method partitions a batch into sub-batches where each sub-batch
    /// contains only activity for a single pair. This enables parallel
    /// processing of different pairs while maintaining sequential ordering
    /// for each pair.
    ///
    /// # Arguments
    ///
    /// * `batch` - A vector of activity records to partition
    ///
    /// # Returns
    ///
    /// A HashMap where:
    /// - Keys are (vendor, buyer) pair keys
    /// - Values are vectors of records for that pair (in original order)
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one sub-batch
    /// - No records are lost or duplicated
    /// - Records for each pair maintain their original order
    pub fn partition_by_pair(
        &self,
        batch: Vec<ActivityRecord>,
    ) -> HashMap<PairKey, Vec<ActivityRecord>> {
        let mut pair_batches: HashMap<PairKey, Vec<ActivityRecord>> = HashMap::new();

        for record in batch {
            pair_batches
                .entry(PairKey::new(record.vendor, record.buyer))
                .or_default()
                .push(record);
        }

        pair_batches
    }

    /// Process all activity for a single pair sequentially
    ///
    /// Records are processed in the order they appear in the input vector,
    /// so per-pair ordering is maintained even when multiple pairs are
    /// being processed concurrently.
    ///
    /// # Arguments
    ///
    /// * `records` - A vector of activity records for one pair (in order)
    ///
    /// # Returns
    ///
    /// A vector of `ProcessingResult` containing the outcome of each record.
    /// Results are in the same order as the input records.
    ///
    /// # Guarantees
    ///
    /// - All records are processed, even if some fail
    /// - Errors are captured in the result and don't stop processing
    pub async fn process_pair_activity(
        &self,
        records: Vec<ActivityRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let result = self.engine.apply(record.clone());
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch of activity records with pair-based partitioning
    ///
    /// This method processes a batch by:
    /// 1. Partitioning the batch by (vendor, buyer) pair
    /// 2. Spawning tokio tasks to process each pair's activity concurrently
    /// 3. Waiting for all tasks to complete
    /// 4. Collecting and returning all results
    ///
    /// # Arguments
    ///
    /// * `batch` - A vector of activity records to process
    ///
    /// # Returns
    ///
    /// A vector of `ProcessingResult` containing the outcome of each record.
    /// Results may be in a different order than the input due to concurrent
    /// processing.
    ///
    /// # Guarantees
    ///
    /// - Activity for different pairs is processed concurrently
    /// - Activity for the same pair is processed sequentially in order
    /// - All records are processed, even if some fail
    pub async fn process_batch(&self, batch: Vec<ActivityRecord>) -> Vec<ProcessingResult> {
        // Partition batch by pair
        let pair_batches = self.partition_by_pair(batch);

        // Spawn tokio tasks for each pair's activity
        let mut tasks = Vec::new();
        for (_pair, records) in pair_batches {
            let processor = self.clone();
            let task = tokio::spawn(async move {
                processor.process_pair_activity(records).await
            });
            tasks.push(task);
        }

        // Wait for all tasks to complete and collect results
        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(pair_results) => results.extend(pair_results),
                Err(e) => {
                    eprintln!("Task panicked: {:?}", e);
                }
            }
        }

        results
    }
}

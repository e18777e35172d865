//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates activity processing by coordinating
//! between the SyncReader (for CSV input) and SettlementEngine (for business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Activity processing to `SettlementEngine` (business logic)
//! - CSV output to `csv_format::write_balances_csv` (format handling)
//!
//! This separation of concerns makes the code more maintainable and testable.
//!
//! # Memory Efficiency
//!
//! This strategy streams CSV records one at a time and never loads the raw
//! file into memory. The ledger retains every entry for audit, so the working
//! set grows with entry count rather than file size.
//!
//! # Thread Safety
//!
//! While this strategy is single-threaded, it implements Send + Sync to be
//! compatible with the ProcessingStrategy trait, allowing it to be used in
//! multi-threaded contexts if needed.

use crate::core::SettlementEngine;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// Implements the ProcessingStrategy trait using single-threaded, synchronous
/// processing. Orchestrates the flow between CSV reading, settlement processing,
/// and output generation.
///
/// # Examples
///
/// ```no_run
/// use rust_settlement_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("activity.csv"), &mut output)
///     .expect("Processing failed");
/// ```
///
/// # Thread Safety
///
/// SyncProcessingStrategy is Send + Sync, allowing it to be shared across threads
/// safely, even though it performs single-threaded processing.
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process activity records from input file and write results to output
    ///
    /// This method orchestrates the complete synchronous processing pipeline:
    /// 1. Creates a SyncReader to stream activity records from the CSV file
    /// 2. Creates a SettlementEngine to process the records
    /// 3. Iterates through records, processing each through the engine
    /// 4. Collects outstanding balances per vendor and buyer pair
    /// 5. Writes the balances to output using csv_format::write_balances_csv
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
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Individual record errors are logged to stderr and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let mut engine = SettlementEngine::new();

        let reader = SyncReader::new(input_path)?;

        // Process each activity record through the engine
        // The iterator interface allows us to process one record at a time
        for result in reader {
            match result {
                Ok(activity_record) => {
                    if let Err(e) = engine.apply(activity_record) {
                        eprintln!("Activity processing error: {}", e);
                    }
                }
                Err(e) => {
                    eprintln!("CSV parsing error: {}", e);
                }
            }
        }

        // Collect final outstanding balances
        let balances = engine
            .store()
            .outstanding_balances()
            .map_err(|e| e.to_string())?;

        write_balances_csv(&balances, output)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VENDOR: &str = "00000000-0000-0000-0000-0000000000a1";
    const BUYER: &str = "00000000-0000-0000-0000-0000000000b1";
    const OTHER_BUYER: &str = "00000000-0000-0000-0000-0000000000b2";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn header() -> String {
        "kind,vendor,buyer,amount,remarks\n".to_string()
    }

    fn row(kind: &str, buyer: &str, amount: &str) -> String {
        format!("{},{},{},{},\n", kind, VENDOR, buyer, amount)
    }

    #[test]
    fn test_sync_strategy_processes_valid_debit() {
        let csv_content = header() + &row("debit", BUYER, "100.00");
        let file = create_temp_csv(&csv_content);

        let strategy = SyncProcessingStrategy;
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("vendor"));
        assert!(output_str.contains("100.00"));
    }

    #[test]
    fn test_sync_strategy_processes_multiple_buyers() {
        let csv_content = header()
            + &row("debit", BUYER, "100.00")
            + &row("payment", BUYER, "40.00")
            + &row("debit", OTHER_BUYER, "200.00");
        let file = create_temp_csv(&csv_content);

        let strategy = SyncProcessingStrategy;
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        // Verify output carries both pair balances
        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains(BUYER));
        assert!(output_str.contains(OTHER_BUYER));
        assert!(output_str.contains("60.00"));
        assert!(output_str.contains("200.00"));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy;
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_allocates_payment_across_debits() {
        let csv_content = header()
            + &row("debit", BUYER, "100.00")
            + &row("debit", BUYER, "50.00")
            + &row("payment", BUYER, "120.00");
        let file = create_temp_csv(&csv_content);

        let strategy = SyncProcessingStrategy;
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        // 150.00 billed, 120.00 applied oldest first, 30.00 remains
        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("30.00"));
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }

    #[test]
    fn test_sync_strategy_can_be_copied() {
        let strategy1 = SyncProcessingStrategy;
        let strategy2 = strategy1;

        // Both should work independently
        let csv_content = header() + &row("debit", BUYER, "100.00");
        let file1 = create_temp_csv(&csv_content);
        let file2 = create_temp_csv(&csv_content);

        let mut output1 = Vec::new();
        let mut output2 = Vec::new();

        assert!(strategy1.process(file1.path(), &mut output1).is_ok());
        assert!(strategy2.process(file2.path(), &mut output2).is_ok());
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        // Second record has an invalid amount, but processing should continue
        let csv_content = header()
            + &row("debit", BUYER, "100.00")
            + &row("debit", BUYER, "invalid")
            + &row("payment", BUYER, "25.00");
        let file = create_temp_csv(&csv_content);

        let strategy = SyncProcessingStrategy;
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        // The malformed debit is skipped: 100.00 billed, 25.00 paid
        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("75.00"));
    }
}

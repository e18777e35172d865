//! Settlement Engine CLI
//!
//! Command-line interface for replaying ledger activity from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- activity.csv > balances.csv
//! cargo run -- --strategy sync activity.csv > balances.csv
//! cargo run -- --strategy async activity.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 activity.csv > balances.csv
//! ```
//!
//! The program reads activity records (debits, credits, payments) from the
//! input CSV file, replays them through the settlement engine using the
//! selected processing strategy, and outputs the outstanding balance of
//! every (vendor, buyer) pair to stdout.
//!
//! # Processing Strategies
//!
//! - **sync**: Synchronous CSV parsing with single-threaded processing
//! - **async**: Asynchronous batch processing with multi-threaded parallelism (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use rust_settlement_engine::cli;
use rust_settlement_engine::strategy;
use std::process;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    // Replay activity using the selected strategy
    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

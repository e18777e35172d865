//! CSV format handling for activity records and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - ActivityCsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Outstanding balance output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{ActivityRecord, BuyerId, EntryKind, PairBalance, VendorId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: kind, vendor, buyer, amount,
/// remarks. Amount and remarks are read as raw strings so that parse
/// failures can be reported per row instead of aborting the whole file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ActivityCsvRecord {
    pub kind: String,
    pub vendor: String,
    pub buyer: String,
    pub amount: Option<String>,
    pub remarks: Option<String>,
}

/// Convert an ActivityCsvRecord to an ActivityRecord
///
/// This function:
/// - Parses the kind string into an EntryKind enum
/// - Parses the vendor and buyer ids
/// - Parses the amount string into a Decimal (required for every kind)
/// - Drops empty remarks
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(ActivityRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_activity_record(csv_record: ActivityCsvRecord) -> Result<ActivityRecord, String> {
    let kind = match csv_record.kind.to_lowercase().as_str() {
        "debit" => EntryKind::Debit,
        "credit" => EntryKind::Credit,
        "payment" => EntryKind::Payment,
        _ => return Err(format!("Invalid entry kind: '{}'", csv_record.kind)),
    };

    let vendor = VendorId::from_str(&csv_record.vendor).map_err(|e| e.to_string())?;
    let buyer = BuyerId::from_str(&csv_record.buyer).map_err(|e| e.to_string())?;

    // Every kind carries an amount; a payment of zero is legal but the
    // column itself must be present
    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match Decimal::from_str(amount_str.trim()) {
                Ok(decimal) => decimal,
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for buyer {}",
                        amount_str, buyer
                    ))
                }
            }
        }
        _ => {
            return Err(format!(
                "{:?} record for buyer {} requires an amount",
                kind, buyer
            ))
        }
    };

    let remarks = csv_record.remarks.filter(|s| !s.trim().is_empty());

    Ok(ActivityRecord {
        kind,
        vendor,
        buyer,
        amount,
        remarks,
    })
}

/// Write outstanding pair balances to CSV format
///
/// Writes balances in CSV format with columns: vendor, buyer, outstanding.
/// Rows are sorted by vendor then buyer for deterministic output, and
/// amounts are rendered with two decimal places.
///
/// # Arguments
///
/// * `balances` - Slice of pair balances to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_balances_csv(balances: &[PairBalance], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    // Write header
    writer
        .write_record(["vendor", "buyer", "outstanding"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    // Sort by pair for deterministic output
    let mut sorted_balances = balances.to_vec();
    sorted_balances.sort_by_key(|balance| (balance.vendor, balance.buyer));

    // Write each balance
    for balance in sorted_balances {
        writer
            .write_record(&[
                balance.vendor.to_string(),
                balance.buyer.to_string(),
                format!("{:.2}", balance.outstanding),
            ])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

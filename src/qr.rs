//! QR payload encoding and parsing
//!
//! A vendor's QR code carries the payload `vendor:<name>:<id>`. Scanning
//! it tells the buyer's device which vendor a settlement targets. Only the
//! payload string lives here; rendering it as an image is up to the
//! presentation layer.

use std::fmt;
use std::str::FromStr;

use crate::types::{SettlementError, VendorId};

/// Parsed contents of a vendor QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    /// Display name embedded in the code
    pub vendor_name: String,

    /// The vendor a scanned payment settles against
    pub vendor: VendorId,
}

impl QrPayload {
    /// Build a payload for a vendor
    ///
    /// # Returns
    ///
    /// * `Err(SettlementError::NilParty)` - The vendor id is nil
    /// * `Err(SettlementError::InvalidQrPayload)` - The name is empty
    pub fn new(vendor_name: impl Into<String>, vendor: VendorId) -> Result<Self, SettlementError> {
        if vendor.is_nil() {
            return Err(SettlementError::nil_party("vendor"));
        }
        let vendor_name = vendor_name.into();
        if vendor_name.trim().is_empty() {
            return Err(SettlementError::invalid_qr_payload(&vendor_name));
        }
        Ok(Self {
            vendor_name,
            vendor,
        })
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vendor:{}:{}", self.vendor_name, self.vendor)
    }
}

impl FromStr for QrPayload {
    type Err = SettlementError;

    /// Parse a payload of the form `vendor:<name>:<id>`
    ///
    /// The name may itself contain colons; the id is everything after the
    /// last colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("vendor:")
            .ok_or_else(|| SettlementError::invalid_qr_payload(s))?;
        let (name, id) = rest
            .rsplit_once(':')
            .ok_or_else(|| SettlementError::invalid_qr_payload(s))?;
        if name.trim().is_empty() {
            return Err(SettlementError::invalid_qr_payload(s));
        }
        let vendor: VendorId = id
            .parse()
            .map_err(|_| SettlementError::invalid_qr_payload(s))?;
        if vendor.is_nil() {
            return Err(SettlementError::invalid_qr_payload(s));
        }
        Ok(Self {
            vendor_name: name.to_string(),
            vendor,
        })
    }
}

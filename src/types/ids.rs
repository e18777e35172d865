//! Identifier types for the Settlement Engine
//!
//! Parties and ledger entries are identified by UUIDv7 newtypes. The
//! distinct types prevent a buyer id from being passed where a vendor id
//! is expected, and v7 ids are time-ordered, so id order agrees with
//! creation order within a process.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SettlementError;

/// Identifier of a single ledger entry
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

/// Identifier of a vendor (the party owed)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(Uuid);

/// Identifier of a buyer (the party owing)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyerId(Uuid);

macro_rules! impl_uuid_id {
    ($t:ty, $role:literal) => {
        impl $t {
            /// Create a new time-ordered identifier.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The all-zero uuid never identifies a real party or entry.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = SettlementError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid =
                    Uuid::from_str(s).map_err(|_| SettlementError::invalid_id($role, s))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_id!(EntryId, "entry");
impl_uuid_id!(VendorId, "vendor");
impl_uuid_id!(BuyerId, "buyer");

/// One `(vendor, buyer)` relationship
///
/// The ledger is keyed by pair: all entries between a vendor and a buyer
/// live together, and settlement serialization is scoped to this key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    /// The vendor side of the relationship
    pub vendor: VendorId,

    /// The buyer side of the relationship
    pub buyer: BuyerId,
}

impl PairKey {
    pub fn new(vendor: VendorId, buyer: BuyerId) -> Self {
        Self { vendor, buyer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_distinct() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_ids_are_not_nil() {
        assert!(!VendorId::new().is_nil());
        assert!(!BuyerId::new().is_nil());
        assert!(!EntryId::new().is_nil());
    }

    #[test]
    fn test_nil_uuid_is_nil() {
        let nil = VendorId::from_uuid(Uuid::nil());
        assert!(nil.is_nil());
    }

    #[test]
    fn test_display_and_parse_round_trip() {
        let id = VendorId::new();
        let parsed: VendorId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_malformed_id() {
        let result = "not-a-uuid".parse::<BuyerId>();
        assert!(matches!(
            result,
            Err(SettlementError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_pair_key_equality() {
        let vendor = VendorId::new();
        let buyer = BuyerId::new();
        assert_eq!(PairKey::new(vendor, buyer), PairKey::new(vendor, buyer));
    }

    #[test]
    fn test_pair_key_distinguishes_buyers() {
        let vendor = VendorId::new();
        assert_ne!(
            PairKey::new(vendor, BuyerId::new()),
            PairKey::new(vendor, BuyerId::new())
        );
    }
}

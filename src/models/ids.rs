//! Strongly-typed ID wrappers for all entity types
//!
//! Ids are positive integers assigned monotonically per table. Newtype
//! wrappers keep a vehicle id from being passed where a note id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw integer
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Accept "#12" as printed in history listings
                let s = s.trim();
                let s = s.strip_prefix('#').unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(VehicleId);
define_id!(MaintenanceId);
define_id!(RentalId);
define_id!(ReminderId);
define_id!(NoteId);
define_id!(UserId);
define_id!(ChangeRecordId);

//! Sequential identifiers for catalog and value-table entries.
//!
//! Both IDs are distinct newtype wrappers over `u32`, so a `TypeNodeId`
//! cannot be used where a `ValueNodeId` is expected. IDs are handed out in
//! discovery order starting at zero, and travel on the wire as decimal
//! strings (`"0"`, `"1"`, ...).

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of a [`TypeNode`](crate::tree::TypeNode) within one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TypeNodeId(pub u32);

/// Identity of a [`ValueNode`](crate::tree::ValueNode) within one extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ValueNodeId(pub u32);

macro_rules! string_id {
    ($($id:ident),*) => {$(
        impl $id {
            /// Position of the node in its published sequence.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $id {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($id)
            }
        }

        impl From<$id> for String {
            fn from(id: $id) -> String {
                id.to_string()
            }
        }

        impl TryFrom<String> for $id {
            type Error = ParseIntError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }
    )*};
}

string_id!(TypeNodeId, ValueNodeId);

//! Per-edge flags recording how a value was reached.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// How a specific edge was reached. A property of the edge, not of the
    /// target node: the same node can be reached through several edges with
    /// different flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeFlags: u8 {
        /// Anonymous (tuple-position) struct field.
        const ANONYMOUS = 1 << 0;
        /// The edge passed through at least one pointer.
        const POINTER = 1 << 1;
        /// The field is not `pub`.
        const UNEXPORTED = 1 << 2;
    }
}

// Wire format is the raw bitmask.

impl Serialize for EdgeFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for EdgeFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(EdgeFlags::from_bits_retain(bits))
    }
}

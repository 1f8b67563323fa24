extern crate self as objtree_core;

mod catalog;
pub mod describe;
pub mod docs;
pub mod error;
pub mod flags;
pub mod id;
mod impls;
pub mod inspect;
pub mod kind;
pub mod options;
pub mod stats;
pub mod tree;
pub mod values;

// Re-export commonly used types
pub use describe::{display_of, Describe, Member, TypeDesc, TypeRef};
pub use docs::{DocIndex, DocLookup, EmbeddedDocs, NoDocs};
pub use error::TreeError;
pub use flags::EdgeFlags;
pub use id::{TypeNodeId, ValueNodeId};
pub use inspect::{AsInspect, Entry, Field, Identity, Inspect, Object, Pointee, View};
pub use kind::Kind;
pub use options::{ExtractOptions, DEFAULT_MAX_DEPTH};
pub use stats::TreeStats;
pub use tree::{Tree, TypeNode, ValueNode};
pub use values::{extract, ExpansionPolicy};

pub use objtree_derive::{interface, Inspect};

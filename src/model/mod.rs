//! # Graph Records
//!
//! The records this crate consumes from the query/response layer.
//! Read-only input: nothing in the mapping core mutates them.
//!
//! Design rule: pure data — no I/O, no state, no type metadata.

pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId};
pub use value::Value;
pub use property_map::PropertyMap;

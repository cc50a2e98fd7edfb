//! # neo4j-ogm — Entity Instantiation for the Property Graph
//!
//! The object-instantiation layer of a graph-to-object mapper: given a node
//! record, work out which Rust type its labels stand for and build a bare
//! instance of it, ready for hydration.
//!
//! ## Design Principles
//!
//! 1. **Registration, not reflection**: every mappable type is described once
//!    by a `TypeDescriptor` carrying its labels, supertype and constructor
//! 2. **Frozen metadata**: `TypeRegistry` is built at startup and never mutated
//! 3. **Most specific wins**: a node labelled for a type and its subtype maps
//!    to the subtype
//! 4. **Trait seam**: `EntityInstantiator` is the contract between the factory
//!    and whatever builds objects
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use neo4j_ogm::{EntityFactory, Node, NodeId, RegistryConfig, TypeDescriptor, TypeRegistry};
//!
//! #[derive(Debug, Default)]
//! struct Individual { name: Option<String> }
//!
//! # fn main() -> neo4j_ogm::Result<()> {
//! let registry = TypeRegistry::builder()
//!     .register(TypeDescriptor::of::<Individual>().package("domain::social").default_constructor())
//!     .build(&RegistryConfig::new(["domain::social"]))?;
//! let factory = EntityFactory::new(Arc::new(registry));
//!
//! let node = Node::new(NodeId(-1)).with_labels(["Female", "Individual"]);
//! let sheila: Individual = factory.new_object_as(&node)?;
//! assert!(sheila.name.is_none());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod metadata;
pub mod instantiate;
pub mod factory;

// ============================================================================
// Re-exports: Model (the records)
// ============================================================================

pub use model::{Node, NodeId, PropertyMap, RelId, Relationship, Value};

// ============================================================================
// Re-exports: Metadata
// ============================================================================

pub use metadata::{
    AmbiguityPolicy, BoxError, DescriptorBuilder, EntityKind, RegistryBuilder, RegistryConfig,
    TypeDescriptor, TypeRegistry,
};

// ============================================================================
// Re-exports: Instantiation
// ============================================================================

pub use instantiate::{DescriptorInstantiator, EntityInstantiator, Instance};
pub use factory::EntityFactory;

// ============================================================================
// Error Types
// ============================================================================

/// Every failure this crate reports. All are deterministic: retrying the same
/// call against the same registry fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node has no labels, so resolution was not attempted.
    #[error("Node {id} carries no labels; cannot resolve an entity type")]
    NoLabels { id: NodeId },

    /// The relationship type is empty.
    #[error("Relationship {id} has no type; cannot resolve an entity type")]
    NoRelationshipType { id: RelId },

    /// None of the labels maps to a registered type.
    #[error("No registered entity type for labels {labels:?}")]
    UnmappedLabels { labels: Vec<String> },

    /// Several unrelated types match under `AmbiguityPolicy::Reject`.
    #[error("Labels {labels:?} match unrelated entity types {candidates:?}")]
    AmbiguousLabels { labels: Vec<String>, candidates: Vec<String> },

    /// The type was found but could not be built.
    #[error("Cannot construct {type_name}: {reason}")]
    Construction {
        type_name: String,
        #[source]
        reason: ConstructionFailure,
    },

    /// A constructed value was not the type the caller asked for.
    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    /// A configured scan root covers no registration.
    #[error("Scan root `{0}` matches no registered entity type")]
    ScanRoot(String),

    /// A configured scan root is blank or only `::`.
    #[error("Scan root #{index} is empty; name a module path such as `domain::social`")]
    EmptyScanRoot { index: usize },

    /// Following `extends` links from `type_name` comes back around.
    #[error("Supertype chain of {type_name} is cyclic")]
    CyclicHierarchy { type_name: String },

    /// The registry configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Why a resolved or explicitly given type could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionFailure {
    /// Abstract type: nothing was registered to build it.
    #[error("no zero-argument constructor registered")]
    NoConstructor,

    /// The registered constructor returned an error; it is kept as the source.
    #[error("constructor failed: {0}")]
    Failed(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, Error>;

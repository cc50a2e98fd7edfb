//! # Mapping Metadata
//!
//! Which Rust types map which labels. Built once at startup from an
//! explicit registration list, then read-only.
//!
//! | Item | Role |
//! |------|------|
//! | [`TypeDescriptor`] | One mappable type: labels, supertype, constructor |
//! | [`TypeRegistry`] | Label → descriptor resolution |
//! | [`RegistryConfig`] | Scan roots and ambiguity policy |

pub mod config;
pub mod descriptor;
pub mod registry;

pub use config::{AmbiguityPolicy, RegistryConfig};
pub use descriptor::{
    AnyEntity, BoxError, Constructor, DescriptorBuilder, EntityKind, SuperType, TypeDescriptor,
};
pub use registry::{RegistryBuilder, TypeRegistry};

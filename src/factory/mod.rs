//! # Entity Factory
//!
//! Turns raw graph records into bare, typed entities:
//!
//! ```text
//! Node → label set → TypeRegistry::resolve → EntityInstantiator → Instance
//! ```
//!
//! Every step fails with a typed [`Error`]; nothing is retried and nothing
//! falls back to a base type. The factory keeps no state between calls.

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use crate::instantiate::{DescriptorInstantiator, EntityInstantiator, Instance};
use crate::metadata::{TypeDescriptor, TypeRegistry};
use crate::model::{Node, PropertyMap, Relationship};
use crate::{Error, Result};

/// Builds entities for nodes and relationships.
#[derive(Debug, Clone)]
pub struct EntityFactory<I = DescriptorInstantiator> {
    registry: Arc<TypeRegistry>,
    instantiator: I,
}

impl EntityFactory {
    /// Factory using the constructors registered on each descriptor.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_instantiator(registry, DescriptorInstantiator)
    }
}

impl<I: EntityInstantiator> EntityFactory<I> {
    pub fn with_instantiator(registry: Arc<TypeRegistry>, instantiator: I) -> Self {
        Self { registry, instantiator }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn instantiator(&self) -> &I {
        &self.instantiator
    }

    /// Construct the most specific registered type for `node`'s labels.
    ///
    /// Fails with [`Error::NoLabels`] before resolution when the node has no
    /// labels, [`Error::UnmappedLabels`] / [`Error::AmbiguousLabels`] from
    /// resolution, and [`Error::Construction`] from the instantiator.
    pub fn new_object(&self, node: &Node) -> Result<Instance> {
        let labels = node.label_set();
        if labels.is_empty() {
            return Err(Error::NoLabels { id: node.id });
        }

        let descriptor = self.registry.resolve(&labels)?;
        debug!(node = %node.id, type_name = descriptor.type_name(), "creating entity for node");
        self.instantiator.create_instance(descriptor, &PropertyMap::new())
    }

    /// [`new_object`](Self::new_object), downcast to `T`.
    pub fn new_object_as<T: Any>(&self, node: &Node) -> Result<T> {
        self.new_object(node)?.into_typed()
    }

    /// Construct `descriptor`'s type directly. The registry is not
    /// consulted, so unregistered descriptors work too.
    pub fn new_object_of(&self, descriptor: &TypeDescriptor, seed: &PropertyMap) -> Result<Instance> {
        self.instantiator.create_instance(descriptor, seed)
    }

    /// [`new_object_of`](Self::new_object_of), downcast to `T`.
    pub fn new_instance<T: Any>(&self, descriptor: &TypeDescriptor, seed: &PropertyMap) -> Result<T> {
        self.new_object_of(descriptor, seed)?.into_typed()
    }

    /// Construct the relationship entity registered for `rel`'s type.
    pub fn new_relationship_object(&self, rel: &Relationship) -> Result<Instance> {
        if rel.rel_type.is_empty() {
            return Err(Error::NoRelationshipType { id: rel.id });
        }

        let descriptor = self.registry.resolve_relationship(&rel.rel_type)?;
        debug!(relationship = %rel.id, type_name = descriptor.type_name(), "creating entity for relationship");
        self.instantiator.create_instance(descriptor, &PropertyMap::new())
    }
}

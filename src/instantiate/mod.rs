//! # Entity Instantiation
//!
//! `EntityInstantiator` is the contract between the factory and whatever
//! knows how to build a bare object for a [`TypeDescriptor`].
//!
//! | Instantiator | Description |
//! |--------------|-------------|
//! | [`DescriptorInstantiator`] | Calls the zero-argument constructor registered on the descriptor |
//!
//! Instantiation never touches the registry or any other shared state.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use tracing::trace;

use crate::metadata::{AnyEntity, TypeDescriptor};
use crate::model::PropertyMap;
use crate::{ConstructionFailure, Error, Result};

// ============================================================================
// Instance
// ============================================================================

/// A freshly constructed, not yet hydrated entity. Owned by the caller.
pub struct Instance {
    type_id: TypeId,
    type_name: &'static str,
    value: AnyEntity,
}

impl Instance {
    /// Wrap a constructed value, checking that it really is `descriptor`'s type.
    pub fn new(descriptor: &TypeDescriptor, value: AnyEntity) -> Result<Self> {
        let actual = (*value).type_id();
        if actual != descriptor.type_id() {
            return Err(Error::TypeError {
                expected: descriptor.type_name().to_owned(),
                got: format!("{actual:?}"),
            });
        }
        Ok(Self {
            type_id: actual,
            type_name: descriptor.type_name(),
            value,
        })
    }

    pub fn entity_type_id(&self) -> TypeId { self.type_id }
    pub fn type_name(&self) -> &'static str { self.type_name }

    pub fn is<T: Any>(&self) -> bool {
        (*self.value).is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.value).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.value).downcast_mut::<T>()
    }

    /// Take the concrete value out; hands the instance back on mismatch.
    pub fn downcast<T: Any>(self) -> std::result::Result<T, Self> {
        let Self { type_id, type_name, value } = self;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|value| Self { type_id, type_name, value })
    }

    /// Like [`downcast`](Self::downcast), reporting a mismatch as [`Error::TypeError`].
    pub fn into_typed<T: Any>(self) -> Result<T> {
        self.downcast::<T>().map_err(|instance| Error::TypeError {
            expected: type_name::<T>().to_owned(),
            got: instance.type_name.to_owned(),
        })
    }

    pub fn into_inner(self) -> AnyEntity {
        self.value
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type_name", &self.type_name).finish_non_exhaustive()
    }
}

// ============================================================================
// EntityInstantiator Trait
// ============================================================================

/// Builds bare entities.
pub trait EntityInstantiator: Send + Sync {
    /// Construct a new, empty instance of `descriptor`'s type.
    ///
    /// `seed` carries the node's properties for instantiators that want them
    /// at construction time; implementations are free to ignore it.
    fn create_instance(&self, descriptor: &TypeDescriptor, seed: &PropertyMap) -> Result<Instance>;
}

impl<I: EntityInstantiator + ?Sized> EntityInstantiator for Box<I> {
    fn create_instance(&self, descriptor: &TypeDescriptor, seed: &PropertyMap) -> Result<Instance> {
        (**self).create_instance(descriptor, seed)
    }
}

// ============================================================================
// DescriptorInstantiator
// ============================================================================

/// Uses the constructor registered on the descriptor. The seed is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorInstantiator;

impl EntityInstantiator for DescriptorInstantiator {
    fn create_instance(&self, descriptor: &TypeDescriptor, seed: &PropertyMap) -> Result<Instance> {
        let constructor = descriptor.constructor().ok_or_else(|| Error::Construction {
            type_name: descriptor.type_name().to_owned(),
            reason: ConstructionFailure::NoConstructor,
        })?;

        trace!(type_name = descriptor.type_name(), seed_properties = seed.len(), "instantiating entity");

        let value = constructor.call().map_err(|cause| Error::Construction {
            type_name: descriptor.type_name().to_owned(),
            reason: ConstructionFailure::Failed(cause),
        })?;
        Instance::new(descriptor, value)
    }
}

//! Type descriptors — the registered handle for one mappable Rust type.
//!
//! A descriptor carries everything the mapping core needs to know about a
//! type without the type cooperating at runtime: its identity, the labels
//! it answers to, its supertype link, and a zero-argument constructor.
//!
//! ```rust
//! use neo4j_ogm::TypeDescriptor;
//!
//! #[derive(Default)]
//! struct Individual { name: Option<String> }
//!
//! let descriptor = TypeDescriptor::of::<Individual>()
//!     .package("domain::social")
//!     .default_constructor()
//!     .build();
//!
//! assert_eq!(descriptor.labels(), ["Individual"]);
//! assert!(descriptor.is_instantiable());
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Boxed error carried out of a failing constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A freshly constructed, type-erased entity.
pub type AnyEntity = Box<dyn Any + Send + Sync>;

type ConstructFn = dyn Fn() -> Result<AnyEntity, BoxError> + Send + Sync;

/// Whether a type maps graph nodes or relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Node,
    Relationship,
}

/// Type-erased zero-argument constructor.
#[derive(Clone)]
pub struct Constructor(Arc<ConstructFn>);

impl Constructor {
    fn new<T, E>(ctor: fn() -> Result<T, E>) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError> + 'static,
    {
        Self(Arc::new(move || -> Result<AnyEntity, BoxError> {
            ctor().map(|value| Box::new(value) as AnyEntity).map_err(Into::into)
        }))
    }

    /// Run the constructor.
    pub fn call(&self) -> Result<AnyEntity, BoxError> {
        (self.0)()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constructor(..)")
    }
}

/// Link from a descriptor to its direct supertype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperType {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

/// Registered handle for one concrete application type. Immutable once built.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    simple_name: &'static str,
    package: String,
    labels: SmallVec<[String; 2]>,
    supertype: Option<SuperType>,
    kind: EntityKind,
    constructor: Option<Constructor>,
}

impl TypeDescriptor {
    /// Start describing `T`. Defaults: package is `T`'s module path, the
    /// single label is `T`'s simple name, kind is [`EntityKind::Node`], and
    /// there is no constructor (an abstract type).
    pub fn of<T: Any + Send + Sync>() -> DescriptorBuilder<T> {
        let full = type_name::<T>();
        let (package, simple_name) = split_type_name(full);
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                type_id: TypeId::of::<T>(),
                type_name: full,
                simple_name,
                package: package.to_owned(),
                labels: smallvec![simple_name.to_owned()],
                supertype: None,
                kind: EntityKind::Node,
                constructor: None,
            },
            labels_overridden: false,
            _marker: PhantomData,
        }
    }

    pub fn type_id(&self) -> TypeId { self.type_id }
    pub fn type_name(&self) -> &'static str { self.type_name }
    pub fn simple_name(&self) -> &'static str { self.simple_name }
    pub fn package(&self) -> &str { &self.package }
    pub fn labels(&self) -> &[String] { &self.labels }
    pub fn kind(&self) -> EntityKind { self.kind }
    pub fn supertype(&self) -> Option<&SuperType> { self.supertype.as_ref() }
    pub fn constructor(&self) -> Option<&Constructor> { self.constructor.as_ref() }

    /// The label written first; for relationship entities, the relationship type.
    pub fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or(self.simple_name)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// True when a zero-argument constructor is registered.
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// True when this descriptor describes `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// True when `package` equals `root` or is nested under it.
    pub(crate) fn is_under(&self, root: &str) -> bool {
        self.package == root
            || self
                .package
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

/// Builder returned by [`TypeDescriptor::of`].
pub struct DescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    labels_overridden: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> DescriptorBuilder<T> {
    /// Override the module path matched against scan roots.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.descriptor.package = package.into();
        self
    }

    /// Add a label. The first call replaces the default simple-name label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        if !self.labels_overridden {
            self.descriptor.labels.clear();
            self.labels_overridden = true;
        }
        let label = label.into();
        if !self.descriptor.labels.contains(&label) {
            self.descriptor.labels.push(label);
        }
        self
    }

    /// Declare `P` as the direct supertype.
    pub fn extends<P: Any>(mut self) -> Self {
        self.descriptor.supertype = Some(SuperType {
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
        });
        self
    }

    /// Map relationships of type `rel_type` instead of nodes.
    pub fn relationship(mut self, rel_type: impl Into<String>) -> Self {
        self.descriptor.kind = EntityKind::Relationship;
        self.descriptor.labels = smallvec![rel_type.into()];
        self.labels_overridden = true;
        self
    }

    /// Register an infallible zero-argument constructor. Private `fn`s are
    /// fine: the owning module hands the pointer over at registration time.
    pub fn constructor(mut self, ctor: fn() -> T) -> Self {
        self.descriptor.constructor = Some(Constructor(Arc::new(
            move || -> Result<AnyEntity, BoxError> { Ok(Box::new(ctor())) },
        )));
        self
    }

    /// Register a zero-argument constructor that may fail.
    pub fn try_constructor<E>(mut self, ctor: fn() -> Result<T, E>) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        self.descriptor.constructor = Some(Constructor::new(ctor));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

impl<T: Default + Any + Send + Sync> DescriptorBuilder<T> {
    /// Use `T::default` as the zero-argument constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(T::default)
    }
}

impl<T: Any + Send + Sync> From<DescriptorBuilder<T>> for TypeDescriptor {
    fn from(builder: DescriptorBuilder<T>) -> Self {
        builder.build()
    }
}

/// Split `a::b::Name<X>` into (`a::b`, `Name`).
fn split_type_name(full: &str) -> (&str, &str) {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(i) => (&base[..i], &base[i + 2..]),
        None => ("", base),
    }
}

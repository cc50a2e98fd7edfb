//! Type registry — label → entity type resolution.
//!
//! The registry is built once from an explicit list of descriptors. Only
//! descriptors whose package lies under a configured scan root are kept.
//! After `build()` it never changes, so share it by `Arc` and resolve
//! from as many threads as you like.
//!
//! ## Resolution
//!
//! 1. Collect every node-kind descriptor that answers to a label in the set.
//!    Unknown labels are skipped.
//! 2. Drop every candidate that is a supertype of another candidate: a node
//!    labelled `[Person, Student]` is a `Student`.
//! 3. One survivor wins. Several unrelated survivors go to the
//!    [`AmbiguityPolicy`].

use std::any::{Any, TypeId};

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::config::{AmbiguityPolicy, RegistryConfig};
use super::descriptor::{EntityKind, SuperType, TypeDescriptor};
use crate::{Error, Result};

type Slots = SmallVec<[usize; 2]>;

// ============================================================================
// RegistryBuilder
// ============================================================================

/// Collects registrations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registrations: Vec<TypeDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, descriptor: impl Into<TypeDescriptor>) -> Self {
        self.registrations.push(descriptor.into());
        self
    }

    pub fn register_all<D: Into<TypeDescriptor>>(mut self, descriptors: impl IntoIterator<Item = D>) -> Self {
        self.registrations.extend(descriptors.into_iter().map(Into::into));
        self
    }

    /// Freeze the registrations that lie under `config.scan_roots`.
    ///
    /// Fails with [`Error::ScanRoot`] when a root covers no registration.
    pub fn build(self, config: &RegistryConfig) -> Result<TypeRegistry> {
        let roots = config.normalized_roots()?;

        for root in &roots {
            if !self.registrations.iter().any(|d| d.is_under(root)) {
                warn!(root, "scan root matches no registered entity type");
                return Err(Error::ScanRoot((*root).to_owned()));
            }
        }

        // Supertype links come from every registration, in scope or not, so a
        // chain through an out-of-scope type still ranks its ends.
        let mut hierarchy: HashMap<TypeId, SuperType> = HashMap::new();
        for descriptor in &self.registrations {
            if let Some(parent) = descriptor.supertype() {
                hierarchy.entry(descriptor.type_id()).or_insert(*parent);
            }
        }
        check_acyclic(&hierarchy, &self.registrations)?;

        let mut registry = TypeRegistry {
            ambiguity: config.ambiguity,
            hierarchy,
            ..TypeRegistry::empty()
        };

        for descriptor in self.registrations {
            if !roots.iter().any(|root| descriptor.is_under(root)) {
                continue;
            }
            if registry.by_type.contains_key(&descriptor.type_id()) {
                warn!(type_name = descriptor.type_name(), "duplicate registration ignored");
                continue;
            }
            registry.insert(descriptor);
        }

        info!(
            types = registry.descriptors.len(),
            labels = registry.by_label.len(),
            relationship_types = registry.by_rel_type.len(),
            roots = ?roots,
            "entity type registry built"
        );
        Ok(registry)
    }
}

/// Fail when following supertype links from any registration revisits a type.
fn check_acyclic(hierarchy: &HashMap<TypeId, SuperType>, registrations: &[TypeDescriptor]) -> Result<()> {
    for descriptor in registrations {
        let mut seen: Vec<TypeId> = vec![descriptor.type_id()];
        let mut current = descriptor.type_id();
        while let Some(parent) = hierarchy.get(&current) {
            if seen.contains(&parent.type_id) {
                warn!(type_name = descriptor.type_name(), "supertype cycle");
                return Err(Error::CyclicHierarchy {
                    type_name: descriptor.type_name().to_owned(),
                });
            }
            seen.push(parent.type_id);
            current = parent.type_id;
        }
    }
    Ok(())
}

// ============================================================================
// TypeRegistry
// ============================================================================

/// Immutable label → [`TypeDescriptor`] mapping.
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: Vec<TypeDescriptor>,
    by_label: HashMap<String, Slots>,
    by_rel_type: HashMap<String, Slots>,
    by_type: HashMap<TypeId, usize>,
    /// type → direct supertype, for every registration including out-of-scope ones
    hierarchy: HashMap<TypeId, SuperType>,
    ambiguity: AmbiguityPolicy,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry that maps nothing.
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
            by_label: HashMap::new(),
            by_rel_type: HashMap::new(),
            by_type: HashMap::new(),
            hierarchy: HashMap::new(),
            ambiguity: AmbiguityPolicy::default(),
        }
    }

    fn insert(&mut self, descriptor: TypeDescriptor) {
        let slot = self.descriptors.len();
        let index = match descriptor.kind() {
            EntityKind::Node => &mut self.by_label,
            EntityKind::Relationship => &mut self.by_rel_type,
        };
        for label in descriptor.labels() {
            index.entry(label.clone()).or_default().push(slot);
        }
        self.by_type.insert(descriptor.type_id(), slot);
        self.descriptors.push(descriptor);
    }

    pub fn len(&self) -> usize { self.descriptors.len() }
    pub fn is_empty(&self) -> bool { self.descriptors.is_empty() }
    pub fn ambiguity(&self) -> AmbiguityPolicy { self.ambiguity }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.descriptors.iter()
    }

    /// Descriptor registered for `T`, if any.
    pub fn get<T: Any>(&self) -> Option<&TypeDescriptor> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<&TypeDescriptor> {
        self.by_type.get(&type_id).map(|&slot| &self.descriptors[slot])
    }

    /// Node-kind descriptors answering to exactly `label`.
    pub fn for_label(&self, label: &str) -> impl Iterator<Item = &TypeDescriptor> {
        self.by_label
            .get(label)
            .into_iter()
            .flatten()
            .map(|&slot| &self.descriptors[slot])
    }

    /// True when `sub` is a strict descendant of `sup`. Links declared by
    /// types outside the scan roots count too.
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        let mut current = sub;
        // acyclic since build(), so the walk ends
        while let Some(parent) = self.hierarchy.get(&current) {
            if parent.type_id == sup {
                return true;
            }
            current = parent.type_id;
        }
        false
    }

    /// Resolve a node label set to the most specific registered type.
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S]) -> Result<&TypeDescriptor> {
        let mut candidates = Slots::new();
        for label in labels {
            for &slot in self.by_label.get(label.as_ref()).into_iter().flatten() {
                if !candidates.contains(&slot) {
                    candidates.push(slot);
                }
            }
        }
        self.select(labels, candidates)
    }

    /// Resolve a relationship type to its registered relationship entity.
    pub fn resolve_relationship(&self, rel_type: &str) -> Result<&TypeDescriptor> {
        let candidates = self.by_rel_type.get(rel_type).cloned().unwrap_or_default();
        self.select(&[rel_type], candidates)
    }

    fn select<S: AsRef<str>>(&self, labels: &[S], candidates: Slots) -> Result<&TypeDescriptor> {
        let specific: Slots = candidates
            .iter()
            .copied()
            .filter(|&slot| {
                let ancestor = self.descriptors[slot].type_id();
                !candidates.iter().any(|&other| {
                    other != slot
                        && self.is_subtype_of(self.descriptors[other].type_id(), ancestor)
                })
            })
            .collect();

        match specific.as_slice() {
            [] => {
                debug!(labels = ?label_vec(labels), "no registered type for labels");
                Err(Error::UnmappedLabels { labels: label_vec(labels) })
            }
            [slot] => {
                let resolved = &self.descriptors[*slot];
                debug!(labels = ?label_vec(labels), resolved = resolved.type_name(), "labels resolved");
                Ok(resolved)
            }
            many => {
                let mut names: Vec<&TypeDescriptor> = many.iter().map(|&s| &self.descriptors[s]).collect();
                names.sort_by_key(|d| d.type_name());
                match self.ambiguity {
                    AmbiguityPolicy::Reject => Err(Error::AmbiguousLabels {
                        labels: label_vec(labels),
                        candidates: names.iter().map(|d| d.type_name().to_owned()).collect(),
                    }),
                    AmbiguityPolicy::LexicalOrder => {
                        let resolved = names[0];
                        debug!(
                            labels = ?label_vec(labels),
                            resolved = resolved.type_name(),
                            candidates = names.len(),
                            "ambiguous labels resolved by lexical order"
                        );
                        Ok(resolved)
                    }
                }
            }
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

fn label_vec<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels.iter().map(|l| l.as_ref().to_owned()).collect()
}

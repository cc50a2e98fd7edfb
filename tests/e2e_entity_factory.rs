//! End-to-end tests for entity construction from node records.
//!
//! Each test exercises: node labels -> registry resolution -> instantiation
//! against the shared test domain in `common`.

mod common;

use std::error::Error as _;

use neo4j_ogm::{
    ConstructionFailure, EntityFactory, Error, Node, NodeId, PropertyMap, TypeDescriptor,
    TypeRegistry, Value,
};
use pretty_assertions::assert_eq;

use common::canonical::{Broken, ClassWithPrivateConstructor, Dog};
use common::social::{Individual, Mentor};

// ============================================================================
// 1. Single label, default zero-arg constructor
// ============================================================================

#[test]
fn test_construct_with_default_zero_arg_constructor() {
    let factory = common::factory();
    let node = Node::new(NodeId(-1)).with_labels(["Individual"]);

    let instance = factory.new_object(&node).unwrap();
    assert!(instance.is::<Individual>());

    let sheila: Individual = instance.into_typed().unwrap();
    assert_eq!(sheila, Individual::default());
}

// ============================================================================
// 2. Several labels, only one of them mapped
// ============================================================================

#[test]
fn test_multiple_labels_handled_safely() {
    let factory = common::factory();
    let node = Node::new(NodeId(-1)).with_labels(["Female", "Individual", "Lass"]);

    let our_lass: Individual = factory.new_object_as(&node).unwrap();
    assert_eq!(our_lass.name, None);
}

// ============================================================================
// 3. Non-public zero-arg constructor
// ============================================================================

#[test]
fn test_construct_with_private_zero_arg_constructor() {
    let factory = common::factory();
    let node = Node::new(NodeId(163)).with_labels(["ClassWithPrivateConstructor"]);

    let instance: ClassWithPrivateConstructor = factory.new_object_as(&node).unwrap();
    assert_eq!(instance.origin(), "private constructor");
}

// ============================================================================
// 4. No labels at all
// ============================================================================

#[test]
fn test_fails_for_node_without_labels() {
    let factory = common::factory();
    let node = Node::new(NodeId(302)).with_labels(Vec::<String>::new());

    let err = factory.new_object(&node).unwrap_err();
    assert!(matches!(err, Error::NoLabels { id: NodeId(302) }));
    assert_eq!(
        err.to_string(),
        "Node 302 carries no labels; cannot resolve an entity type"
    );
}

// ============================================================================
// 5. Explicit type, empty registry
// ============================================================================

#[test]
fn test_explicit_type_bypasses_registry() {
    let factory = EntityFactory::new(TypeRegistry::empty().into());
    let descriptor = TypeDescriptor::of::<Individual>().default_constructor().build();

    let instance: Individual = factory.new_instance(&descriptor, &PropertyMap::new()).unwrap();
    assert_eq!(instance, Individual::default());
}

#[test]
fn test_explicit_type_ignores_labels_and_seed() {
    let factory = common::factory();
    let descriptor = factory.registry().get::<Dog>().unwrap().clone();

    let mut seed = PropertyMap::new();
    seed.insert("name".into(), Value::from("Rex"));
    assert!(factory.new_object_of(&descriptor, &seed).unwrap().is::<Dog>());
}

// ============================================================================
// 6. Subtype label wins over its base
// ============================================================================

#[test]
fn test_subtype_preferred_over_base_type() {
    let factory = common::factory();

    for labels in [
        vec!["Individual", "Mentor"],
        vec!["Mentor", "Individual"],
        vec!["Mentor"],
    ] {
        let node = Node::new(NodeId(7)).with_labels(labels.clone());
        let instance = factory.new_object(&node).unwrap();
        assert!(instance.is::<Mentor>(), "labels {labels:?} gave {}", instance.type_name());
    }
}

// ============================================================================
// 7. Unmapped labels
// ============================================================================

#[test]
fn test_unmapped_labels_fail() {
    let factory = common::factory();
    let node = Node::new(NodeId(1)).with_labels(["Female", "Lass"]);

    match factory.new_object(&node).unwrap_err() {
        Error::UnmappedLabels { labels } => assert_eq!(labels, vec!["Female", "Lass"]),
        other => panic!("expected UnmappedLabels, got {other:?}"),
    }
}

// ============================================================================
// 8. Construction failures
// ============================================================================

#[test]
fn test_abstract_type_cannot_be_constructed() {
    let factory = common::factory();
    let node = Node::new(NodeId(1)).with_labels(["Animal"]);

    let err = factory.new_object(&node).unwrap_err();
    match err {
        Error::Construction { type_name, reason: ConstructionFailure::NoConstructor } => {
            assert!(type_name.ends_with("canonical::Animal"));
        }
        other => panic!("expected Construction, got {other:?}"),
    }
}

#[test]
fn test_failing_constructor_preserves_cause() {
    let factory = common::factory();
    let node = Node::new(NodeId(1)).with_labels(["Broken"]);

    let err = factory.new_object(&node).unwrap_err();
    assert!(matches!(
        err,
        Error::Construction { reason: ConstructionFailure::Failed(_), .. }
    ));

    let cause = err.source().and_then(|reason| reason.source()).unwrap();
    assert_eq!(cause.to_string(), "Broken cannot be built without a connection");
    assert!(cause.downcast_ref::<common::canonical::NeedsConnection>().is_some());
}

#[test]
fn test_explicit_type_without_constructor_fails() {
    let factory = EntityFactory::new(TypeRegistry::empty().into());
    let descriptor = TypeDescriptor::of::<Broken>().build();

    let err = factory.new_object_of(&descriptor, &PropertyMap::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Construction { reason: ConstructionFailure::NoConstructor, .. }
    ));
}

// ============================================================================
// 9. Typed downcast mismatch
// ============================================================================

#[test]
fn test_typed_mismatch_reports_both_types() {
    let factory = common::factory();
    let node = Node::new(NodeId(1)).with_labels(["Dog"]);

    match factory.new_object_as::<Individual>(&node).unwrap_err() {
        Error::TypeError { expected, got } => {
            assert!(expected.ends_with("social::Individual"));
            assert!(got.ends_with("canonical::Dog"));
        }
        other => panic!("expected TypeError, got {other:?}"),
    }
}

// ============================================================================
// 10. Node properties do not influence construction
// ============================================================================

#[test]
fn test_properties_are_not_hydrated() {
    let factory = common::factory();
    let node = Node::new(NodeId(1))
        .with_labels(["Individual"])
        .with_property("name", "Sheila")
        .with_property("age", 32);

    let sheila: Individual = factory.new_object_as(&node).unwrap();
    assert_eq!(sheila, Individual { name: None, age: 0 });
}

//! Test domain shared by the end-to-end suites.
//!
//! Two packages, registered the way an application would at startup:
//! - `domain::social`: `Individual`, its subtype `Mentor`, and the `KNOWS`
//!   relationship entity
//! - `domain::canonical`: an `Animal` hierarchy, a type with a private
//!   constructor, and a type whose constructor always fails

#![allow(dead_code)]

use std::sync::Arc;

use neo4j_ogm::{AmbiguityPolicy, EntityFactory, RegistryConfig, TypeDescriptor, TypeRegistry};

pub const SOCIAL: &str = "domain::social";
pub const CANONICAL: &str = "domain::canonical";

pub mod social {
    use neo4j_ogm::TypeDescriptor;

    #[derive(Debug, Default, PartialEq)]
    pub struct Individual {
        pub name: Option<String>,
        pub age: i64,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Mentor {
        pub name: Option<String>,
        pub mentees: Vec<i64>,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Knows {
        pub since: Option<i64>,
    }

    pub fn descriptors() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::of::<Individual>()
                .package(super::SOCIAL)
                .default_constructor()
                .build(),
            TypeDescriptor::of::<Mentor>()
                .package(super::SOCIAL)
                .extends::<Individual>()
                .default_constructor()
                .build(),
            TypeDescriptor::of::<Knows>()
                .package(super::SOCIAL)
                .relationship("KNOWS")
                .default_constructor()
                .build(),
        ]
    }
}

pub mod canonical {
    use neo4j_ogm::TypeDescriptor;

    /// Never instantiated directly.
    pub struct Animal;

    #[derive(Debug, Default)]
    pub struct Mammal;

    #[derive(Debug, Default)]
    pub struct Dog;

    #[derive(Debug, Default)]
    pub struct Cat;

    /// Only this module can build one.
    #[derive(Debug)]
    pub struct ClassWithPrivateConstructor {
        origin: &'static str,
    }

    impl ClassWithPrivateConstructor {
        fn new() -> Self {
            Self { origin: "private constructor" }
        }

        pub fn origin(&self) -> &'static str {
            self.origin
        }
    }

    #[derive(Debug)]
    pub struct Broken;

    #[derive(Debug, thiserror::Error)]
    #[error("Broken cannot be built without a connection")]
    pub struct NeedsConnection;

    fn broken() -> Result<Broken, NeedsConnection> {
        Err(NeedsConnection)
    }

    pub fn descriptors() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::of::<Animal>().package(super::CANONICAL).build(),
            TypeDescriptor::of::<Mammal>()
                .package(super::CANONICAL)
                .extends::<Animal>()
                .default_constructor()
                .build(),
            TypeDescriptor::of::<Dog>()
                .package(super::CANONICAL)
                .extends::<Mammal>()
                .default_constructor()
                .build(),
            TypeDescriptor::of::<Cat>()
                .package(super::CANONICAL)
                .extends::<Mammal>()
                .label("Cat")
                .label("Feline")
                .default_constructor()
                .build(),
            TypeDescriptor::of::<ClassWithPrivateConstructor>()
                .package(super::CANONICAL)
                .constructor(ClassWithPrivateConstructor::new)
                .build(),
            TypeDescriptor::of::<Broken>()
                .package(super::CANONICAL)
                .try_constructor(broken)
                .build(),
        ]
    }
}

pub fn registry_with(policy: AmbiguityPolicy) -> Arc<TypeRegistry> {
    let registry = TypeRegistry::builder()
        .register_all(social::descriptors())
        .register_all(canonical::descriptors())
        .build(&RegistryConfig::new([SOCIAL, CANONICAL]).with_ambiguity(policy))
        .unwrap();
    Arc::new(registry)
}

pub fn factory() -> EntityFactory {
    EntityFactory::new(registry_with(AmbiguityPolicy::Reject))
}

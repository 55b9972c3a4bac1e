use std::sync::Arc;

use crate::{
    request::{Args, DependencyRequest},
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// A type the engine can build by itself from a declared dependency list.
///
/// The dependency list mirrors the constructor signature: `construct`
/// receives the resolved values in the same order and consumes each one via
/// [`Args::take`]. Declaring the list explicitly replaces the constructor
/// inspection the engine would otherwise need.
///
/// An unnamed request for a `Constructible` type resolves even without a
/// registered provider; the engine synthesizes a default provider from this
/// trait. Named requests never use it.
pub trait Constructible: Injectable + Sized {
    /// The ordered dependency requests of this type's constructor
    fn dependencies() -> Vec<DependencyRequest>;

    /// Build an instance from the resolved argument list
    fn construct(args: &mut Args) -> Result<Self, DynError>;
}

type ConstructFn = Arc<dyn Fn(&mut Args) -> Result<Instance, DynError> + Send + Sync>;

/// Descriptor of a constructible type, detached from its compile-time type.
///
/// Class providers return one of these to tell the engine which type to
/// build; unnamed requests for constructible types embed one as their
/// default provider. The descriptor knows the selected type's own dependency
/// list and how to turn a resolved argument list into an erased instance.
#[derive(Clone)]
pub struct ConstructibleClass {
    selected: TypeInfo,
    surfaced: TypeInfo,
    dependencies: fn() -> Vec<DependencyRequest>,
    construct: ConstructFn,
}

impl ConstructibleClass {
    /// Descriptor building `T` and surfacing the built value as `T`
    pub fn of<T: Constructible>() -> Self {
        ConstructibleClass {
            selected: TypeInfo::of::<T>(),
            surfaced: TypeInfo::of::<T>(),
            dependencies: T::dependencies,
            construct: Arc::new(|args| T::construct(args).map(Instance::new)),
        }
    }

    /// Descriptor building `S` but surfacing the built value as `T`,
    /// commonly an erased handle such as `Arc<dyn Trait>`.
    ///
    /// This is how a class provider registered for an abstract key hands the
    /// engine a concrete type's construction logic.
    pub fn of_as<S: Constructible, T: Injectable>(surface: fn(S) -> T) -> Self {
        ConstructibleClass {
            selected: TypeInfo::of::<S>(),
            surfaced: TypeInfo::of::<T>(),
            dependencies: S::dependencies,
            construct: Arc::new(move |args| S::construct(args).map(surface).map(Instance::new)),
        }
    }

    /// The type whose constructor runs
    pub fn selected(&self) -> TypeInfo {
        self.selected
    }

    /// The type of the value handed to dependents
    pub fn surfaced(&self) -> TypeInfo {
        self.surfaced
    }

    pub(crate) fn dependencies(&self) -> Vec<DependencyRequest> {
        (self.dependencies)()
    }

    pub(crate) fn construct(&self, args: &mut Args) -> Result<Instance, DynError> {
        (self.construct)(args)
    }
}

impl std::fmt::Debug for ConstructibleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructibleClass")
            .field("selected", &self.selected)
            .field("surfaced", &self.surfaced)
            .finish()
    }
}

use crate::{
    constructible::ConstructibleClass,
    key::ResolutionKey,
    request::{Args, DependencyRequest},
    types::{DynError, Injectable, Instance},
};

type InstanceRoutine = Box<dyn Fn(&mut Args) -> Result<Instance, DynError> + Send + Sync>;
type ClassRoutine = Box<dyn Fn(&mut Args) -> Result<ConstructibleClass, DynError> + Send + Sync>;

/// How a provider produces its value
pub(crate) enum Routine {
    /// Returns a finished value of the key's type
    Instance(InstanceRoutine),
    /// Selects a constructible type for the engine to build itself
    Class(ClassRoutine),
}

/// A registered description of how to obtain one value for a resolution key.
///
/// The construction routine runs with the provider's dependency requests
/// already resolved, in declaration order. The engine invokes it at most
/// once per injector; the produced value becomes the key's singleton.
pub struct Provider {
    key: ResolutionKey,
    dependencies: Vec<DependencyRequest>,
    routine: Routine,
}

impl Provider {
    /// An instance provider for the unnamed key of `T`
    pub fn instance<T, F>(dependencies: Vec<DependencyRequest>, produce: F) -> Provider
    where
        T: Injectable,
        F: Fn(&mut Args) -> Result<T, DynError> + Send + Sync + 'static,
    {
        Provider {
            key: ResolutionKey::of::<T>(),
            dependencies,
            routine: Routine::Instance(Box::new(move |args| produce(args).map(Instance::new))),
        }
    }

    /// An instance provider for a named key of `T`
    pub fn named_instance<T, F>(
        name: &'static str,
        dependencies: Vec<DependencyRequest>,
        produce: F,
    ) -> Provider
    where
        T: Injectable,
        F: Fn(&mut Args) -> Result<T, DynError> + Send + Sync + 'static,
    {
        Provider {
            key: ResolutionKey::named::<T>(name),
            dependencies,
            routine: Routine::Instance(Box::new(move |args| produce(args).map(Instance::new))),
        }
    }

    /// A class provider for the unnamed key of `T`.
    ///
    /// The routine does not produce a value; it selects a
    /// [`ConstructibleClass`] whose surfaced type must be `T`. The engine
    /// then builds the selected type from its own dependency list and caches
    /// the result under `T`'s key.
    pub fn class<T, F>(dependencies: Vec<DependencyRequest>, select: F) -> Provider
    where
        T: Injectable,
        F: Fn(&mut Args) -> Result<ConstructibleClass, DynError> + Send + Sync + 'static,
    {
        Provider {
            key: ResolutionKey::of::<T>(),
            dependencies,
            routine: Routine::Class(Box::new(select)),
        }
    }

    /// A class provider for a named key of `T`
    pub fn named_class<T, F>(
        name: &'static str,
        dependencies: Vec<DependencyRequest>,
        select: F,
    ) -> Provider
    where
        T: Injectable,
        F: Fn(&mut Args) -> Result<ConstructibleClass, DynError> + Send + Sync + 'static,
    {
        Provider {
            key: ResolutionKey::named::<T>(name),
            dependencies,
            routine: Routine::Class(Box::new(select)),
        }
    }

    /// The resolution key this provider is registered under
    pub fn key(&self) -> ResolutionKey {
        self.key
    }

    pub(crate) fn dependencies(&self) -> &[DependencyRequest] {
        &self.dependencies
    }

    pub(crate) fn routine(&self) -> &Routine {
        &self.routine
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.routine {
            Routine::Instance(_) => "instance",
            Routine::Class(_) => "class",
        };
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("kind", &kind)
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

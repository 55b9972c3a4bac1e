use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    constructible::{Constructible, ConstructibleClass},
    errors::{CompositionErrors, DependencyChain, ResolveError},
    key::ResolutionKey,
    module::Module,
    provider::{Provider, Routine},
    registry::ProviderRegistry,
    request::{Args, DependencyRequest},
    types::{Injectable, Instance},
};

type Cache = HashMap<ResolutionKey, Instance>;

/// The resolution engine: a provider registry plus the singleton cache.
///
/// One injector is created per application configuration and shared for its
/// lifetime. The cache is append-only: once a key has been constructed,
/// every later resolution returns the identical instance, and the key's
/// construction routine never runs again.
///
/// Construction routines receive their dependencies through [`Args`]; they
/// must not call back into the injector.
pub struct Injector {
    registry: ProviderRegistry,
    cache: Mutex<Cache>,
}

impl Injector {
    /// Flatten the modules into a provider registry.
    ///
    /// Colliding registrations are reported here, so a misconfigured
    /// application fails at start-up rather than at first use of the
    /// faulty key. Nothing is constructed yet.
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, CompositionErrors> {
        let modules: Vec<Module> = modules.into_iter().collect();
        let registry = ProviderRegistry::from_modules(&modules)?;

        tracing::debug!(
            "injector ready with {} providers from {} top-level modules",
            registry.len(),
            modules.len()
        );
        Ok(Injector {
            registry,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Resolve the unnamed key of a constructible type.
    ///
    /// Falls back to the type's own constructor if no provider is
    /// registered for the key.
    pub fn require<T: Constructible>(&self) -> Result<Arc<T>, ResolveError> {
        let instance = self.resolve(&DependencyRequest::constructible::<T>())?;
        Self::downcast(ResolutionKey::of::<T>(), &instance)
    }

    /// Resolve the unnamed key of a type that only an explicit provider can
    /// supply.
    pub fn require_provided<T: Injectable>(&self) -> Result<Arc<T>, ResolveError> {
        let instance = self.resolve(&DependencyRequest::provided::<T>())?;
        Self::downcast(ResolutionKey::of::<T>(), &instance)
    }

    /// Resolve a named key. Named keys never fall back to a default
    /// provider.
    pub fn require_named<T: Injectable>(&self, name: &'static str) -> Result<Arc<T>, ResolveError> {
        let instance = self.resolve(&DependencyRequest::named::<T>(name))?;
        Self::downcast(ResolutionKey::named::<T>(name), &instance)
    }

    /// Resolve a request to a type-erased instance.
    ///
    /// This is the engine's sole entry point; the typed `require` methods
    /// and every recursive dependency resolution go through it.
    pub fn resolve(&self, request: &DependencyRequest) -> Result<Instance, ResolveError> {
        // The guard is held for the whole chain: the check-construct-store
        // sequence must be atomic per key, and recursive resolution reuses
        // the guard instead of re-locking. A poisoned cache is still valid,
        // a panicked construction leaves it merely incomplete.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut chain = Vec::new();
        self.resolve_in_chain(&mut cache, request, &mut chain)
    }

    /// One step of the recursive resolution. `chain` holds the keys
    /// currently being resolved higher up the same call chain.
    fn resolve_in_chain(
        &self,
        cache: &mut Cache,
        request: &DependencyRequest,
        chain: &mut Vec<ResolutionKey>,
    ) -> Result<Instance, ResolveError> {
        let key = request.key();

        if let Some(cached) = cache.get(&key) {
            return Ok(cached.clone());
        }

        // Cycle guard, must trigger before any recursion on this key
        if chain.contains(&key) {
            return Err(ResolveError::CircularDependency {
                key,
                chain: DependencyChain::through(chain, key),
            });
        }

        let instance = match self.registry.get(&key) {
            Some(provider) => self.invoke_provider(cache, provider, key, chain)?,
            None => match request.default_class() {
                // Only unnamed keys may fall back to the type's own constructor
                Some(class) if !key.is_named() => {
                    chain.push(key);
                    let instance = self.construct_class(cache, class, key, chain)?;
                    chain.pop();
                    instance
                }
                _ => {
                    tracing::error!("could not find or create a provider for {}", key);
                    return Err(ResolveError::NoProviderFound {
                        key,
                        chain: DependencyChain::through(chain, key),
                    });
                }
            },
        };

        cache.insert(key, instance.clone());
        tracing::debug!("constructed instance of {}", key);
        Ok(instance)
    }

    fn invoke_provider(
        &self,
        cache: &mut Cache,
        provider: &Provider,
        key: ResolutionKey,
        chain: &mut Vec<ResolutionKey>,
    ) -> Result<Instance, ResolveError> {
        chain.push(key);
        let mut args = self.resolve_all(cache, provider.dependencies(), chain)?;

        let instance = match provider.routine() {
            Routine::Instance(produce) => {
                produce(&mut args).map_err(|error| ResolveError::Construction {
                    key,
                    error: Arc::new(error),
                })?
            }
            Routine::Class(select) => {
                let class = select(&mut args).map_err(|error| ResolveError::Construction {
                    key,
                    error: Arc::new(error),
                })?;
                if class.surfaced().type_id != key.type_info.type_id {
                    return Err(ResolveError::ClassMismatch {
                        key,
                        selected: class.surfaced().type_name,
                    });
                }
                // The selected type is built from its own dependency list;
                // the result is cached under the requested key, not the
                // selected type's own key.
                self.construct_class(cache, &class, key, chain)?
            }
        };

        chain.pop();
        Ok(instance)
    }

    /// Build a constructible type from its declared dependency list. Used
    /// both for default providers and for class-provider indirection.
    fn construct_class(
        &self,
        cache: &mut Cache,
        class: &ConstructibleClass,
        key: ResolutionKey,
        chain: &mut Vec<ResolutionKey>,
    ) -> Result<Instance, ResolveError> {
        let mut args = self.resolve_all(cache, &class.dependencies(), chain)?;
        class
            .construct(&mut args)
            .map_err(|error| ResolveError::Construction {
                key,
                error: Arc::new(error),
            })
    }

    /// Resolve a dependency list strictly in declaration order. The first
    /// failure aborts the whole resolution; there are no partial results.
    fn resolve_all(
        &self,
        cache: &mut Cache,
        requests: &[DependencyRequest],
        chain: &mut Vec<ResolutionKey>,
    ) -> Result<Args, ResolveError> {
        let mut values = Vec::with_capacity(requests.len());
        for request in requests {
            values.push(self.resolve_in_chain(cache, request, chain)?);
        }
        Ok(Args::new(values))
    }

    fn downcast<T: Injectable>(
        key: ResolutionKey,
        instance: &Instance,
    ) -> Result<Arc<T>, ResolveError> {
        instance
            .downcast()
            .map_err(|actual| ResolveError::DowncastFailed { key, actual })
    }
}

impl Default for Injector {
    fn default() -> Self {
        Injector {
            registry: ProviderRegistry::default(),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_struct("Injector");
        for key in self.registry.keys() {
            let state = if cache.contains_key(key) {
                "cached"
            } else {
                "pending"
            };
            map.field(key.type_info.type_name, &state);
        }
        map.finish()
    }
}

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{errors::ModuleError, key::ResolutionKey, provider::Provider};

static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a module, shared by every clone of its handle.
///
/// Registry composition tracks visited modules by this id, which keeps
/// installation idempotent across diamond-shaped install graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(u64);

impl ModuleId {
    fn next() -> Self {
        ModuleId(NEXT_MODULE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A named bundle of provider registrations.
///
/// Modules compose by installation: installing a child re-exposes all of the
/// child's registrations (transitively) without copying or re-registering
/// its providers. A module handle is cheap to clone; clones share identity.
#[derive(Clone)]
pub struct Module {
    inner: Arc<ModuleInner>,
}

struct ModuleInner {
    id: ModuleId,
    name: &'static str,
    providers: Vec<Arc<Provider>>,
    installed: Vec<Module>,
}

impl Module {
    /// Start declaring a module
    pub fn builder(name: &'static str) -> ModuleBuilder {
        ModuleBuilder {
            name,
            providers: Vec::new(),
            declared: HashSet::new(),
            installed: Vec::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.inner.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub(crate) fn providers(&self) -> &[Arc<Provider>] {
        &self.inner.providers
    }

    pub(crate) fn installed(&self) -> &[Module] {
        &self.inner.installed
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.inner.name)
            .field("providers", &self.inner.providers.len())
            .field(
                "installed",
                &self
                    .inner
                    .installed
                    .iter()
                    .map(Module::name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder declaring a module's own providers and installed children
pub struct ModuleBuilder {
    name: &'static str,
    providers: Vec<Arc<Provider>>,
    declared: HashSet<ResolutionKey>,
    installed: Vec<Module>,
}

impl ModuleBuilder {
    /// Declare a provider.
    ///
    /// A module may declare at most one provider per resolution key; a
    /// second declaration for the same key is refused here, before any
    /// injector exists.
    pub fn provide(mut self, provider: Provider) -> Result<Self, ModuleError> {
        let key = provider.key();
        if !self.declared.insert(key) {
            return Err(ModuleError::DuplicateProvider {
                module: self.name,
                key,
            });
        }

        tracing::debug!("module '{}' provides {}", self.name, key);
        self.providers.push(Arc::new(provider));
        Ok(self)
    }

    /// Install a child module, re-exposing its registrations.
    ///
    /// Installation records the handle only; nothing is constructed and no
    /// providers are copied. Installing the same module twice, directly or
    /// through different paths, is harmless.
    pub fn install(mut self, module: &Module) -> Self {
        self.installed.push(module.clone());
        self
    }

    pub fn build(self) -> Module {
        Module {
            inner: Arc::new(ModuleInner {
                id: ModuleId::next(),
                name: self.name,
                providers: self.providers,
                installed: self.installed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Service;

    #[test]
    fn colliding_declarations_are_refused_at_provide_time() {
        let result = Module::builder("doubled")
            .provide(Provider::instance::<Service, _>(vec![], |_| Ok(Service)))
            .unwrap()
            .provide(Provider::instance::<Service, _>(vec![], |_| Ok(Service)));

        match result {
            Err(ModuleError::DuplicateProvider { module, key }) => {
                assert_eq!(module, "doubled");
                assert_eq!(key, ResolutionKey::of::<Service>());
            }
            Ok(_) => panic!("expected a duplicate provider error"),
        }
    }

    #[test]
    fn named_and_unnamed_declarations_do_not_collide() {
        let module = Module::builder("named")
            .provide(Provider::instance::<Service, _>(vec![], |_| Ok(Service)))
            .unwrap()
            .provide(Provider::named_instance::<Service, _>("a", vec![], |_| {
                Ok(Service)
            }))
            .unwrap()
            .provide(Provider::named_instance::<Service, _>("b", vec![], |_| {
                Ok(Service)
            }))
            .unwrap()
            .build();

        assert_eq!(module.providers().len(), 3);
    }

    #[test]
    fn clones_share_identity() {
        let module = Module::builder("original").build();
        let clone = module.clone();
        assert_eq!(module.id(), clone.id());
        assert_ne!(module.id(), Module::builder("other").build().id());
    }
}

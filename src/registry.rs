use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    errors::{CompositionError, CompositionErrors},
    key::ResolutionKey,
    module::{Module, ModuleId},
    provider::Provider,
};

/// The flattened key-to-provider mapping built from a set of top-level
/// modules and everything they transitively install.
#[derive(Debug, Default)]
pub(crate) struct ProviderRegistry {
    providers: HashMap<ResolutionKey, Registration>,
}

#[derive(Debug)]
struct Registration {
    provider: Arc<Provider>,
    module: &'static str,
}

impl ProviderRegistry {
    /// Flatten the module graph in declaration order.
    ///
    /// Each distinct module is visited at most once, so diamond-shaped
    /// install graphs never re-register a provider. Every genuine key
    /// collision is collected; nothing is silently shadowed.
    pub fn from_modules(modules: &[Module]) -> Result<Self, CompositionErrors> {
        tracing::debug!("composing registry from {} top-level modules", modules.len());

        let mut registry = ProviderRegistry {
            providers: Default::default(),
        };
        let mut visited = HashSet::new();
        let mut errors = Vec::new();

        for module in modules {
            registry.add_module(module, &mut visited, &mut errors);
        }

        if !errors.is_empty() {
            return Err(CompositionErrors { errors });
        }
        Ok(registry)
    }

    fn add_module(
        &mut self,
        module: &Module,
        visited: &mut HashSet<ModuleId>,
        errors: &mut Vec<CompositionError>,
    ) {
        if !visited.insert(module.id()) {
            return;
        }
        tracing::debug!(
            "installing module '{}' with {} providers",
            module.name(),
            module.providers().len()
        );

        for provider in module.providers() {
            let key = provider.key();
            match self.providers.get(&key) {
                // The identical provider reached over another install path
                Some(existing) if Arc::ptr_eq(&existing.provider, provider) => {}
                Some(existing) => errors.push(CompositionError::DuplicateProvider {
                    key,
                    first: existing.module,
                    second: module.name(),
                }),
                None => {
                    self.providers.insert(
                        key,
                        Registration {
                            provider: provider.clone(),
                            module: module.name(),
                        },
                    );
                }
            }
        }

        for child in module.installed() {
            self.add_module(child, visited, errors);
        }
    }

    pub fn get(&self, key: &ResolutionKey) -> Option<&Arc<Provider>> {
        self.providers.get(key).map(|registration| &registration.provider)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResolutionKey> {
        self.providers.keys()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Left;
    struct Right;

    fn leaf_module() -> Module {
        Module::builder("leaf")
            .provide(Provider::instance::<Left, _>(vec![], |_| Ok(Left)))
            .expect("fresh builder")
            .build()
    }

    #[test]
    fn diamond_installs_register_once() {
        let leaf = leaf_module();
        let left = Module::builder("left").install(&leaf).build();
        let right = Module::builder("right").install(&leaf).build();
        let top = Module::builder("top").install(&left).install(&right).build();

        let registry = ProviderRegistry::from_modules(&[top]).expect("no conflicts");
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&ResolutionKey::of::<Left>()).is_some());
    }

    #[test]
    fn distinct_providers_for_one_key_are_a_conflict() {
        let first = leaf_module();
        let second = Module::builder("other-leaf")
            .provide(Provider::instance::<Left, _>(vec![], |_| Ok(Left)))
            .expect("fresh builder")
            .build();

        let errors = ProviderRegistry::from_modules(&[first, second]).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        let CompositionError::DuplicateProvider { key, first, second } = &errors.errors[0];
        assert_eq!(*key, ResolutionKey::of::<Left>());
        assert_eq!(*first, "leaf");
        assert_eq!(*second, "other-leaf");
    }

    #[test]
    fn all_conflicts_are_reported_together() {
        let build = |name| {
            Module::builder(name)
                .provide(Provider::instance::<Left, _>(vec![], |_| Ok(Left)))
                .expect("fresh builder")
                .provide(Provider::instance::<Right, _>(vec![], |_| Ok(Right)))
                .expect("distinct key")
                .build()
        };

        let errors = ProviderRegistry::from_modules(&[build("a"), build("b")]).unwrap_err();
        assert_eq!(errors.errors.len(), 2);
        assert!(errors.to_string().contains("one or more errors"));
    }

    #[test]
    fn traversal_reaches_transitive_installs() {
        let leaf = leaf_module();
        let middle = Module::builder("middle").install(&leaf).build();
        let top = Module::builder("top").install(&middle).build();

        let registry = ProviderRegistry::from_modules(&[top]).expect("no conflicts");
        assert!(registry.get(&ResolutionKey::of::<Left>()).is_some());
    }
}

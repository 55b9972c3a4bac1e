use std::sync::Arc;

use thiserror::Error;

use crate::{key::ResolutionKey, types::DynError};

/// The path of keys from the originally requested key down to the one that
/// failed, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyChain(pub Vec<ResolutionKey>);

impl DependencyChain {
    /// Snapshot of the in-progress chain, closed with the failing key.
    pub(crate) fn through(chain: &[ResolutionKey], key: ResolutionKey) -> Self {
        let mut keys = chain.to_vec();
        keys.push(key);
        DependencyChain(keys)
    }
}

impl std::fmt::Display for DependencyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (position, key) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

/// Errors while declaring providers in a module
#[derive(Error, Debug, Clone)]
pub enum ModuleError {
    /// The module already declares a provider for this key
    #[error("module '{module}' declares colliding providers for {key}")]
    DuplicateProvider {
        module: &'static str,
        key: ResolutionKey,
    },
}

/// A single conflict found while flattening modules into a registry
#[derive(Error, Debug, Clone)]
pub enum CompositionError {
    /// Two distinct providers are registered for the same key
    #[error("duplicate provider for {key}: declared in module '{first}' and module '{second}'")]
    DuplicateProvider {
        key: ResolutionKey,
        first: &'static str,
        second: &'static str,
    },
}

/// Everything wrong with a set of modules, reported together so a
/// misconfigured application fails once at start-up with the full picture.
#[derive(Debug, Clone)]
pub struct CompositionErrors {
    pub errors: Vec<CompositionError>,
}
impl std::error::Error for CompositionErrors {}
impl std::fmt::Display for CompositionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The module composition had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

/// Errors when resolving a key
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The key has no provider and is not an eligible unnamed constructible
    /// type. Named keys never fall back to a default provider.
    #[error("could not find or create a provider for {key} ({chain})")]
    NoProviderFound {
        key: ResolutionKey,
        chain: DependencyChain,
    },

    /// The key was reached again while still being resolved higher up the
    /// same chain
    #[error("circular dependency detected on {key} ({chain})")]
    CircularDependency {
        key: ResolutionKey,
        chain: DependencyChain,
    },

    /// The provider's own construction routine failed
    #[error("provider for {key} failed: {error}")]
    Construction {
        key: ResolutionKey,
        error: Arc<DynError>,
    },

    /// A class provider selected a constructible type that does not surface
    /// the requested key's type
    #[error("class provider for {key} selected '{selected}', which does not surface the requested type")]
    ClassMismatch {
        key: ResolutionKey,
        selected: &'static str,
    },

    #[error("failed to downcast {key}: resolved instance is '{actual}'")]
    DowncastFailed {
        key: ResolutionKey,
        actual: &'static str,
    },
}

/// Errors while consuming a resolved argument list
#[derive(Error, Debug, Clone)]
pub enum ArgumentError {
    /// More values were taken than dependency requests were declared
    #[error("argument list exhausted: no resolved value left for '{requested}'")]
    Exhausted { requested: &'static str },

    /// The next value does not match the declared request order
    #[error("argument mismatch: requested '{requested}' but the next resolved value is '{actual}'")]
    Mismatch {
        requested: &'static str,
        actual: &'static str,
    },
}

use std::{any::type_name, sync::Arc};

use crate::{
    constructible::{Constructible, ConstructibleClass},
    errors::ArgumentError,
    key::ResolutionKey,
    types::{Injectable, Instance},
};

/// A single (type, optional name) dependency of a provider or of a
/// constructible type's constructor.
///
/// When the requested type can construct itself, the request carries the
/// type's class descriptor. That descriptor is the engine's default
/// provider: if no explicit provider is registered for the key, the engine
/// builds the type from its own declared dependency list. Named requests
/// never fall back, so they carry no descriptor.
#[derive(Clone)]
pub struct DependencyRequest {
    key: ResolutionKey,
    default: Option<ConstructibleClass>,
}

impl DependencyRequest {
    /// An unnamed request for a constructible type, eligible for default
    /// construction when no provider is registered.
    pub fn constructible<T: Constructible>() -> Self {
        DependencyRequest {
            key: ResolutionKey::of::<T>(),
            default: Some(ConstructibleClass::of::<T>()),
        }
    }

    /// An unnamed request satisfiable only by an explicit provider
    pub fn provided<T: Injectable>() -> Self {
        DependencyRequest {
            key: ResolutionKey::of::<T>(),
            default: None,
        }
    }

    /// A named request. Named keys must always be satisfied by an explicit
    /// provider registered under the same name.
    pub fn named<T: Injectable>(name: &'static str) -> Self {
        DependencyRequest {
            key: ResolutionKey::named::<T>(name),
            default: None,
        }
    }

    pub fn key(&self) -> ResolutionKey {
        self.key
    }

    pub(crate) fn default_class(&self) -> Option<&ConstructibleClass> {
        self.default.as_ref()
    }
}

impl std::fmt::Debug for DependencyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyRequest")
            .field("key", &self.key)
            .field("constructible", &self.default.is_some())
            .finish()
    }
}

/// The resolved argument list for one construction routine.
///
/// Values are handed out in the order the dependency requests were declared;
/// a routine takes each of its arguments exactly once, in that order.
pub struct Args {
    values: std::vec::IntoIter<Instance>,
}

impl Args {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Args {
            values: values.into_iter(),
        }
    }

    /// Take the next resolved value as `T`
    pub fn take<T: Injectable>(&mut self) -> Result<Arc<T>, ArgumentError> {
        let next = self.values.next().ok_or(ArgumentError::Exhausted {
            requested: type_name::<T>(),
        })?;
        next.downcast().map_err(|actual| ArgumentError::Mismatch {
            requested: type_name::<T>(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_hands_out_values_in_declaration_order() {
        let mut args = Args::new(vec![Instance::new(1_u32), Instance::new("two")]);
        assert_eq!(*args.take::<u32>().unwrap(), 1);
        assert_eq!(*args.take::<&str>().unwrap(), "two");
    }

    #[test]
    fn take_past_the_end_is_an_error() {
        let mut args = Args::new(vec![]);
        let error = args.take::<u32>().unwrap_err();
        assert!(matches!(error, ArgumentError::Exhausted { .. }));
    }

    #[test]
    fn take_out_of_order_is_an_error() {
        let mut args = Args::new(vec![Instance::new(1_u32)]);
        let error = args.take::<String>().unwrap_err();
        assert!(matches!(error, ArgumentError::Mismatch { .. }));
    }
}

use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Errors coming out of construction routines must be shareable across threads
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The injector may be shared across threads,
/// so anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// A constructed value held by the cache and handed out to dependents
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    value: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub fn new<T: Injectable>(value: T) -> Self {
        Instance {
            info: TypeInfo::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Recover the typed value. On mismatch, returns the actual type name.
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.value.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info).finish()
    }
}

use crate::types::{Injectable, TypeInfo};

/// The (type, optional name) identity used for every registry lookup and
/// cache entry.
///
/// Two keys are equal iff both the type and the name match exactly. A key
/// without a name is the distinguished "unnamed" key of its type; it never
/// matches any named registration of the same type, and vice versa. There is
/// no supertype or subtype equivalence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub type_info: TypeInfo,
    pub name: Option<&'static str>,
}

impl ResolutionKey {
    /// The unnamed key for `T`
    pub fn of<T: Injectable>() -> Self {
        ResolutionKey {
            type_info: TypeInfo::of::<T>(),
            name: None,
        }
    }

    /// A named key for `T`
    pub fn named<T: Injectable>(name: &'static str) -> Self {
        ResolutionKey {
            type_info: TypeInfo::of::<T>(),
            name: Some(name),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

impl std::fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name {
            Some(name) => write!(f, "{} (named \"{}\")", self.type_info, name),
            None => write!(f, "{}", self.type_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Example;
    struct Other;

    #[test]
    fn keys_match_on_type_and_name() {
        assert_eq!(ResolutionKey::of::<Example>(), ResolutionKey::of::<Example>());
        assert_eq!(
            ResolutionKey::named::<Example>("a"),
            ResolutionKey::named::<Example>("a")
        );
    }

    #[test]
    fn name_distinguishes_keys_of_the_same_type() {
        let unnamed = ResolutionKey::of::<Example>();
        let a = ResolutionKey::named::<Example>("a");
        let b = ResolutionKey::named::<Example>("b");
        assert_ne!(unnamed, a);
        assert_ne!(a, b);
    }

    #[test]
    fn type_distinguishes_keys_of_the_same_name() {
        assert_ne!(
            ResolutionKey::named::<Example>("a"),
            ResolutionKey::named::<Other>("a")
        );
    }

    #[test]
    fn display_includes_the_name() {
        let key = ResolutionKey::named::<Example>("replica");
        assert!(key.to_string().contains("Example"));
        assert!(key.to_string().contains("named \"replica\""));
        assert!(!ResolutionKey::of::<Example>().to_string().contains("named"));
    }
}

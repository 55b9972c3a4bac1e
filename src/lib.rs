//! Provide is a dependency-injection container keyed on (type, optional
//! name). Modules declare providers, an [`Injector`] flattens one or more
//! modules into a registry, and every resolved key becomes a singleton:
//! its construction routine runs at most once per injector, no matter how
//! many dependents request it.
//!
//! Lookups are exact-match. A provider registered for one type is never
//! selected for any other type, and a named registration never satisfies an
//! unnamed request. Unnamed requests for [`Constructible`] types fall back
//! to the type's own declared constructor when no provider is registered;
//! named requests never fall back.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use provide::{Args, Constructible, DependencyRequest, DynError, Injector, Module, Provider};
//!
//! struct Greeting(String);
//!
//! struct Greeter {
//!     greeting: Arc<Greeting>,
//! }
//!
//! impl Constructible for Greeter {
//!     fn dependencies() -> Vec<DependencyRequest> {
//!         vec![DependencyRequest::provided::<Greeting>()]
//!     }
//!
//!     fn construct(args: &mut Args) -> Result<Self, DynError> {
//!         Ok(Greeter {
//!             greeting: args.take()?,
//!         })
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let greetings = Module::builder("greetings")
//!         .provide(Provider::instance::<Greeting, _>(vec![], |_| {
//!             Ok(Greeting("hello".to_string()))
//!         }))?
//!         .build();
//!
//!     let injector = Injector::new([greetings])?;
//!     let greeter = injector.require::<Greeter>()?;
//!     assert_eq!(greeter.greeting.0, "hello");
//!
//!     // Singleton contract: the same instance every time
//!     assert!(Arc::ptr_eq(&greeter, &injector.require::<Greeter>()?));
//!     Ok(())
//! }
//! ```
//!
//! Provide consists of the following components:
//!
//! 1. Module - a named bundle of provider registrations, composable by
//!    installing other modules
//! 2. Provider - a description of how to obtain one value for a key, either
//!    directly (instance provider) or by selecting a constructible type for
//!    the engine to build (class provider)
//! 3. Constructible - the statically declared constructor surface that lets
//!    the engine build a type from its own dependency list
//! 4. Injector - the resolution engine holding the flattened registry and
//!    the singleton cache

pub mod constructible;
pub mod errors;
pub mod injector;
pub mod key;
pub mod module;
pub mod provider;
mod registry;
pub mod request;
pub mod types;

pub use constructible::{Constructible, ConstructibleClass};
pub use errors::{
    ArgumentError, CompositionError, CompositionErrors, DependencyChain, ModuleError, ResolveError,
};
pub use injector::Injector;
pub use key::ResolutionKey;
pub use module::{Module, ModuleBuilder, ModuleId};
pub use provider::Provider;
pub use request::{Args, DependencyRequest};
pub use types::{DynError, Injectable, Instance, TypeInfo};

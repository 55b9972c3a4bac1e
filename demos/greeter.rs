//! A small wired application: a config value, a constructible service, and
//! a trait implementation selected by a class provider.
//!
//! Run with `cargo run --example greeter`; set `RUST_LOG=provide=debug` to
//! watch the engine work.

use std::sync::Arc;

use provide::{
    Args, Constructible, ConstructibleClass, DependencyRequest, DynError, Injector, Module,
    Provider,
};

struct AppConfig {
    language: &'static str,
    audience: String,
}

trait Greeter: Send + Sync {
    fn greet(&self, audience: &str) -> String;
}

type GreeterHandle = Arc<dyn Greeter + Send + Sync>;

struct English;
impl Greeter for English {
    fn greet(&self, audience: &str) -> String {
        format!("Hello, {audience}!")
    }
}
impl Constructible for English {
    fn dependencies() -> Vec<DependencyRequest> {
        vec![]
    }

    fn construct(_args: &mut Args) -> Result<Self, DynError> {
        Ok(English)
    }
}

struct Spanish;
impl Greeter for Spanish {
    fn greet(&self, audience: &str) -> String {
        format!("Hola, {audience}!")
    }
}
impl Constructible for Spanish {
    fn dependencies() -> Vec<DependencyRequest> {
        vec![]
    }

    fn construct(_args: &mut Args) -> Result<Self, DynError> {
        Ok(Spanish)
    }
}

/// The application service, built by the engine from its declared
/// dependency list. No provider is registered for it.
struct GreetingService {
    config: Arc<AppConfig>,
    greeter: Arc<GreeterHandle>,
}

impl GreetingService {
    fn run(&self) -> String {
        self.greeter.greet(&self.config.audience)
    }
}

impl Constructible for GreetingService {
    fn dependencies() -> Vec<DependencyRequest> {
        vec![
            DependencyRequest::provided::<AppConfig>(),
            DependencyRequest::provided::<GreeterHandle>(),
        ]
    }

    fn construct(args: &mut Args) -> Result<Self, DynError> {
        Ok(GreetingService {
            config: args.take()?,
            greeter: args.take()?,
        })
    }
}

fn app_module() -> Result<Module, Box<dyn std::error::Error>> {
    let module = Module::builder("app")
        .provide(Provider::instance::<AppConfig, _>(vec![], |_| {
            Ok(AppConfig {
                language: "es",
                audience: "world".to_string(),
            })
        }))?
        .provide(Provider::class::<GreeterHandle, _>(
            vec![DependencyRequest::provided::<AppConfig>()],
            |args| {
                let config = args.take::<AppConfig>()?;
                match config.language {
                    "en" => Ok(ConstructibleClass::of_as::<English, GreeterHandle>(|g| {
                        Arc::new(g)
                    })),
                    "es" => Ok(ConstructibleClass::of_as::<Spanish, GreeterHandle>(|g| {
                        Arc::new(g)
                    })),
                    other => Err(format!("no greeter for language '{other}'").into()),
                }
            },
        ))?
        .build();

    Ok(module)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let injector = Injector::new([app_module()?])?;
    let service = injector.require::<GreetingService>()?;

    println!("{}", service.run());
    Ok(())
}

//! Configuration sources and settings
//!
//! - `ConfigSource`: the contract a host pipeline consumes
//! - `ConfigSourceRegistry`: ordered sources, with plugin placement
//! - `KeychainSettings`: service, fallback instance, backend and program

mod traits;
mod settings;
mod registry;

pub use traits::{ConfigSource, ConfigError, ConfigResult};
pub use settings::{
    KeychainSettings, DEFAULT_SERVICE, DEFAULT_BACKEND, ENV_SERVICE, ENV_INSTANCE, ENV_BACKEND,
    ENV_PROGRAM,
};
pub use registry::{ConfigSourceRegistry, ConfigSourcesHookResult, SourcePriority};

//! Core types shared by the store accessor, resolver and host surface

mod config;
mod options;

pub use config::{NormalizedConfig, KeychainConfig, DEFAULT_INSTANCE_KEY};
pub use options::{ResolveConfigOptions, ConfigLoadResult};

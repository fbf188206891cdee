//! Ordered list of config sources held by the host pipeline

use std::sync::Arc;

use super::traits::ConfigSource;
use crate::types::{ConfigLoadResult, ResolveConfigOptions};

/// Where a plugin's sources go relative to those already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePriority {
    /// Ahead of the existing sources
    Before,
    /// Behind the existing sources
    #[default]
    After,
}

/// What a plugin hands to the host when asked for config sources
pub struct ConfigSourcesHookResult {
    pub sources: Vec<Arc<dyn ConfigSource>>,
    /// `None` leaves placement to the host (after existing sources)
    pub priority: Option<SourcePriority>,
}

impl ConfigSourcesHookResult {
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>) -> Self {
        Self { sources, priority: None }
    }

    pub fn with_priority(mut self, priority: SourcePriority) -> Self {
        self.priority = Some(priority);
        self
    }
}

impl std::fmt::Debug for ConfigSourcesHookResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("ConfigSourcesHookResult")
            .field("sources", &names)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Ordered config sources
///
/// The registry only keeps order and asks each source to load. Combining
/// the results belongs to the host.
#[derive(Default, Clone)]
pub struct ConfigSourceRegistry {
    sources: Vec<Arc<dyn ConfigSource>>,
}

impl ConfigSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single source
    pub fn push(&mut self, source: Arc<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Add a plugin's sources, keeping their relative order
    pub fn register(&mut self, result: ConfigSourcesHookResult) {
        match result.priority.unwrap_or_default() {
            SourcePriority::Before => {
                self.sources.splice(0..0, result.sources);
            }
            SourcePriority::After => self.sources.extend(result.sources),
        }
    }

    pub fn sources(&self) -> &[Arc<dyn ConfigSource>] {
        &self.sources
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&Arc<dyn ConfigSource>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load every source in order, keeping the ones that produced something
    pub fn load_all(&self, options: &ResolveConfigOptions) -> Vec<(String, ConfigLoadResult)> {
        self.sources
            .iter()
            .filter_map(|source| source.load(options).map(|result| (source.name().to_string(), result)))
            .collect()
    }
}

impl std::fmt::Debug for ConfigSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSourceRegistry")
            .field("sources", &self.names())
            .finish()
    }
}

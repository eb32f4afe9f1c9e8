//! Backend registry.
//!
//! The [`BackendRegistry`] maps backend identifiers (and their aliases) to
//! constructors. Resolving a [`BackendConfig`] against the registry yields a
//! [`ConfiguredBackend`], which is the per-repetition [`BackendFactory`] the
//! benchmark consumes. Unknown names fail at that point, before any
//! repetition runs.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Constructor for a registered backend.
type Constructor =
    Box<dyn Fn(&BackendConfig, usize) -> HalResult<Box<dyn Backend>> + Send + Sync>;

struct Entry {
    description: String,
    constructor: Constructor,
}

/// Listing entry for a registered backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
}

/// Central registry of backend constructors.
#[derive(Default)]
pub struct BackendRegistry {
    entries: FxHashMap<String, Entry>,
    aliases: FxHashMap<String, String>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend constructor under `name`.
    ///
    /// The constructor receives the configuration and the repetition index.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        constructor: impl Fn(&BackendConfig, usize) -> HalResult<Box<dyn Backend>>
        + Send
        + Sync
        + 'static,
    ) {
        let name = name.into().to_ascii_lowercase();
        debug!("Registering backend: {}", name);
        self.entries.insert(
            name,
            Entry {
                description: description.into(),
                constructor: Box::new(constructor),
            },
        );
    }

    /// Make `alias` resolve to the backend registered as `target`.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        let alias = alias.into().to_ascii_lowercase();
        let target = target.into().to_ascii_lowercase();
        debug!("Registering backend alias: {} -> {}", alias, target);
        self.aliases.insert(alias, target);
    }

    /// Canonical name for `name`, following aliases. Case-insensitive.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let key = name.to_ascii_lowercase();
        let canonical = self.aliases.get(&key).unwrap_or(&key);
        self.entries
            .get_key_value(canonical)
            .map(|(k, _)| k.as_str())
    }

    /// Check if a backend is available by name or alias.
    pub fn has_backend(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Create a backend for one repetition.
    pub fn create(&self, config: &BackendConfig, repetition: usize) -> HalResult<Box<dyn Backend>> {
        let name = self
            .resolve(&config.backend)
            .ok_or_else(|| self.unknown(&config.backend))?;
        let entry = &self.entries[name];
        (entry.constructor)(config, repetition)
    }

    /// Bind a configuration to this registry, checking the backend name.
    pub fn configure(self: &Arc<Self>, config: BackendConfig) -> HalResult<ConfiguredBackend> {
        if !self.has_backend(&config.backend) {
            return Err(self.unknown(&config.backend));
        }
        Ok(ConfiguredBackend {
            registry: Arc::clone(self),
            config,
        })
    }

    /// All registered backends, sorted by name.
    pub fn available_backends(&self) -> Vec<BackendInfo> {
        let mut infos: Vec<BackendInfo> = self
            .entries
            .iter()
            .map(|(name, entry)| {
                let mut aliases: Vec<String> = self
                    .aliases
                    .iter()
                    .filter(|(_, target)| *target == name)
                    .map(|(alias, _)| alias.clone())
                    .collect();
                aliases.sort();
                BackendInfo {
                    name: name.clone(),
                    aliases,
                    description: entry.description.clone(),
                }
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    fn unknown(&self, name: &str) -> HalError {
        let available: Vec<String> = self
            .available_backends()
            .into_iter()
            .map(|info| info.name)
            .collect();
        HalError::UnknownBackend {
            name: name.to_string(),
            available: if available.is_empty() {
                "none".into()
            } else {
                available.join(", ")
            },
        }
    }
}

/// A backend configuration resolved against a registry.
#[derive(Clone)]
pub struct ConfiguredBackend {
    registry: Arc<BackendRegistry>,
    config: BackendConfig,
}

impl ConfiguredBackend {
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Canonical backend name.
    pub fn name(&self) -> &str {
        self.registry
            .resolve(&self.config.backend)
            .unwrap_or(&self.config.backend)
    }
}

impl BackendFactory for ConfiguredBackend {
    fn create(&self, repetition: usize) -> HalResult<Box<dyn Backend>> {
        self.registry.create(&self.config, repetition)
    }
}

impl std::fmt::Debug for ConfiguredBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredBackend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

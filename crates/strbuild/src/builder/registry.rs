//! Registry of default settings and named builders.

use std::collections::HashMap;

use tracing::debug;

use crate::builder::config::{BuilderOptions, Settings};
use crate::builder::error::RegistryError;
use crate::builder::string_builder::StringBuilder;

/// Name used for the builder returned by [`Registry::default_builder`].
pub const DEFAULT_NAME: &str = ":default:";

/// Default settings plus a cache of named builders.
///
/// New builders copy the defaults at creation; changing the defaults later
/// does not touch builders that already exist.
///
/// # Example
///
/// ```
/// use strbuild::{Registry, RegistryError, values};
///
/// let mut registry = Registry::new_default();
/// registry.defaults_mut().set_value("app", "strbuild");
///
/// registry.factory("greeting").settings_mut().set_message("Hello from {:app}");
///
/// let builder = registry.get("greeting").unwrap();
/// assert_eq!(builder.render(&values! {}, None), "Hello from strbuild");
/// assert!(matches!(registry.get("missing"), Err(RegistryError::UnregisteredCacheKey { .. })));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    defaults: Settings,
    builders: HashMap<String, StringBuilder>,
}

impl Registry {
    /// A registry with default settings and no cached builders.
    pub fn new_default() -> Self {
        Self::default()
    }

    pub fn with_settings(defaults: Settings) -> Self {
        Self {
            defaults,
            builders: HashMap::new(),
        }
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    /// Mutable access to the defaults used by builders created from now on.
    pub fn defaults_mut(&mut self) -> &mut Settings {
        &mut self.defaults
    }

    /// Returns the builder cached under `name`, creating it from the defaults
    /// if needed.
    pub fn factory(&mut self, name: &str) -> &mut StringBuilder {
        self.factory_with(name, BuilderOptions::default())
    }

    /// Like [`factory`](Self::factory), applying `options` when the builder is
    /// created. An existing builder is returned unchanged.
    pub fn factory_with(&mut self, name: &str, options: BuilderOptions) -> &mut StringBuilder {
        let defaults = &self.defaults;
        self.builders.entry(name.to_string()).or_insert_with(|| {
            debug!(name, "creating cached string builder");
            let mut settings = defaults.clone();
            options.apply_to(&mut settings);
            StringBuilder::cached(name, settings)
        })
    }

    /// The builder cached under [`DEFAULT_NAME`], created on first use.
    pub fn default_builder(&mut self) -> &mut StringBuilder {
        self.factory(DEFAULT_NAME)
    }

    /// A builder created from the defaults that is not cached.
    pub fn disposable(&self) -> StringBuilder {
        StringBuilder::with_defaults(self)
    }

    pub fn disposable_with(&self, options: BuilderOptions) -> StringBuilder {
        let mut settings = self.defaults.clone();
        options.apply_to(&mut settings);
        StringBuilder::with_settings(settings)
    }

    pub fn get(&self, name: &str) -> Result<&StringBuilder, RegistryError> {
        self.builders
            .get(name)
            .ok_or_else(|| RegistryError::UnregisteredCacheKey {
                name: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut StringBuilder, RegistryError> {
        self.builders
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnregisteredCacheKey {
                name: name.to_string(),
            })
    }

    /// Drops the builder cached under `name`.
    pub fn remove(&mut self, name: &str) -> Option<StringBuilder> {
        self.builders.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Names of the cached builders in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

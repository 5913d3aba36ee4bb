//! Process-wide registry for the `global-registry` feature.
//!
//! Provides thread-safe access to a shared [`Registry`] for programs that do
//! not want to pass one to every call site.

use std::sync::{LazyLock, RwLock};

use crate::{Registry, StringBuilder, Values};

static GLOBAL_REGISTRY: LazyLock<RwLock<Registry>> =
    LazyLock::new(|| RwLock::new(Registry::new_default()));

/// Provides read access to the global registry.
pub fn with_registry<T>(f: impl FnOnce(&Registry) -> T) -> T {
    let guard = GLOBAL_REGISTRY.read().expect("global registry lock poisoned");
    f(&guard)
}

/// Provides write access to the global registry.
pub fn with_registry_mut<T>(f: impl FnOnce(&mut Registry) -> T) -> T {
    let mut guard = GLOBAL_REGISTRY.write().expect("global registry lock poisoned");
    f(&mut guard)
}

/// Builds `message` with the global registry's default builder.
pub fn build(message: &str, values: &Values) -> String {
    with_registry_mut(|registry| registry.default_builder().build(message, values, None))
}

/// Returns a copy of the builder cached globally under `name`, creating it
/// from the global defaults if needed.
pub fn factory(name: &str) -> StringBuilder {
    with_registry_mut(|registry| registry.factory(name).clone())
}

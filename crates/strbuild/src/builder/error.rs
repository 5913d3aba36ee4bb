//! Error types for builder configuration.
//!
//! Only configuration can fail. Building a message never returns an error:
//! unresolved placeholders and unknown modifiers are absorbed into the
//! output.

use std::io::Error as IoError;
use std::path::PathBuf;

use serde_json::Error as JsonError;
use thiserror::Error;

use crate::builder::config::Marker;

/// A rejected configuration change. The previous configuration is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two markers, or a marker and the substitute, would become equal.
    #[error("{field} cannot be the same as the {other}: {value:?}")]
    ConfigurationConflict {
        field: Marker,
        other: Marker,
        value: String,
    },

    /// The text encoding is not supported.
    #[error("unknown encoding '{encoding}', expected one of: UTF-8, US-ASCII")]
    UnknownEncoding { encoding: String },

    /// Markers must not be empty.
    #[error("{field} cannot be empty")]
    EmptyMarker { field: Marker },
}

/// Errors from the named-builder cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No builder is cached under the requested name.
    #[error("no string builder is registered under '{name}'")]
    UnregisteredCacheKey { name: String },
}

/// Errors loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("invalid settings in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: JsonError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! Builder configuration, resolution and the interpolation loop.

mod config;
mod context;
mod engine;
mod error;
mod hooks;
mod lint;
mod registry;
mod resolver;
mod string_builder;

pub use config::{
    BuildLimits, BuilderOptions, DEFAULT_ENCLOSURE_BEGIN, DEFAULT_ENCLOSURE_END, DEFAULT_MESSAGE,
    DEFAULT_MODIFIER_SEPARATOR, DEFAULT_NAME_SEPARATOR, DEFAULT_SUBSTITUTE, Delimiters, Encoding,
    Marker, Settings, SettingsFile,
};
pub use context::BuildContext;
pub use error::{ConfigError, RegistryError, SettingsError};
pub use hooks::{Hook, escape_shell_command, hook, shell_command_hook};
pub use lint::{TemplateWarning, compute_suggestions, lint_template};
pub use registry::{DEFAULT_NAME, Registry};
pub use resolver::{Converter, Resolution, resolve};
pub use string_builder::StringBuilder;

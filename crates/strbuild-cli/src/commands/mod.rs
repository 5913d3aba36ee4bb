//! CLI command implementations.

mod check;
mod pipeline;
mod render;

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use strbuild::{Settings, SettingsFile};

pub use check::{run_check, CheckArgs};
pub use pipeline::{run_pipeline, PipelineArgs};
pub use render::{run_render, RenderArgs};

/// Default settings, with the JSON settings file at `path` applied if given.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::new();
    if let Some(path) = path {
        let file = SettingsFile::from_path(path).into_diagnostic()?;
        file.apply(&mut settings).into_diagnostic()?;
    }
    Ok(settings)
}

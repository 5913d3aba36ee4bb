//! Implementation of the `strbuild check` command.

use std::path::PathBuf;

use miette::{IntoDiagnostic, Report};
use owo_colors::OwoColorize;
use strbuild::lint_template;

use crate::commands::load_settings;
use crate::output::TemplateDiagnostic;

/// Arguments for the check command.
#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Template to check
    pub template: String,

    /// JSON settings file with markers and escaping options
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the check command.
///
/// Exits with `DATAERR` when the template has warnings.
pub fn run_check(args: CheckArgs) -> miette::Result<i32> {
    let settings = match load_settings(args.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:?}", e);
            return Ok(exitcode::CONFIG);
        }
    };
    let warnings = lint_template(&args.template, &settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&warnings).into_diagnostic()?);
    } else if warnings.is_empty() {
        println!("{} no problems found", "ok:".green().bold());
    } else {
        let begin_len = settings.delimiters().enclosure_begin().len();
        for warning in &warnings {
            let diagnostic = TemplateDiagnostic::from_warning(&args.template, warning, begin_len);
            eprintln!("{:?}", Report::new(diagnostic));
        }
        let noun = if warnings.len() == 1 { "warning" } else { "warnings" };
        println!("{} {} {}", "found".yellow().bold(), warnings.len(), noun);
    }

    if warnings.is_empty() {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}

//! Implementation of the `strbuild pipeline` command.

use miette::IntoDiagnostic;
use strbuild::parse_pipeline;

use crate::output::table::format_pipeline_table;

/// Arguments for the pipeline command.
#[derive(Debug, clap::Args)]
pub struct PipelineArgs {
    /// Modifier text as written after the first separator, e.g. "date('Y-m-d')|e"
    pub text: String,

    /// Modifier separator
    #[arg(long, default_value = "|")]
    pub separator: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the pipeline command.
pub fn run_pipeline(args: PipelineArgs) -> miette::Result<i32> {
    if args.separator.is_empty() {
        eprintln!("Modifier separator cannot be empty");
        return Ok(exitcode::USAGE);
    }
    let calls = parse_pipeline(&args.text, &args.separator);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calls).into_diagnostic()?);
    } else if calls.is_empty() {
        println!("(empty pipeline)");
    } else {
        println!("{}", format_pipeline_table(&calls));
    }
    Ok(exitcode::OK)
}

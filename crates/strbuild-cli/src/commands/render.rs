//! Implementation of the `strbuild render` command.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic};
use serde::Serialize;
use serde_json::Value as JsonValue;
use strbuild::{StringBuilder, Value, Values};
use tracing::debug;

use crate::commands::load_settings;

/// Arguments for the render command.
#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Template to build. Defaults to the message from --settings
    pub template: Option<String>,

    /// Values in name=value format (repeatable)
    #[arg(short = 'v', long = "value", value_parser = parse_key_val)]
    pub values: Vec<(String, String)>,

    /// JSON object of values, overridden by --value
    #[arg(long = "values")]
    pub values_file: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for render results.
#[derive(Serialize)]
pub struct RenderResult {
    pub result: String,
}

/// Parse a name=value argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid value format '{}': expected name=value", s))?;
    Ok((name.to_string(), value.to_string()))
}

/// Integers become `Int`, everything else stays a string.
fn parse_value(text: String) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(text),
    }
}

fn read_values_file(path: &Path) -> miette::Result<Values> {
    let content = read_to_string(path)
        .map_err(|e| miette!("Cannot read values file {}: {}", path.display(), e))?;
    let json: JsonValue = serde_json::from_str(&content).into_diagnostic()?;
    match json {
        JsonValue::Object(entries) => Ok(entries
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        _ => Err(miette!(
            "Values file {} must contain a JSON object",
            path.display()
        )),
    }
}

/// Run the render command.
pub fn run_render(args: RenderArgs) -> miette::Result<i32> {
    let settings = match load_settings(args.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:?}", e);
            return Ok(exitcode::CONFIG);
        }
    };
    let builder = StringBuilder::with_settings(settings);

    let mut values = match &args.values_file {
        Some(path) => match read_values_file(path) {
            Ok(values) => values,
            Err(e) => {
                eprintln!("{:?}", e);
                return Ok(exitcode::DATAERR);
            }
        },
        None => Values::new(),
    };
    values.extend(
        args.values
            .into_iter()
            .map(|(name, text)| (name, parse_value(text))),
    );
    debug!(count = values.len(), "rendering with values");

    let result = match &args.template {
        Some(template) => builder.build(template, &values, None),
        None => builder.render(&values, None),
    };

    if args.json {
        let output = RenderResult { result };
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        println!("{}", result);
    }
    Ok(exitcode::OK)
}

//! Table formatting utilities for CLI output.

use comfy_table::{presets, ContentArrangement, Table};
use strbuild::ModifierCall;

/// Format a parsed pipeline with one row per argument.
///
/// Calls without arguments get a single row with empty argument columns.
pub fn format_pipeline_table(calls: &[ModifierCall]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stage", "Modifier", "Argument", "Value"]);

    for (stage, call) in calls.iter().enumerate() {
        if call.args.is_empty() {
            table.add_row(vec![
                (stage + 1).to_string(),
                call.name.clone(),
                String::new(),
                String::new(),
            ]);
            continue;
        }
        for (key, literal) in call.args.iter() {
            table.add_row(vec![
                (stage + 1).to_string(),
                call.name.clone(),
                key.to_string(),
                literal.to_string(),
            ]);
        }
    }

    table
}

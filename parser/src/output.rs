//! @ai:module:intent Format extracted markers, parsed values and descriptors for display
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_parsed_file, format_project, format_value, format_type_info, to_json
//! @ai:module:depends_on marker, value, argument
//! @ai:module:stateless true

use crate::argument::ArgumentTypeInfo;
use crate::marker::{Diagnostic, Marker, ParsedFile, ParsedProject};
use crate::value::Value;
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.unwrap_or_default()
}

fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> String {
    match format {
        OutputFormat::Json => to_json(value, false),
        OutputFormat::JsonPretty => to_json(value, true),
        OutputFormat::Text => text(value),
    }
}

/// @ai:effects pure
pub fn format_parsed_file(file: &ParsedFile, format: OutputFormat) -> String {
    render(file, format, format_parsed_file_text)
}

/// @ai:effects pure
pub fn format_project(project: &ParsedProject, format: OutputFormat) -> String {
    render(project, format, format_project_text)
}

/// @ai:effects pure
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    render(value, format, Value::to_string)
}

/// @ai:intent Render a descriptor tree, one level per line in text form
/// @ai:effects pure
pub fn format_type_info(info: &ArgumentTypeInfo, format: OutputFormat) -> String {
    render(info, format, |info| {
        let mut output = String::new();
        let mut depth = 0;
        let mut current = Some(info);
        while let Some(level) = current {
            let label = if depth == 0 { "type" } else { "item" };
            output.push_str(&format!(
                "{}{}: {}\n",
                "  ".repeat(depth),
                label.dimmed(),
                level.actual_type.to_string().cyan()
            ));
            current = level.item();
            depth += 1;
        }
        output
    })
}

fn format_parsed_file_text(file: &ParsedFile) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        file.path.display().to_string().bold(),
        file.language
    ));

    for marker in &file.markers {
        output.push_str(&format_marker(marker));
    }

    for diagnostic in &file.diagnostics {
        output.push_str(&format_diagnostic(diagnostic));
    }

    output
}

fn format_marker(marker: &Marker) -> String {
    let mut output = format!(
        "  {} {}\n",
        format!("{}:", marker.location.line).dimmed(),
        marker.name.cyan()
    );

    for (name, value) in &marker.arguments {
        output.push_str(&format!("      {} = {}\n", name.yellow(), value));
    }

    output
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "  {} {} {}\n      {}\n",
        format!("{}:", diagnostic.location.line).dimmed(),
        "WARN".yellow().bold(),
        diagnostic.message,
        diagnostic.text.dimmed()
    )
}

fn format_project_text(project: &ParsedProject) -> String {
    let mut output = String::new();

    let reported = project
        .files
        .iter()
        .filter(|f| !f.markers.is_empty() || !f.diagnostics.is_empty());
    for file in reported {
        output.push_str(&format_parsed_file_text(file));
        output.push('\n');
    }

    output.push_str(&format!(
        "Scanned {} files, found {} markers\n",
        project.files.len(),
        project.total_markers
    ));

    if project.is_clean() {
        output.push_str(&format!("{} No marker errors\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "{} markers could not be parsed\n",
            project.total_diagnostics.to_string().red().bold()
        ));
    }

    output
}

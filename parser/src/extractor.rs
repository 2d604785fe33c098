//! @ai:module:intent Extract typed markers from the comments of source files
//! @ai:module:layer application
//! @ai:module:public_api extract_file, extract_source, extract_directory, ExtractOptions
//! @ai:module:depends_on parser, marker, definition, language, error
//! @ai:module:stateless true

use crate::definition::Registry;
use crate::error::{Error, Result};
use crate::language::{is_supported_file, Language};
use crate::marker::{parse_marker, Diagnostic, Location, ParsedFile, ParsedProject};
use crate::parser::{parse_file, parse_source, ParsedSource};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent How extraction reacts to markers that fail to parse
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Stop at the first bad marker instead of recording a diagnostic.
    pub fail_fast: bool,
}

impl ExtractOptions {
    pub fn fail_fast() -> Self {
        Self { fail_fast: true }
    }
}

/// @ai:intent Extract all markers from a source file
/// @ai:pre path exists and has a supported extension
/// @ai:post markers that fail to parse become diagnostics
/// @ai:effects fs:read
pub fn extract_file(path: &Path, registry: &Registry) -> Result<ParsedFile> {
    extract_file_with(path, registry, ExtractOptions::default())
}

/// @ai:effects fs:read
pub fn extract_file_with(
    path: &Path,
    registry: &Registry,
    options: ExtractOptions,
) -> Result<ParsedFile> {
    let parsed = parse_file(path)?;
    extract_parsed(&parsed, path, registry, options)
}

/// @ai:intent Extract markers from in-memory source text attributed to `path`
/// @ai:effects pure
pub fn extract_source(
    content: &str,
    language: Language,
    path: &Path,
    registry: &Registry,
) -> Result<ParsedFile> {
    extract_parsed(
        &parse_source(content, language),
        path,
        registry,
        ExtractOptions::default(),
    )
}

/// @ai:intent Extract markers from every supported file below a directory
/// @ai:post files are visited in file name order
/// @ai:edge_cases unreadable files are skipped with a warning unless fail_fast
/// @ai:effects fs:read
pub fn extract_directory(
    path: &Path,
    registry: &Registry,
    options: ExtractOptions,
) -> Result<ParsedProject> {
    let mut project = ParsedProject::default();

    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();
        if !is_supported_file(file_path) {
            continue;
        }

        match extract_file_with(file_path, registry, options) {
            Ok(file) => project.push(file),
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                tracing::warn!(path = %file_path.display(), error = %e, "skipping file");
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        files = project.files.len(),
        markers = project.total_markers,
        "extracted markers from directory"
    );
    Ok(project)
}

fn extract_parsed(
    parsed: &ParsedSource,
    path: &Path,
    registry: &Registry,
    options: ExtractOptions,
) -> Result<ParsedFile> {
    let mut file = ParsedFile {
        path: path.to_path_buf(),
        language: parsed.language.name().to_string(),
        markers: Vec::new(),
        diagnostics: Vec::new(),
    };

    for line in parsed.comment_blocks.iter().flat_map(|b| b.marker_lines()) {
        let location = Location::new(path.to_path_buf(), line.line_number).with_column(line.column);

        match parse_marker(&line.content, registry) {
            Ok(mut marker) => {
                marker.location = location;
                file.markers.push(marker);
            }
            Err(e) if options.fail_fast => {
                return Err(Error::Marker {
                    file: path.to_path_buf(),
                    line: line.line_number,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    line = line.line_number,
                    error = %e,
                    "skipping marker"
                );
                file.diagnostics.push(Diagnostic {
                    location,
                    text: line.content.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(file)
}

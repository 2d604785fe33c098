//! @ai:module:intent Typed marker arguments: classify destinations, parse literals, extract markers
//! @ai:module:layer infrastructure
//! @ai:module:public_api argument, dispatch, slot, value, shape, marker, definition, extractor, config, output, error
//! @ai:module:stateless true
//!
//! # Markers
//!
//! A library for parsing structured markers such as
//! `// +test-marker:struct-type-level:Name=cookie, Any={key:"value"}` out of
//! source comments, with argument values parsed according to the type of
//! the destination they are written into.
//!
//! ## Example
//!
//! ```rust,no_run
//! use markers::{extractor, output, parse_value, Definition, Registry};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! // Parse a literal straight into a typed destination
//! let ports: Vec<u16> = parse_value("{80, 443}").unwrap();
//! let labels: HashMap<String, String> = parse_value("{tier:web, team:ops}").unwrap();
//!
//! // Extract markers using typed definitions
//! let mut registry = Registry::new();
//! registry.register(Definition::new("route").argument::<String>("Path", true).unwrap());
//! let parsed = extractor::extract_file(Path::new("server.go"), &registry).unwrap();
//! println!("{}", output::format_parsed_file(&parsed, output::OutputFormat::JsonPretty));
//! ```

pub mod argument;
pub mod config;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod language;
pub mod marker;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod shape;
pub mod slot;
pub mod value;

pub use argument::{classify, ArgumentType, ArgumentTypeInfo};
pub use config::MarkersConfig;
pub use definition::{check_bounds, ArgumentDefinition, Definition, Registry};
pub use dispatch::{parse, parse_value};
pub use error::{Error, ErrorKind, ParseError, Result};
pub use extractor::{extract_directory, extract_file, extract_source, ExtractOptions};
pub use language::{detect_language, is_supported_file, Language};
pub use marker::{parse_marker, Diagnostic, Location, Marker, ParsedFile, ParsedProject};
pub use output::{format_parsed_file, format_project, to_json, OutputFormat};
pub use scanner::Scanner;
pub use shape::{Shaped, TypeShape};
pub use slot::{Rejection, Slot};
pub use value::Value;

//! @ai:module:intent Marker data structures and the marker line grammar
//! @ai:module:layer domain
//! @ai:module:public_api Marker, Location, Diagnostic, ParsedFile, ParsedProject, parse_marker
//! @ai:module:depends_on definition, dispatch, scanner, value, error

use crate::argument::{ArgumentType, ArgumentTypeInfo};
use crate::definition::{Definition, Registry};
use crate::dispatch::Frame;
use crate::error::{Error, ParseError, Result};
use crate::scanner::Scanner;
use crate::value::Value;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Argument name used for `+name=value`.
pub const VALUE_ARGUMENT: &str = "Value";

static ANY_ARGUMENT: ArgumentTypeInfo = ArgumentTypeInfo::scalar(ArgumentType::Any);

static MARKER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+([^\s=,]+)").expect("Invalid regex"));

/// @ai:intent Represents a source code location
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: Option<usize>,
}

impl Location {
    pub fn new(file: PathBuf, line: usize) -> Self {
        Self {
            file,
            line,
            column: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

/// @ai:intent A marker found in a comment with its parsed argument values
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub name: String,
    pub arguments: BTreeMap<String, Value>,
    pub location: Location,
    pub text: String,
}

impl Marker {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// The anonymous argument of `+name=value`.
    pub fn value(&self) -> Option<&Value> {
        self.argument(VALUE_ARGUMENT)
    }
}

/// @ai:intent A marker that could not be parsed; extraction continues past it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub text: String,
    pub message: String,
}

/// @ai:intent Markers and diagnostics extracted from one file
#[derive(Debug, Clone, Serialize)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub language: String,
    pub markers: Vec<Marker>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedFile {
    pub fn markers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Marker> + 'a {
        self.markers.iter().filter(move |m| m.name == name)
    }
}

/// @ai:intent Extraction result for a directory tree
#[derive(Debug, Clone, Serialize, Default)]
pub struct ParsedProject {
    pub files: Vec<ParsedFile>,
    pub total_markers: usize,
    pub total_diagnostics: usize,
}

impl ParsedProject {
    pub fn push(&mut self, file: ParsedFile) {
        self.total_markers += file.markers.len();
        self.total_diagnostics += file.diagnostics.len();
        self.files.push(file);
    }

    pub fn is_clean(&self) -> bool {
        self.total_diagnostics == 0
    }
}

/// @ai:intent Parse one marker line such as `+group:name:Arg=1, Other={a:b}`
/// @ai:pre text is the comment content starting with `+`
/// @ai:post returned marker has a default location
/// @ai:example ("+import=marker, Pkg=x") -> import {Value: "marker", Pkg: "x"}
/// @ai:example ("+test-marker:package-level:Name=dessert.go") -> test-marker:package-level {Name: "dessert.go"}
/// @ai:edge_cases a registered name followed by `=` takes the anonymous Value argument
/// @ai:effects pure
pub fn parse_marker(text: &str, registry: &Registry) -> Result<Marker> {
    let text = text.trim();
    let captures = MARKER_NAME.captures(text).ok_or_else(|| Error::InvalidMarker {
        text: text.to_string(),
        message: "expected `+` followed by a marker name".to_string(),
    })?;
    let Some(token) = captures.get(1) else {
        return Err(invalid(text, "missing marker name"));
    };

    let mut scanner = Scanner::new(text);
    while scanner.position() < token.end() {
        scanner.advance();
    }

    let token = token.as_str();
    let has_arguments = scanner.peek() == Some('=');
    let (name, first_argument) = match token.rsplit_once(':') {
        _ if !has_arguments => (token, None),
        Some((name, argument)) if registry.lookup(token).is_none() => (name, Some(argument)),
        _ => (token, Some(VALUE_ARGUMENT)),
    };

    let definition = registry.lookup(name);
    let mut arguments = BTreeMap::new();

    if let Some(first) = first_argument {
        scanner.advance();
        parse_argument(&mut scanner, name, first, definition, &mut arguments)?;

        loop {
            scanner.skip_whitespace();
            if scanner.is_at_end() {
                break;
            }

            let position = scanner.position();
            if !scanner.eat(',') {
                let found = scanner.rest().chars().next().map(String::from).unwrap_or_default();
                return Err(ParseError::syntax("`,` between arguments", found, position).into());
            }

            scanner.skip_whitespace();
            let argument = scanner.take_while(|c| c != '=' && c != ',' && !c.is_whitespace());
            scanner.skip_whitespace();
            if !scanner.eat('=') {
                return Err(invalid(text, &format!("argument `{}` has no `=`", argument)));
            }
            parse_argument(&mut scanner, name, argument, definition, &mut arguments)?;
        }
    } else {
        scanner.skip_whitespace();
        if !scanner.is_at_end() {
            return Err(invalid(text, "unexpected text after marker name"));
        }
    }

    if let Some(definition) = definition {
        if let Some(missing) = definition
            .arguments
            .iter()
            .find(|arg| arg.required && !arguments.contains_key(&arg.name))
        {
            return Err(Error::MissingArgument {
                marker: name.to_string(),
                argument: missing.name.clone(),
            });
        }
    }

    Ok(Marker {
        name: name.to_string(),
        arguments,
        location: Location::default(),
        text: text.to_string(),
    })
}

fn parse_argument(
    scanner: &mut Scanner<'_>,
    marker: &str,
    argument: &str,
    definition: Option<&Definition>,
    arguments: &mut BTreeMap<String, Value>,
) -> Result<()> {
    if argument.is_empty() {
        return Err(invalid(scanner.source(), "empty argument name"));
    }

    let declared = match definition {
        Some(definition) => Some(definition.find_argument(argument).ok_or_else(|| {
            Error::UnknownArgument {
                marker: marker.to_string(),
                argument: argument.to_string(),
            }
        })?),
        None => None,
    };
    let info = declared.map_or(&ANY_ARGUMENT, |declared| &declared.type_info);

    scanner.skip_whitespace();
    let position = scanner.position();
    let mut value = Value::Null;
    info.parse_in(scanner, &mut value, Frame::Group)?;
    if let Some(declared) = declared {
        declared.check_bounds(&value, position)?;
    }
    arguments.insert(argument.to_string(), value);
    Ok(())
}

fn invalid(text: &str, message: &str) -> Error {
    Error::InvalidMarker {
        text: text.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentTypeInfo;
    use crate::definition::Definition;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn args(marker: &Marker) -> Vec<(&str, &Value)> {
        marker
            .arguments
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    #[test]
    fn test_anonymous_value_argument() {
        let marker = parse_marker(
            "+import=marker, Pkg=github.com/procyon-projects/markers",
            &Registry::default(),
        )
        .unwrap();

        assert_eq!(marker.name, "import");
        assert_eq!(marker.value(), Some(&Value::from("marker")));
        assert_eq!(
            marker.argument("Pkg"),
            Some(&Value::from("github.com/procyon-projects/markers"))
        );
    }

    #[test]
    fn test_named_first_argument() {
        let marker = parse_marker(
            "+test-marker:struct-type-level:Name=cookie, Any={key:\"value\"}",
            &Registry::default(),
        )
        .unwrap();

        let mut expected = BTreeMap::new();
        expected.insert("key".to_string(), Value::from("value"));
        assert_eq!(marker.name, "test-marker:struct-type-level");
        assert_eq!(
            args(&marker),
            vec![
                ("Any", &Value::Map(expected)),
                ("Name", &Value::from("cookie")),
            ]
        );
    }

    #[test]
    fn test_flag_marker() {
        let marker = parse_marker("  +test-marker:deprecated ", &Registry::default()).unwrap();
        assert_eq!(marker.name, "test-marker:deprecated");
        assert!(marker.arguments.is_empty());

        let err = parse_marker("+flag trailing", &Registry::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMarker { .. }));
    }

    #[test]
    fn test_registered_name_takes_value_argument() {
        let mut registry = Registry::new();
        registry.register(
            Definition::new("validation:Minimum")
                .argument::<i64>(VALUE_ARGUMENT, true)
                .unwrap(),
        );

        let marker = parse_marker("+validation:Minimum=-5", &registry).unwrap();
        assert_eq!(marker.name, "validation:Minimum");
        assert_eq!(marker.value(), Some(&Value::Int(-5)));
    }

    #[test]
    fn test_typed_arguments_follow_definition() {
        let mut registry = Registry::new();
        registry.register(
            Definition::new("route")
                .argument::<String>("Path", true)
                .unwrap()
                .argument::<Vec<String>>("Methods", false)
                .unwrap()
                .argument::<Vec<u8>>("Body", false)
                .unwrap(),
        );

        let marker = parse_marker("+route:Path=/users/{id}, Methods=GET;POST", &registry);
        // A bare string stops at `}`
        assert!(marker.is_err());

        let marker = parse_marker(
            "+route:Path=\"/users/{id}\", Methods=GET;POST, Body={\"a\": 1}",
            &registry,
        )
        .unwrap();
        assert_eq!(marker.argument("Path"), Some(&Value::from("/users/{id}")));
        assert_eq!(
            marker.argument("Methods"),
            Some(&Value::from(vec!["GET", "POST"]))
        );
        assert_eq!(marker.argument("Body"), Some(&Value::from("{\"a\": 1}")));
    }

    #[test]
    fn test_unknown_and_missing_arguments() {
        let mut registry = Registry::new();
        registry.register(
            Definition::new("route")
                .argument::<String>("Path", true)
                .unwrap(),
        );

        let err = parse_marker("+route:Verb=GET", &registry).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownArgument { ref marker, ref argument }
                if marker == "route" && argument == "Verb"
        ));

        let err = parse_marker("+route", &registry).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));
    }

    #[test]
    fn test_argument_errors_keep_position() {
        let mut registry = Registry::new();
        registry.register(Definition::new("limit").argument::<u8>("Max", false).unwrap());

        let err = parse_marker("+limit:Max=300", &registry).unwrap_err();
        let Error::Argument(inner) = err else {
            panic!("expected argument error, got {:?}", err);
        };
        assert_eq!(inner.kind(), ErrorKind::Overflow);
        assert_eq!(inner.position(), Some(11));
    }

    #[test]
    fn test_unsigned_argument_keeps_full_width() {
        let mut registry = Registry::new();
        registry.register(
            Definition::new("m")
                .argument::<u64>("Max", false)
                .unwrap()
                .argument::<u32>("Mid", false)
                .unwrap(),
        );

        let marker = parse_marker("+m:Max=18446744073709551615", &registry).unwrap();
        assert_eq!(marker.argument("Max"), Some(&Value::Uint(u64::MAX)));
        assert_eq!(
            marker.argument("Max").and_then(Value::as_uint),
            Some(u64::MAX)
        );

        let err = parse_marker("+m:Mid=18446744073709551615", &registry).unwrap_err();
        let Error::Argument(inner) = err else {
            panic!("expected argument error, got {:?}", err);
        };
        assert_eq!(inner.kind(), ErrorKind::Overflow);
        assert_eq!(inner.position(), Some(7));
    }

    #[test]
    fn test_missing_comma_between_arguments() {
        let err = parse_marker("+m:A=\"x\" B=1", &Registry::default()).unwrap_err();
        let Error::Argument(inner) = err else {
            panic!("expected argument error, got {:?}", err);
        };
        assert_eq!(inner, ParseError::syntax("`,` between arguments", "B", 9));
    }

    #[test]
    fn test_not_a_marker() {
        assert!(parse_marker("just a comment", &Registry::default()).is_err());
        assert!(parse_marker("+=1", &Registry::default()).is_err());
        assert!(parse_marker("+name:=1", &Registry::default()).is_err());
    }

    #[test]
    fn test_custom_type_info_argument() {
        let mut registry = Registry::new();
        registry.register(Definition::new("tags").with_argument(
            "Values",
            ArgumentTypeInfo::map_of(ArgumentTypeInfo::of::<Vec<i32>>().unwrap()),
            false,
        ));

        let marker = parse_marker("+tags:Values={a:{1,2}, b:3;4}", &registry).unwrap();
        let values = marker.argument("Values").and_then(Value::as_map).unwrap();
        assert_eq!(values["a"], Value::from(vec![1i64, 2]));
        assert_eq!(values["b"], Value::from(vec![3i64, 4]));
    }
}

//! @ai:module:intent Define error types for argument parsing and marker extraction
//! @ai:module:layer domain
//! @ai:module:public_api ParseError, ErrorKind, Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Coarse error category so callers can branch without matching fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedType,
    Syntax,
    Overflow,
    Unterminated,
    Mismatch,
}

/// @ai:intent Failure of the argument core: classification or literal parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported argument type `{0}`")]
    UnsupportedType(String),

    #[error("syntax error at offset {position}: expected {expected}, found `{found}`")]
    Syntax {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("integer literal `{literal}` at offset {position} overflows {target}")]
    Overflow {
        literal: String,
        target: String,
        position: usize,
    },

    #[error("unterminated {what} starting at offset {position}")]
    Unterminated { what: &'static str, position: usize },

    #[error("destination {destination} cannot hold {found} (offset {position})")]
    Mismatch {
        destination: &'static str,
        found: &'static str,
        position: usize,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            ParseError::Syntax { .. } => ErrorKind::Syntax,
            ParseError::Overflow { .. } => ErrorKind::Overflow,
            ParseError::Unterminated { .. } => ErrorKind::Unterminated,
            ParseError::Mismatch { .. } => ErrorKind::Mismatch,
        }
    }

    /// @ai:intent Byte offset into the literal where the error was detected, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnsupportedType(_) => None,
            ParseError::Syntax { position, .. }
            | ParseError::Overflow { position, .. }
            | ParseError::Unterminated { position, .. }
            | ParseError::Mismatch { position, .. } => Some(*position),
        }
    }

    pub(crate) fn syntax(
        expected: impl Into<String>,
        found: impl Into<String>,
        position: usize,
    ) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }
}

/// @ai:intent Unified error type for marker extraction, configuration and the CLI
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error(transparent)]
    Argument(#[from] ParseError),

    #[error("Invalid marker `{text}`: {message}")]
    InvalidMarker { text: String, message: String },

    #[error("Marker `{marker}` has no argument named `{argument}`")]
    UnknownArgument { marker: String, argument: String },

    #[error("Marker `{marker}` is missing required argument `{argument}`")]
    MissingArgument { marker: String, argument: String },

    #[error("Marker error at {file}:{line}: {source}")]
    Marker {
        file: PathBuf,
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

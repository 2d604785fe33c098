//! @ai:module:intent Map file extensions to the comment syntax markers are read from
//! @ai:module:layer domain
//! @ai:module:public_api Language, CommentSyntax, detect_language, is_supported_file
//! @ai:module:stateless true

use std::path::Path;

/// @ai:intent Source language whose comments may carry markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Go,
    Rust,
    Java,
    Kotlin,
    JavaScript,
    TypeScript,
    C,
    Cpp,
    Python,
    Shell,
}

const ALL: [Language; 10] = [
    Language::Go,
    Language::Rust,
    Language::Java,
    Language::Kotlin,
    Language::JavaScript,
    Language::TypeScript,
    Language::C,
    Language::Cpp,
    Language::Python,
    Language::Shell,
];

/// @ai:intent Comment delimiters of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Line comment prefixes, longest first so `///` wins over `//`.
    pub line: &'static [&'static str],
    /// Block comment open and close delimiters.
    pub block: Option<(&'static str, &'static str)>,
}

const C_FAMILY: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: Some(("/*", "*/")),
};

const HASH: CommentSyntax = CommentSyntax {
    line: &["#"],
    block: None,
};

impl Language {
    /// @ai:effects pure
    pub fn comment_syntax(&self) -> CommentSyntax {
        match self {
            Language::Rust => CommentSyntax {
                line: &["///", "//!", "//"],
                block: Some(("/*", "*/")),
            },
            Language::Go
            | Language::Java
            | Language::Kotlin
            | Language::JavaScript
            | Language::TypeScript
            | Language::C
            | Language::Cpp => C_FAMILY,
            Language::Python | Language::Shell => HASH,
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Go => &["go"],
            Language::Rust => &["rs"],
            Language::Java => &["java"],
            Language::Kotlin => &["kt", "kts"],
            Language::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Language::TypeScript => &["ts", "tsx"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh"],
            Language::Python => &["py"],
            Language::Shell => &["sh", "bash"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Shell => "shell",
        }
    }

    /// Looks a language up by the name `name()` returns.
    pub fn from_name(name: &str) -> Option<Language> {
        ALL.into_iter().find(|lang| lang.name() == name)
    }
}

/// @ai:intent Detect the language of a file from its extension
/// @ai:example ("dessert.go") -> Some(Go)
/// @ai:example ("README.md") -> None
/// @ai:effects pure
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    ALL.into_iter().find(|lang| lang.extensions().contains(&ext))
}

pub fn is_supported_file(path: &Path) -> bool {
    detect_language(path).is_some()
}

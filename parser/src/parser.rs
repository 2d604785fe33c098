//! @ai:module:intent Read source files and collect the comment lines markers live in
//! @ai:module:layer application
//! @ai:module:public_api parse_file, parse_source, ParsedSource, CommentBlock, CommentLine
//! @ai:module:depends_on language, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::language::{detect_language, CommentSyntax, Language};
use std::path::Path;

/// @ai:intent Consecutive comment lines, possibly separated by blank lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub lines: Vec<CommentLine>,
    pub start_line: usize,
    pub end_line: usize,
}

/// @ai:intent Text of one comment line with delimiters stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub line_number: usize,
    /// 1-based character column where `content` starts.
    pub column: usize,
    pub content: String,
}

impl CommentLine {
    /// A marker line starts with `+` directly followed by a name.
    pub fn is_marker(&self) -> bool {
        let mut chars = self.content.chars();
        chars.next() == Some('+') && chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
    }
}

impl CommentBlock {
    pub fn marker_lines(&self) -> impl Iterator<Item = &CommentLine> {
        self.lines.iter().filter(|line| line.is_marker())
    }
}

/// @ai:intent Comment blocks of one source text
#[derive(Debug)]
pub struct ParsedSource {
    pub language: Language,
    pub comment_blocks: Vec<CommentBlock>,
}

/// @ai:intent Read a file and collect its comment blocks
/// @ai:pre path has a supported extension
/// @ai:effects fs:read
pub fn parse_file(path: &Path) -> Result<ParsedSource> {
    let language = detect_language(path)
        .ok_or_else(|| Error::UnsupportedFileType(path.display().to_string()))?;

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(parse_source(&content, language))
}

/// @ai:intent Collect comment blocks from in-memory source text
/// @ai:post blocks are ordered by line and never overlap
/// @ai:edge_cases comments trailing code on the same line are ignored
/// @ai:effects pure
pub fn parse_source(content: &str, language: Language) -> ParsedSource {
    let syntax = language.comment_syntax();
    let mut blocks = Vec::new();
    let mut current: Option<CommentBlock> = None;
    let mut open_block: Option<&'static str> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_number = idx + 1;

        let comment = match open_block {
            Some(close) => {
                let body = match line.find(close) {
                    Some(end) => {
                        open_block = None;
                        &line[..end]
                    }
                    None => line,
                };
                Some(block_continuation(body))
            }
            None => match line_comment(line, &syntax) {
                Some(found) => Some(found),
                None => block_opening(line, &syntax).map(|(offset, body, close)| {
                    open_block = close;
                    (offset, body)
                }),
            },
        };

        match comment {
            Some((offset, body)) => {
                let comment_line = comment_line(line_number, line, offset, body);
                match &mut current {
                    Some(block) => {
                        block.lines.push(comment_line);
                        block.end_line = line_number;
                    }
                    None => {
                        current = Some(CommentBlock {
                            lines: vec![comment_line],
                            start_line: line_number,
                            end_line: line_number,
                        });
                    }
                }
            }
            None if !line.trim().is_empty() => blocks.extend(current.take()),
            None => {}
        }
    }

    blocks.extend(current);

    ParsedSource {
        language,
        comment_blocks: blocks,
    }
}

/// Offset and text after a line comment prefix.
fn line_comment<'a>(line: &'a str, syntax: &CommentSyntax) -> Option<(usize, &'a str)> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    let prefix = syntax.line.iter().find(|prefix| rest.starts_with(**prefix))?;
    Some((indent + prefix.len(), &rest[prefix.len()..]))
}

/// Offset and text after a block opener, plus the closer if the block stays open.
fn block_opening<'a>(
    line: &'a str,
    syntax: &CommentSyntax,
) -> Option<(usize, &'a str, Option<&'static str>)> {
    let (open, close) = syntax.block?;
    let indent = line.len() - line.trim_start().len();
    if !line[indent..].starts_with(open) {
        return None;
    }

    let start = indent + open.len();
    let rest = &line[start..];
    Some(match rest.find(close) {
        Some(end) => (start, &rest[..end], None),
        None => (start, rest, Some(close)),
    })
}

/// Inner block line; a leading `*` gutter is dropped.
fn block_continuation(body: &str) -> (usize, &str) {
    let mut offset = body.len() - body.trim_start().len();
    if body[offset..].starts_with('*') {
        offset += 1;
    }
    (offset, &body[offset..])
}

fn comment_line(line_number: usize, line: &str, offset: usize, body: &str) -> CommentLine {
    let trimmed = body.trim_start();
    let start = offset + (body.len() - trimmed.len());
    CommentLine {
        line_number,
        column: line[..start].chars().count() + 1,
        content: trimmed.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(source: &ParsedSource) -> Vec<Vec<&str>> {
        source
            .comment_blocks
            .iter()
            .map(|b| b.lines.iter().map(|l| l.content.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_go_line_comments() {
        let source = parse_source(
            "package dessert\n\n// Cookie is sweet.\n//   +test-marker:deprecated\n\ntype Cookie struct{}\n",
            Language::Go,
        );

        assert_eq!(
            contents(&source),
            vec![vec!["Cookie is sweet.", "+test-marker:deprecated"]]
        );
        let marker = &source.comment_blocks[0].lines[1];
        assert_eq!(marker.line_number, 4);
        assert_eq!(marker.column, 6);
        assert!(marker.is_marker());
    }

    #[test]
    fn test_code_splits_blocks() {
        let source = parse_source("// a\nfunc f() {}\n// b\n", Language::Go);
        assert_eq!(contents(&source), vec![vec!["a"], vec!["b"]]);
        assert_eq!(source.comment_blocks[1].start_line, 3);
    }

    #[test]
    fn test_block_comments() {
        let source = parse_source(
            "/*\n * +import=marker\n *  second\n */\nvar x = 1 /* trailing */\n/* +one-line */\n",
            Language::Go,
        );

        assert_eq!(
            contents(&source),
            vec![vec!["", "+import=marker", "second", ""], vec!["+one-line"]]
        );
        let marker = &source.comment_blocks[0].lines[1];
        assert_eq!((marker.line_number, marker.column), (2, 4));
    }

    #[test]
    fn test_rust_doc_comments() {
        let source = parse_source("    /// +route:Path=\"/\"\n    fn f() {}\n", Language::Rust);
        assert_eq!(contents(&source), vec![vec!["+route:Path=\"/\""]]);
        assert_eq!(source.comment_blocks[0].lines[0].column, 9);
    }

    #[test]
    fn test_hash_comments() {
        let source = parse_source("# +deploy:Replicas=3\nprint(1)\n", Language::Python);
        assert_eq!(contents(&source), vec![vec!["+deploy:Replicas=3"]]);
    }

    #[test]
    fn test_marker_lines_need_a_name() {
        let block = CommentBlock {
            lines: ["+name", "+1 for this", "+", "text + more"]
                .iter()
                .enumerate()
                .map(|(idx, content)| CommentLine {
                    line_number: idx + 1,
                    column: 1,
                    content: content.to_string(),
                })
                .collect(),
            start_line: 1,
            end_line: 4,
        };
        let markers: Vec<_> = block.marker_lines().map(|l| l.content.as_str()).collect();
        assert_eq!(markers, vec!["+name"]);
    }

    #[test]
    fn test_unsupported_file() {
        let err = parse_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }
}

//! @ai:module:intent Character cursor with one-char lookahead over a literal span
//! @ai:module:layer domain
//! @ai:module:public_api Scanner
//! @ai:module:stateless false

/// @ai:intent Consumes a literal left to right, caching the next char
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    cursor: usize,
    lookahead: Option<char>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: 0,
            lookahead: text.chars().next(),
        }
    }

    /// @ai:intent Return the next char without consuming it
    /// @ai:effects pure
    pub fn peek(&self) -> Option<char> {
        self.lookahead
    }

    /// @ai:intent Consume and return the next char
    pub fn advance(&mut self) -> Option<char> {
        let current = self.lookahead?;
        self.cursor += current.len_utf8();
        self.lookahead = self.text[self.cursor..].chars().next();
        Some(current)
    }

    /// Consumes the next char only if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.lookahead == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.lookahead.is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// @ai:intent Consume chars while the predicate holds and return the consumed slice
    pub fn take_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'a str {
        let start = self.cursor;
        while self.lookahead.is_some_and(&mut predicate) {
            self.advance();
        }
        &self.text[start..self.cursor]
    }

    /// Byte offset of the next unconsumed char.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.lookahead.is_none()
    }

    /// The unconsumed remainder of the literal.
    pub fn rest(&self) -> &'a str {
        &self.text[self.cursor..]
    }

    pub fn source(&self) -> &'a str {
        self.text
    }

    /// @ai:intent Report whether `target` occurs at nesting depth one of the brace group at the cursor
    /// @ai:pre the cursor is on `{`
    /// @ai:post the cursor does not move
    /// @ai:edge_cases target inside quotes, backticks or nested braces is ignored
    /// @ai:effects pure
    pub fn has_top_level(&self, target: char) -> bool {
        let mut depth = 0usize;
        let mut chars = self.rest().chars();

        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    while let Some(inner) = chars.next() {
                        match inner {
                            '\\' => {
                                chars.next();
                            }
                            '"' => break,
                            _ => {}
                        }
                    }
                }
                '`' => {
                    for inner in chars.by_ref() {
                        if inner == '`' {
                            break;
                        }
                    }
                }
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                c if c == target && depth == 1 => return true,
                _ => {}
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.peek(), Some('a'));
        assert_eq!(scanner.peek(), Some('a'));
        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.peek(), Some('b'));
        assert_eq!(scanner.advance(), Some('b'));
        assert_eq!(scanner.peek(), None);
        assert_eq!(scanner.advance(), None);
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_skip_whitespace_and_take_while() {
        let mut scanner = Scanner::new("   123abc");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 3);
        assert_eq!(scanner.take_while(|c| c.is_ascii_digit()), "123");
        assert_eq!(scanner.rest(), "abc");
    }

    #[test]
    fn test_multibyte_positions() {
        let mut scanner = Scanner::new("ñx");
        scanner.advance();
        assert_eq!(scanner.position(), 2);
        assert!(scanner.eat('x'));
        assert!(!scanner.eat('x'));
    }

    #[test]
    fn test_has_top_level_colon() {
        assert!(Scanner::new("{a:1}").has_top_level(':'));
        assert!(!Scanner::new("{1,2}").has_top_level(':'));
        assert!(!Scanner::new("{{a:1},2}").has_top_level(':'));
        assert!(!Scanner::new("{\"a:b\",`c:d`}").has_top_level(':'));
        assert!(!Scanner::new("{1,2} , x:y").has_top_level(':'));
        assert!(Scanner::new("{\"k\\\"\":v}").has_top_level(':'));
    }
}

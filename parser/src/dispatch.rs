//! @ai:module:intent Parse argument literals into destinations, one grammar per descriptor kind
//! @ai:module:layer domain
//! @ai:module:public_api parse, parse_value, ArgumentTypeInfo::parse
//! @ai:module:depends_on argument, scanner, slot, value, error
//! @ai:module:stateless true

use crate::argument::{ArgumentType, ArgumentTypeInfo};
use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::shape::Shaped;
use crate::slot::{Rejection, Slot};
use crate::value::Value;

const ANY: ArgumentTypeInfo = ArgumentTypeInfo::scalar(ArgumentType::Any);

/// Structural delimiters that end a bare string.
const DELIMITERS: &[char] = &[',', ';', '}', ']'];
const KEY_DELIMITERS: &[char] = &[',', ';', '}', ']', ':'];

/// Syntactic position of the value being parsed.
///
/// It only matters for raw values, which need to know where they end, and
/// for bare `;` runs, which do not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    /// The whole literal belongs to this value.
    Root,
    /// Element of a `{...}` group or of a marker argument list.
    Group,
    /// Element of a bare `a;b;c` run.
    Run,
}

impl Frame {
    fn raw_terminators(self) -> &'static [char] {
        match self {
            Frame::Root => &[],
            Frame::Group => &[',', '}', ']'],
            Frame::Run => DELIMITERS,
        }
    }
}

/// @ai:intent Parse a complete literal into a destination
/// @ai:pre destination matches the shape the descriptor was classified from
/// @ai:post on Ok the whole literal was consumed
/// @ai:edge_cases on Err the destination may be partially written
/// @ai:example (Slice<SignedInteger>, "1;2;3", Vec<i32>) -> [1, 2, 3]
pub fn parse(
    info: &ArgumentTypeInfo,
    literal: &str,
    destination: &mut dyn Slot,
) -> Result<(), ParseError> {
    let mut scanner = Scanner::new(literal);
    info.parse(&mut scanner, destination)?;
    expect_end(&mut scanner)
}

/// @ai:intent Classify `T`, parse the literal into a fresh value and return it
/// @ai:post the caller never observes a partially written value
pub fn parse_value<T: Shaped + Slot + Default>(literal: &str) -> Result<T, ParseError> {
    let info = ArgumentTypeInfo::of::<T>()?;
    let mut value = T::default();
    parse(&info, literal, &mut value)?;
    Ok(value)
}

impl ArgumentTypeInfo {
    /// @ai:intent Run the grammar selected by this descriptor at the scanner position
    /// @ai:post trailing input after the value is left unconsumed
    pub fn parse(
        &self,
        scanner: &mut Scanner<'_>,
        destination: &mut dyn Slot,
    ) -> Result<(), ParseError> {
        self.parse_in(scanner, destination, Frame::Root)
    }

    pub(crate) fn parse_in(
        &self,
        scanner: &mut Scanner<'_>,
        destination: &mut dyn Slot,
        frame: Frame,
    ) -> Result<(), ParseError> {
        scanner.skip_whitespace();
        tracing::trace!(
            kind = %self.actual_type,
            position = scanner.position(),
            "parsing argument value"
        );

        match self.actual_type {
            ArgumentType::Bool => parse_bool(scanner, destination),
            ArgumentType::SignedInteger => parse_integer(scanner, destination, true),
            ArgumentType::UnsignedInteger => parse_integer(scanner, destination, false),
            ArgumentType::String => parse_string(scanner, destination),
            ArgumentType::Raw => parse_raw(scanner, destination, frame),
            ArgumentType::Slice => parse_slice(self.item_info()?, scanner, destination, frame),
            ArgumentType::Map => parse_map(self.item_info()?, scanner, destination),
            ArgumentType::Any => parse_any(scanner, destination, frame),
            ArgumentType::Invalid => Err(ParseError::UnsupportedType(self.to_string())),
        }
    }

    fn item_info(&self) -> Result<&ArgumentTypeInfo, ParseError> {
        self.item()
            .ok_or_else(|| ParseError::UnsupportedType(format!("{} without item type", self)))
    }
}

fn parse_bool(scanner: &mut Scanner<'_>, destination: &mut dyn Slot) -> Result<(), ParseError> {
    let start = scanner.position();
    let word = scanner.take_while(|c| c.is_alphanumeric() || c == '_');
    let value = match word {
        "true" => true,
        "false" => false,
        "" => return Err(ParseError::syntax("`true` or `false`", offending(scanner), start)),
        other => return Err(ParseError::syntax("`true` or `false`", other, start)),
    };
    store(destination.set_bool(value), word, start)
}

/// Decimal only: leading zeros never switch to octal.
fn parse_integer(
    scanner: &mut Scanner<'_>,
    destination: &mut dyn Slot,
    signed: bool,
) -> Result<(), ParseError> {
    let start = scanner.position();
    if scanner.peek() == Some('-') {
        if !signed {
            return Err(ParseError::syntax("unsigned integer", offending(scanner), start));
        }
        scanner.advance();
    }

    let digits_at = scanner.position();
    if scanner.take_while(|c| c.is_ascii_digit()).is_empty() {
        return Err(ParseError::syntax("decimal digits", offending(scanner), digits_at));
    }

    let literal = &scanner.source()[start..scanner.position()];
    if signed {
        let value = literal
            .parse::<i64>()
            .map_err(|_| overflow(literal, "i64", start))?;
        store(destination.set_signed(value), literal, start)
    } else {
        let value = literal
            .parse::<u64>()
            .map_err(|_| overflow(literal, "u64", start))?;
        store(destination.set_unsigned(value), literal, start)
    }
}

fn parse_string(scanner: &mut Scanner<'_>, destination: &mut dyn Slot) -> Result<(), ParseError> {
    let start = scanner.position();
    let value = read_string(scanner, DELIMITERS)?;
    store(destination.set_string(value), "", start)
}

fn parse_raw(
    scanner: &mut Scanner<'_>,
    destination: &mut dyn Slot,
    frame: Frame,
) -> Result<(), ParseError> {
    let start = scanner.position();
    let raw = match frame {
        Frame::Root => {
            let rest = scanner.rest();
            while scanner.advance().is_some() {}
            rest
        }
        Frame::Group | Frame::Run => read_balanced(scanner, frame.raw_terminators())?,
    };
    store(destination.set_raw(raw.as_bytes()), raw, start)
}

/// `{a,b,c}` or, outside of another run, `a;b;c`. Existing contents are dropped.
fn parse_slice(
    item: &ArgumentTypeInfo,
    scanner: &mut Scanner<'_>,
    destination: &mut dyn Slot,
    frame: Frame,
) -> Result<(), ParseError> {
    let start = scanner.position();
    destination
        .begin_slice()
        .map_err(|rejection| reject(rejection, "", start))?;

    if scanner.peek() == Some('{') {
        return parse_braced(scanner, |scanner| {
            let position = scanner.position();
            let slot = destination
                .push_item()
                .map_err(|rejection| reject(rejection, "", position))?;
            item.parse_in(scanner, slot, Frame::Group)
        });
    }

    if matches!(scanner.peek(), None | Some(',' | '}' | ']')) {
        return Ok(());
    }

    loop {
        let position = scanner.position();
        let slot = destination
            .push_item()
            .map_err(|rejection| reject(rejection, "", position))?;
        item.parse_in(scanner, slot, Frame::Run)?;

        scanner.skip_whitespace();
        if frame == Frame::Run || !scanner.eat(';') {
            return Ok(());
        }
    }
}

/// `{key:value,...}`. Keys always use the string grammar; a repeated key keeps the last value.
fn parse_map(
    item: &ArgumentTypeInfo,
    scanner: &mut Scanner<'_>,
    destination: &mut dyn Slot,
) -> Result<(), ParseError> {
    let start = scanner.position();
    if scanner.peek() != Some('{') {
        return Err(ParseError::syntax("`{`", offending(scanner), start));
    }
    destination
        .begin_map()
        .map_err(|rejection| reject(rejection, "", start))?;

    parse_braced(scanner, |scanner| {
        let key_position = scanner.position();
        let key = read_string(scanner, KEY_DELIMITERS)?;

        scanner.skip_whitespace();
        let colon_position = scanner.position();
        if !scanner.eat(':') {
            return Err(ParseError::syntax("`:`", offending(scanner), colon_position));
        }

        let slot = destination
            .map_entry(key)
            .map_err(|rejection| reject(rejection, "", key_position))?;
        item.parse_in(scanner, slot, Frame::Group)
    })
}

fn parse_any(
    scanner: &mut Scanner<'_>,
    destination: &mut dyn Slot,
    frame: Frame,
) -> Result<(), ParseError> {
    let start = scanner.position();
    let value = infer(scanner, frame)?;
    store(destination.set_value(value), "", start)
}

/// @ai:intent Infer a value from its lexical form, folding a trailing `;` run into a slice
fn infer(scanner: &mut Scanner<'_>, frame: Frame) -> Result<Value, ParseError> {
    let first = infer_element(scanner)?;
    if frame == Frame::Run {
        return Ok(first);
    }

    scanner.skip_whitespace();
    if scanner.peek() != Some(';') {
        return Ok(first);
    }

    let mut items = vec![first];
    while scanner.eat(';') {
        items.push(infer_element(scanner)?);
        scanner.skip_whitespace();
    }
    Ok(Value::Slice(items))
}

fn infer_element(scanner: &mut Scanner<'_>) -> Result<Value, ParseError> {
    scanner.skip_whitespace();
    let mut value = Value::Null;

    match scanner.peek() {
        Some('{') if scanner.has_top_level(':') => parse_map(&ANY, scanner, &mut value)?,
        Some('{') => parse_slice(&ANY, scanner, &mut value, Frame::Group)?,
        Some('"') => value = Value::String(read_quoted(scanner)?),
        Some('`') => value = Value::String(read_backtick(scanner)?),
        _ => {
            let position = scanner.position();
            let token = read_bare(scanner, DELIMITERS);
            value = infer_scalar(&token, position)?;
        }
    }

    Ok(value)
}

fn infer_scalar(token: &str, position: usize) -> Result<Value, ParseError> {
    match token {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ if is_integer_literal(token) => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| overflow(token, "i64", position)),
        _ => Ok(Value::String(token.to_string())),
    }
}

fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Runs `element` for each comma separated entry of a `{...}` group at the cursor.
fn parse_braced<'a>(
    scanner: &mut Scanner<'a>,
    mut element: impl FnMut(&mut Scanner<'a>) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    let start = scanner.position();
    let unterminated = ParseError::Unterminated {
        what: "brace group",
        position: start,
    };

    scanner.advance();
    scanner.skip_whitespace();
    if scanner.eat('}') {
        return Ok(());
    }

    loop {
        scanner.skip_whitespace();
        if scanner.is_at_end() {
            return Err(unterminated);
        }

        element(scanner)?;

        scanner.skip_whitespace();
        match scanner.peek() {
            Some(',') => {
                scanner.advance();
            }
            Some('}') => {
                scanner.advance();
                return Ok(());
            }
            None => return Err(unterminated),
            Some(_) => {
                let position = scanner.position();
                return Err(ParseError::syntax("`,` or `}`", offending(scanner), position));
            }
        }
    }
}

fn read_string(scanner: &mut Scanner<'_>, stops: &[char]) -> Result<String, ParseError> {
    match scanner.peek() {
        Some('"') => read_quoted(scanner),
        Some('`') => read_backtick(scanner),
        _ => Ok(read_bare(scanner, stops)),
    }
}

fn read_bare(scanner: &mut Scanner<'_>, stops: &[char]) -> String {
    scanner
        .take_while(|c| !stops.contains(&c))
        .trim()
        .to_string()
}

fn read_backtick(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    let start = scanner.position();
    scanner.advance();
    let body = scanner.take_while(|c| c != '`');
    if !scanner.eat('`') {
        return Err(ParseError::Unterminated {
            what: "backtick string",
            position: start,
        });
    }
    Ok(body.to_string())
}

fn read_quoted(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    let start = scanner.position();
    let unterminated = ParseError::Unterminated {
        what: "quoted string",
        position: start,
    };

    scanner.advance();
    let mut value = String::new();
    loop {
        match scanner.advance() {
            None => return Err(unterminated),
            Some('"') => return Ok(value),
            Some('\\') => {
                let position = scanner.position() - 1;
                let Some(escape) = scanner.advance() else {
                    return Err(unterminated);
                };
                value.push(read_escape(scanner, escape, position)?);
            }
            Some(c) => value.push(c),
        }
    }
}

fn read_escape(
    scanner: &mut Scanner<'_>,
    escape: char,
    position: usize,
) -> Result<char, ParseError> {
    let c = match escape {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'v' => '\u{0B}',
        '\\' | '"' | '\'' => escape,
        'x' => read_code_point(scanner, 2, position)?,
        'u' if scanner.eat('{') => {
            let hex = scanner.take_while(|c| c.is_ascii_hexdigit());
            if !scanner.eat('}') {
                return Err(ParseError::syntax(
                    "`}` closing \\u{...}",
                    offending(scanner),
                    position,
                ));
            }
            code_point(hex, position)?
        }
        'u' => read_code_point(scanner, 4, position)?,
        'U' => read_code_point(scanner, 8, position)?,
        other => {
            return Err(ParseError::syntax(
                "escape sequence",
                format!("\\{}", other),
                position,
            ))
        }
    };
    Ok(c)
}

fn read_code_point(
    scanner: &mut Scanner<'_>,
    digits: usize,
    position: usize,
) -> Result<char, ParseError> {
    let mut hex = String::with_capacity(digits);
    for _ in 0..digits {
        match scanner.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                hex.push(c);
                scanner.advance();
            }
            _ => {
                return Err(ParseError::syntax(
                    format!("{} hex digits", digits),
                    hex,
                    position,
                ))
            }
        }
    }
    code_point(&hex, position)
}

fn code_point(hex: &str, position: usize) -> Result<char, ParseError> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ParseError::syntax("unicode scalar value", hex, position))
}

/// Consumes up to the first terminator outside quotes and nested groups.
fn read_balanced<'a>(
    scanner: &mut Scanner<'a>,
    terminators: &[char],
) -> Result<&'a str, ParseError> {
    let start = scanner.position();
    let mut depth = 0usize;

    while let Some(c) = scanner.peek() {
        if depth == 0 && terminators.contains(&c) {
            break;
        }
        match c {
            '"' => {
                read_quoted(scanner)?;
                continue;
            }
            '`' => {
                read_backtick(scanner)?;
                continue;
            }
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        scanner.advance();
    }

    Ok(scanner.source()[start..scanner.position()].trim_end())
}

fn expect_end(scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
    scanner.skip_whitespace();
    if scanner.is_at_end() {
        return Ok(());
    }
    let position = scanner.position();
    Err(ParseError::syntax("end of input", offending(scanner), position))
}

/// Text of the token at the cursor, for diagnostics.
fn offending(scanner: &mut Scanner<'_>) -> String {
    let token = scanner.take_while(|c| !c.is_whitespace() && !DELIMITERS.contains(&c));
    if !token.is_empty() {
        return token.to_string();
    }
    match scanner.peek() {
        Some(c) => c.to_string(),
        None => "end of input".to_string(),
    }
}

fn overflow(literal: &str, target: &str, position: usize) -> ParseError {
    ParseError::Overflow {
        literal: literal.to_string(),
        target: target.to_string(),
        position,
    }
}

fn store(result: Result<(), Rejection>, literal: &str, position: usize) -> Result<(), ParseError> {
    result.map_err(|rejection| reject(rejection, literal, position))
}

fn reject(rejection: Rejection, literal: &str, position: usize) -> ParseError {
    match rejection {
        Rejection::Overflow { target } => overflow(literal, target, position),
        Rejection::Mismatch { destination, found } => ParseError::Mismatch {
            destination,
            found,
            position,
        },
    }
}

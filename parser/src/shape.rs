//! @ai:module:intent Describe destination types so they can be classified before parsing
//! @ai:module:layer domain
//! @ai:module:public_api TypeShape, Shaped
//! @ai:module:depends_on scanner, error
//! @ai:module:stateless true

use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// @ai:intent Structural description of a destination type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Bool,
    Signed(u32),
    Unsigned(u32),
    Float(u32),
    Char,
    String,
    /// Dynamically typed destination (`Value`).
    Interface,
    Slice(Box<TypeShape>),
    Map(Box<TypeShape>, Box<TypeShape>),
    Pointer(Box<TypeShape>),
    Struct(String),
    Function,
    Channel,
}

impl TypeShape {
    pub fn slice(item: TypeShape) -> Self {
        TypeShape::Slice(Box::new(item))
    }

    pub fn map(key: TypeShape, value: TypeShape) -> Self {
        TypeShape::Map(Box::new(key), Box::new(value))
    }

    pub fn pointer(inner: TypeShape) -> Self {
        TypeShape::Pointer(Box::new(inner))
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Bool => write!(f, "bool"),
            TypeShape::Signed(bits) => write!(f, "i{}", bits),
            TypeShape::Unsigned(bits) => write!(f, "u{}", bits),
            TypeShape::Float(bits) => write!(f, "f{}", bits),
            TypeShape::Char => write!(f, "char"),
            TypeShape::String => write!(f, "String"),
            TypeShape::Interface => write!(f, "any"),
            TypeShape::Slice(item) => write!(f, "Vec<{}>", item),
            TypeShape::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            TypeShape::Pointer(inner) => write!(f, "&{}", inner),
            TypeShape::Struct(name) => write!(f, "struct {}", name),
            TypeShape::Function => write!(f, "fn"),
            TypeShape::Channel => write!(f, "channel"),
        }
    }
}

/// @ai:intent Parse a textual type description such as `Vec<i32>` or `HashMap<String, any>`
/// @ai:example ("Vec<u8>") -> Slice(Unsigned(8))
/// @ai:example ("&bool") -> Pointer(Bool)
/// @ai:example ("Cookie") -> Struct("Cookie")
impl FromStr for TypeShape {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scanner = Scanner::new(s);
        let shape = parse_shape(&mut scanner)?;
        scanner.skip_whitespace();
        if let Some(c) = scanner.peek() {
            return Err(ParseError::syntax("end of type", c.to_string(), scanner.position()));
        }
        Ok(shape)
    }
}

fn parse_shape(scanner: &mut Scanner<'_>) -> Result<TypeShape, ParseError> {
    scanner.skip_whitespace();
    let start = scanner.position();

    if scanner.eat('&') || scanner.eat('*') {
        scanner.eat_keyword("mut");
        return Ok(TypeShape::pointer(parse_shape(scanner)?));
    }

    if scanner.eat('[') {
        // `[]T` (Go style) or `[T]`
        let shape = if scanner.eat(']') {
            parse_shape(scanner)?
        } else {
            let item = parse_shape(scanner)?;
            expect(scanner, ']')?;
            item
        };
        return Ok(TypeShape::slice(shape));
    }

    let name = scanner.take_while(|c| c.is_alphanumeric() || c == '_');
    if name.is_empty() {
        let found = scanner.peek().map(String::from).unwrap_or_default();
        return Err(ParseError::syntax("type name", found, start));
    }

    let shape = match name {
        "bool" => TypeShape::Bool,
        "i8" => TypeShape::Signed(8),
        "i16" => TypeShape::Signed(16),
        "i32" | "int32" | "rune" => TypeShape::Signed(32),
        "i64" | "int64" => TypeShape::Signed(64),
        "isize" | "int" => TypeShape::Signed(isize::BITS),
        "int8" => TypeShape::Signed(8),
        "int16" => TypeShape::Signed(16),
        "u8" | "uint8" | "byte" => TypeShape::Unsigned(8),
        "u16" | "uint16" => TypeShape::Unsigned(16),
        "u32" | "uint32" => TypeShape::Unsigned(32),
        "u64" | "uint64" => TypeShape::Unsigned(64),
        "usize" | "uint" => TypeShape::Unsigned(usize::BITS),
        "f32" | "float32" => TypeShape::Float(32),
        "f64" | "float64" => TypeShape::Float(64),
        "char" => TypeShape::Char,
        "String" | "string" | "str" => TypeShape::String,
        "any" | "Value" | "interface" => TypeShape::Interface,
        "Vec" => {
            expect(scanner, '<')?;
            let item = parse_shape(scanner)?;
            expect(scanner, '>')?;
            TypeShape::slice(item)
        }
        "Box" => {
            expect(scanner, '<')?;
            let inner = parse_shape(scanner)?;
            expect(scanner, '>')?;
            TypeShape::pointer(inner)
        }
        "HashMap" | "BTreeMap" | "Map" => {
            expect(scanner, '<')?;
            let key = parse_shape(scanner)?;
            expect(scanner, ',')?;
            let value = parse_shape(scanner)?;
            expect(scanner, '>')?;
            TypeShape::map(key, value)
        }
        "map" => {
            expect(scanner, '[')?;
            let key = parse_shape(scanner)?;
            expect(scanner, ']')?;
            TypeShape::map(key, parse_shape(scanner)?)
        }
        "fn" | "func" => TypeShape::Function,
        "chan" => TypeShape::Channel,
        other => TypeShape::Struct(other.to_string()),
    };

    Ok(shape)
}

fn expect(scanner: &mut Scanner<'_>, expected: char) -> Result<(), ParseError> {
    scanner.skip_whitespace();
    if scanner.eat(expected) {
        return Ok(());
    }
    let found = scanner.peek().map(String::from).unwrap_or_default();
    Err(ParseError::syntax(
        format!("`{}`", expected),
        found,
        scanner.position(),
    ))
}

impl Scanner<'_> {
    fn eat_keyword(&mut self, keyword: &str) {
        let rest = self.rest();
        if rest.starts_with(keyword)
            && rest[keyword.len()..].starts_with(char::is_whitespace)
        {
            for _ in 0..keyword.len() {
                self.advance();
            }
        }
    }
}

/// @ai:intent Static type description of a Rust type usable as a marker argument destination
pub trait Shaped {
    fn type_shape() -> TypeShape;
}

macro_rules! shaped {
    ($($ty:ty => $shape:expr),* $(,)?) => {
        $(
            impl Shaped for $ty {
                fn type_shape() -> TypeShape {
                    $shape
                }
            }
        )*
    };
}

shaped! {
    bool => TypeShape::Bool,
    i8 => TypeShape::Signed(8),
    i16 => TypeShape::Signed(16),
    i32 => TypeShape::Signed(32),
    i64 => TypeShape::Signed(64),
    isize => TypeShape::Signed(isize::BITS),
    u8 => TypeShape::Unsigned(8),
    u16 => TypeShape::Unsigned(16),
    u32 => TypeShape::Unsigned(32),
    u64 => TypeShape::Unsigned(64),
    usize => TypeShape::Unsigned(usize::BITS),
    f32 => TypeShape::Float(32),
    f64 => TypeShape::Float(64),
    char => TypeShape::Char,
    String => TypeShape::String,
    Value => TypeShape::Interface,
}

impl<T: Shaped> Shaped for Vec<T> {
    fn type_shape() -> TypeShape {
        TypeShape::slice(T::type_shape())
    }
}

impl<K: Shaped, V: Shaped, S> Shaped for HashMap<K, V, S> {
    fn type_shape() -> TypeShape {
        TypeShape::map(K::type_shape(), V::type_shape())
    }
}

impl<K: Shaped, V: Shaped> Shaped for BTreeMap<K, V> {
    fn type_shape() -> TypeShape {
        TypeShape::map(K::type_shape(), V::type_shape())
    }
}

impl<T: Shaped> Shaped for Box<T> {
    fn type_shape() -> TypeShape {
        TypeShape::pointer(T::type_shape())
    }
}

impl<T: Shaped> Shaped for &T {
    fn type_shape() -> TypeShape {
        TypeShape::pointer(T::type_shape())
    }
}

impl<T: Shaped> Shaped for &mut T {
    fn type_shape() -> TypeShape {
        TypeShape::pointer(T::type_shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shaped_containers() {
        assert_eq!(
            <HashMap<String, Vec<i32>>>::type_shape(),
            TypeShape::map(TypeShape::String, TypeShape::slice(TypeShape::Signed(32)))
        );
        assert_eq!(
            <&Vec<u8>>::type_shape(),
            TypeShape::pointer(TypeShape::slice(TypeShape::Unsigned(8)))
        );
    }

    #[test]
    fn test_parse_rust_style_descriptions() {
        assert_eq!("bool".parse::<TypeShape>().unwrap(), TypeShape::Bool);
        assert_eq!(
            "Vec<Vec<u8>>".parse::<TypeShape>().unwrap(),
            TypeShape::slice(TypeShape::slice(TypeShape::Unsigned(8)))
        );
        assert_eq!(
            "HashMap<String, any>".parse::<TypeShape>().unwrap(),
            TypeShape::map(TypeShape::String, TypeShape::Interface)
        );
        assert_eq!(
            "&mut Box<i16>".parse::<TypeShape>().unwrap(),
            TypeShape::pointer(TypeShape::pointer(TypeShape::Signed(16)))
        );
    }

    #[test]
    fn test_parse_go_style_descriptions() {
        assert_eq!(
            "[]interface".parse::<TypeShape>().unwrap(),
            TypeShape::slice(TypeShape::Interface)
        );
        assert_eq!(
            "map[string]int".parse::<TypeShape>().unwrap(),
            TypeShape::map(TypeShape::String, TypeShape::Signed(isize::BITS))
        );
        assert_eq!(
            "*Cookie".parse::<TypeShape>().unwrap(),
            TypeShape::pointer(TypeShape::Struct("Cookie".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("Vec<i32".parse::<TypeShape>().is_err());
        assert!("".parse::<TypeShape>().is_err());
        assert!("i32 i64".parse::<TypeShape>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let shape = TypeShape::map(TypeShape::String, TypeShape::slice(TypeShape::Interface));
        assert_eq!(shape.to_string(), "Map<String, Vec<any>>");
        assert_eq!(shape.to_string().parse::<TypeShape>().unwrap(), shape);
    }
}

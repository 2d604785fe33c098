//! @ai:module:intent Classify destination types into argument type descriptors
//! @ai:module:layer domain
//! @ai:module:public_api ArgumentType, ArgumentTypeInfo, classify
//! @ai:module:depends_on shape, error
//! @ai:module:stateless true

use crate::error::ParseError;
use crate::shape::{Shaped, TypeShape};
use serde::Serialize;
use std::fmt;

/// @ai:intent Grammar family selected for an argument destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentType {
    #[default]
    Invalid,
    Any,
    Bool,
    SignedInteger,
    UnsignedInteger,
    String,
    Raw,
    Slice,
    Map,
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentType::Invalid => "invalid",
            ArgumentType::Any => "any",
            ArgumentType::Bool => "bool",
            ArgumentType::SignedInteger => "signed integer",
            ArgumentType::UnsignedInteger => "unsigned integer",
            ArgumentType::String => "string",
            ArgumentType::Raw => "raw",
            ArgumentType::Slice => "slice",
            ArgumentType::Map => "map",
        };
        f.write_str(name)
    }
}

/// @ai:intent Immutable descriptor tree; containers own the descriptor of their items
/// @ai:invariant item_type is Some iff actual_type is Slice or Map
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ArgumentTypeInfo {
    pub actual_type: ArgumentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<ArgumentTypeInfo>>,
}

impl ArgumentTypeInfo {
    /// Descriptor for a non-container kind.
    pub const fn scalar(actual_type: ArgumentType) -> Self {
        Self {
            actual_type,
            item_type: None,
        }
    }

    pub fn slice_of(item: ArgumentTypeInfo) -> Self {
        Self {
            actual_type: ArgumentType::Slice,
            item_type: Some(Box::new(item)),
        }
    }

    pub fn map_of(item: ArgumentTypeInfo) -> Self {
        Self {
            actual_type: ArgumentType::Map,
            item_type: Some(Box::new(item)),
        }
    }

    /// @ai:intent Build the descriptor for a Rust type from its static shape
    /// @ai:example (Vec<i32>) -> Slice(SignedInteger)
    pub fn of<T: Shaped + ?Sized>() -> Result<Self, ParseError> {
        classify(&T::type_shape())
    }

    pub fn item(&self) -> Option<&ArgumentTypeInfo> {
        self.item_type.as_deref()
    }
}

impl fmt::Display for ArgumentTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item_type {
            Some(item) => write!(f, "{}<{}>", self.actual_type, item),
            None => write!(f, "{}", self.actual_type),
        }
    }
}

/// @ai:intent Classify a destination type, unwrapping at most one pointer level
/// @ai:pre none
/// @ai:post Ok descriptors satisfy the item_type invariant
/// @ai:example (Pointer(Slice(Unsigned(8)))) -> Raw
/// @ai:example (Map(Signed(64), Bool)) -> Err(UnsupportedType)
/// @ai:edge_cases Pointer(Pointer(T)) -> Err(UnsupportedType)
/// @ai:effects pure
pub fn classify(shape: &TypeShape) -> Result<ArgumentTypeInfo, ParseError> {
    let info = classify_direct(unwrap_pointer(shape)).map_err(|_| unsupported(shape))?;
    tracing::debug!(shape = %shape, descriptor = %info, "classified argument type");
    Ok(info)
}

fn classify_direct(shape: &TypeShape) -> Result<ArgumentTypeInfo, ParseError> {
    use ArgumentTypeInfo as Info;

    let info = match shape {
        TypeShape::Bool => Info::scalar(ArgumentType::Bool),
        TypeShape::Signed(_) => Info::scalar(ArgumentType::SignedInteger),
        TypeShape::Unsigned(_) => Info::scalar(ArgumentType::UnsignedInteger),
        TypeShape::String => Info::scalar(ArgumentType::String),
        TypeShape::Interface => Info::scalar(ArgumentType::Any),
        TypeShape::Slice(item) if **item == TypeShape::Unsigned(8) => {
            Info::scalar(ArgumentType::Raw)
        }
        TypeShape::Slice(item) => Info::slice_of(classify_direct(unwrap_pointer(item))?),
        TypeShape::Map(key, value) if **key == TypeShape::String => {
            Info::map_of(classify_direct(unwrap_pointer(value))?)
        }
        other => return Err(unsupported(other)),
    };

    Ok(info)
}

/// Items are classified like top-level types, so each level may be behind one pointer.
fn unwrap_pointer(shape: &TypeShape) -> &TypeShape {
    match shape {
        TypeShape::Pointer(inner) => inner.as_ref(),
        other => other,
    }
}

fn unsupported(shape: &TypeShape) -> ParseError {
    ParseError::UnsupportedType(shape.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, HashMap};

    struct Cookie;

    impl Shaped for Cookie {
        fn type_shape() -> TypeShape {
            TypeShape::Struct("Cookie".to_string())
        }
    }

    fn kind_of<T: Shaped>() -> ArgumentType {
        ArgumentTypeInfo::of::<T>().unwrap_or_default().actual_type
    }

    #[test]
    fn test_primitive_kinds() {
        assert_eq!(kind_of::<bool>(), ArgumentType::Bool);
        assert_eq!(kind_of::<i8>(), ArgumentType::SignedInteger);
        assert_eq!(kind_of::<i16>(), ArgumentType::SignedInteger);
        assert_eq!(kind_of::<i32>(), ArgumentType::SignedInteger);
        assert_eq!(kind_of::<i64>(), ArgumentType::SignedInteger);
        assert_eq!(kind_of::<isize>(), ArgumentType::SignedInteger);
        assert_eq!(kind_of::<u8>(), ArgumentType::UnsignedInteger);
        assert_eq!(kind_of::<u16>(), ArgumentType::UnsignedInteger);
        assert_eq!(kind_of::<u32>(), ArgumentType::UnsignedInteger);
        assert_eq!(kind_of::<u64>(), ArgumentType::UnsignedInteger);
        assert_eq!(kind_of::<usize>(), ArgumentType::UnsignedInteger);
        assert_eq!(kind_of::<String>(), ArgumentType::String);
        assert_eq!(kind_of::<Value>(), ArgumentType::Any);
    }

    #[test]
    fn test_pointer_is_transparent() {
        assert_eq!(kind_of::<&Vec<u8>>(), ArgumentType::Raw);
        assert_eq!(kind_of::<&Value>(), ArgumentType::Any);
        assert_eq!(kind_of::<Box<bool>>(), ArgumentType::Bool);
        assert_eq!(
            ArgumentTypeInfo::of::<&Vec<i32>>().unwrap(),
            ArgumentTypeInfo::of::<Vec<i32>>().unwrap()
        );
    }

    #[test]
    fn test_only_one_pointer_level_is_unwrapped() {
        let err = ArgumentTypeInfo::of::<&Box<bool>>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_container_items() {
        let info = ArgumentTypeInfo::of::<Vec<bool>>().unwrap();
        assert_eq!(info.actual_type, ArgumentType::Slice);
        assert_eq!(info.item().unwrap().actual_type, ArgumentType::Bool);

        let info = ArgumentTypeInfo::of::<Vec<Value>>().unwrap();
        assert_eq!(info.item().unwrap().actual_type, ArgumentType::Any);

        let info = ArgumentTypeInfo::of::<HashMap<String, isize>>().unwrap();
        assert_eq!(info.actual_type, ArgumentType::Map);
        assert_eq!(info.item().unwrap().actual_type, ArgumentType::SignedInteger);

        let info = ArgumentTypeInfo::of::<BTreeMap<String, Value>>().unwrap();
        assert_eq!(info.item().unwrap().actual_type, ArgumentType::Any);

        let info = ArgumentTypeInfo::of::<Vec<Vec<u8>>>().unwrap();
        assert_eq!(info, ArgumentTypeInfo::slice_of(ArgumentTypeInfo::scalar(ArgumentType::Raw)));
    }

    #[test]
    fn test_pointer_items_are_unwrapped() {
        assert_eq!(
            ArgumentTypeInfo::of::<Vec<Box<i32>>>().unwrap(),
            ArgumentTypeInfo::slice_of(ArgumentTypeInfo::scalar(ArgumentType::SignedInteger))
        );
        assert_eq!(
            ArgumentTypeInfo::of::<HashMap<String, Box<bool>>>().unwrap(),
            ArgumentTypeInfo::map_of(ArgumentTypeInfo::scalar(ArgumentType::Bool))
        );

        let err = ArgumentTypeInfo::of::<Vec<&Box<i32>>>().unwrap_err();
        assert_eq!(err, ParseError::UnsupportedType("Vec<&&i32>".to_string()));
    }

    #[test]
    fn test_item_matches_element_classification() {
        let element = ArgumentTypeInfo::of::<HashMap<String, Vec<u16>>>().unwrap();
        let container = ArgumentTypeInfo::of::<Vec<HashMap<String, Vec<u16>>>>().unwrap();
        assert_eq!(container.item(), Some(&element));
    }

    #[test]
    fn test_unsupported_shapes() {
        let err = ArgumentTypeInfo::of::<&Cookie>().unwrap_err();
        assert_eq!(err, ParseError::UnsupportedType("&struct Cookie".to_string()));
        assert_eq!(
            ArgumentTypeInfo::of::<&Cookie>().unwrap_or_default().actual_type,
            ArgumentType::Invalid
        );

        for shape in [
            TypeShape::map(TypeShape::Signed(64), TypeShape::Bool),
            TypeShape::slice(TypeShape::Struct("Cookie".to_string())),
            TypeShape::Float(64),
            TypeShape::Char,
            TypeShape::Function,
            TypeShape::Channel,
        ] {
            let err = classify(&shape).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedType, "{}", shape);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let shape: TypeShape = "HashMap<String, Vec<any>>".parse().unwrap();
        assert_eq!(classify(&shape).unwrap(), classify(&shape).unwrap());
    }

    #[test]
    fn test_display() {
        let info = ArgumentTypeInfo::of::<Vec<HashMap<String, bool>>>().unwrap();
        assert_eq!(info.to_string(), "slice<map<bool>>");
    }
}

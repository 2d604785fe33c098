//! @ai:module:intent Typed argument schemas for known markers
//! @ai:module:layer domain
//! @ai:module:public_api ArgumentDefinition, Definition, Registry, check_bounds
//! @ai:module:depends_on argument, shape, error

use crate::argument::{classify, ArgumentTypeInfo};
use crate::error::ParseError;
use crate::shape::{Shaped, TypeShape};
use crate::value::Value;
use serde::Serialize;
use std::collections::HashMap;

/// @ai:intent One named argument of a marker with its classified type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentDefinition {
    pub name: String,
    pub type_info: ArgumentTypeInfo,
    pub required: bool,
    /// Declared destination type; integer widths are checked against it.
    #[serde(skip)]
    pub shape: Option<TypeShape>,
}

impl ArgumentDefinition {
    /// @ai:intent Reject integers that parsed fine but do not fit the declared width
    /// @ai:pre value was parsed with this argument's descriptor
    /// @ai:effects pure
    pub fn check_bounds(&self, value: &Value, position: usize) -> Result<(), ParseError> {
        match &self.shape {
            Some(shape) => check_bounds(shape, value, position),
            None => Ok(()),
        }
    }
}

/// @ai:intent Check the integers inside `value` against the widths declared by `shape`
/// @ai:example (Unsigned(8), Int(300)) -> Err(Overflow)
pub fn check_bounds(shape: &TypeShape, value: &Value, position: usize) -> Result<(), ParseError> {
    let fits = match (shape, value) {
        (TypeShape::Pointer(inner), _) => return check_bounds(inner, value, position),
        (TypeShape::Slice(item), Value::Slice(items)) => {
            return items
                .iter()
                .try_for_each(|item_value| check_bounds(item, item_value, position));
        }
        (TypeShape::Map(_, item), Value::Map(entries)) => {
            return entries
                .values()
                .try_for_each(|item_value| check_bounds(item, item_value, position));
        }
        (TypeShape::Signed(0) | TypeShape::Unsigned(0), Value::Int(_) | Value::Uint(_)) => false,
        (TypeShape::Signed(_), Value::Uint(_)) => false,
        (TypeShape::Signed(bits), Value::Int(i)) if *bits < 64 => {
            let max = (1i64 << (bits - 1)) - 1;
            (-max - 1..=max).contains(i)
        }
        (TypeShape::Unsigned(bits), Value::Uint(_)) => *bits >= 64,
        (TypeShape::Unsigned(bits), Value::Int(i)) if *bits < 64 => {
            *i >= 0 && *i < (1i64 << bits)
        }
        _ => true,
    };

    if fits {
        return Ok(());
    }
    Err(ParseError::Overflow {
        literal: value.to_string(),
        target: shape.to_string(),
        position,
    })
}

/// @ai:intent A marker name and the arguments it accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub arguments: Vec<ArgumentDefinition>,
}

impl Definition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// @ai:intent Add an argument whose destination type is the Rust type `T`
    /// @ai:post Err(UnsupportedType) when `T` cannot be classified
    /// @ai:example Definition::new("route").argument::<Vec<String>>("Methods", false)
    pub fn argument<T: Shaped + ?Sized>(
        self,
        name: impl Into<String>,
        required: bool,
    ) -> Result<Self, ParseError> {
        self.with_shape(name, T::type_shape(), required)
    }

    /// @ai:intent Add an argument from a type description such as one read from configuration
    pub fn with_shape(
        mut self,
        name: impl Into<String>,
        shape: TypeShape,
        required: bool,
    ) -> Result<Self, ParseError> {
        let type_info = classify(&shape)?;
        self = self.with_argument(name, type_info, required);
        if let Some(last) = self.arguments.last_mut() {
            last.shape = Some(shape);
        }
        Ok(self)
    }

    /// Adds an argument from an already classified descriptor. A later
    /// argument with the same name replaces the earlier one.
    pub fn with_argument(
        mut self,
        name: impl Into<String>,
        type_info: ArgumentTypeInfo,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.arguments.retain(|arg| arg.name != name);
        self.arguments.push(ArgumentDefinition {
            name,
            type_info,
            required,
            shape: None,
        });
        self
    }

    pub fn find_argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// @ai:intent Set of definitions consulted while parsing marker lines
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: HashMap<String, Definition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Register a definition, returning the one it replaced
    /// @ai:effects mutates self
    pub fn register(&mut self, definition: Definition) -> Option<Definition> {
        tracing::debug!(
            marker = %definition.name,
            arguments = definition.arguments.len(),
            "registered marker definition"
        );
        self.definitions.insert(definition.name.clone(), definition)
    }

    pub fn lookup(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        let mut definitions: Vec<_> = self.definitions.values().collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions.into_iter()
    }
}

//! @ai:module:intent Load marker definitions from a TOML file
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkersConfig, MarkerConfig, ArgumentConfig
//! @ai:module:depends_on definition, argument, shape, error
//! @ai:module:stateless true

use crate::definition::{Definition, Registry};
use crate::error::{Error, Result};
use crate::shape::TypeShape;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Top-level contents of a markers configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkersConfig {
    #[serde(default)]
    pub markers: Vec<MarkerConfig>,
}

/// @ai:intent One `[[markers]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentConfig>,
}

/// @ai:intent One `[[markers.arguments]]` table; the type is a textual type description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentConfig {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
}

fn default_type() -> String {
    "any".to_string()
}

impl MarkersConfig {
    /// @ai:intent Read and parse a configuration file
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(
            path = %path.display(),
            markers = config.markers.len(),
            "loaded marker configuration"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// @ai:intent Classify every argument type and build the registry
    /// @ai:post Err(Argument(UnsupportedType)) if any type cannot be classified
    /// @ai:example (type = "Vec<i32>") -> Slice(SignedInteger)
    pub fn into_registry(self) -> Result<Registry> {
        let mut registry = Registry::new();

        for marker in self.markers {
            let mut definition = Definition::new(marker.name);
            if let Some(description) = marker.description {
                definition = definition.description(description);
            }

            for argument in marker.arguments {
                let shape: TypeShape = argument.type_name.parse()?;
                definition = definition.with_shape(argument.name, shape, argument.required)?;
            }

            if registry.lookup(&definition.name).is_some() {
                tracing::warn!(marker = %definition.name, "marker defined twice, keeping the last");
            }
            registry.register(definition);
        }

        Ok(registry)
    }
}

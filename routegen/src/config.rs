//! Generator configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! runtime_path = "::route_runtime"
//! payload_field = "extra"
//! navigator_key_field = "NAVIGATOR_KEY"
//! parent_navigator_key_field = "PARENT_NAVIGATOR_KEY"
//! navigator_key_types = ["NavigatorKey"]
//! query_key_style = "kebab"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_NAVIGATOR_KEY_FIELD, DEFAULT_NAVIGATOR_KEY_TYPES, DEFAULT_PARENT_NAVIGATOR_KEY_FIELD,
    DEFAULT_PAYLOAD_FIELD, DEFAULT_RUNTIME_PATH,
};
use crate::naming::{is_identifier, kebab_case};

/// Failure to load or validate a [`GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has unknown keys.
    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// `runtime_path` does not parse as a path.
    #[error("runtime_path '{0}' is not a valid Rust path")]
    InvalidRuntimePath(String),

    /// A name-valued setting is not an identifier.
    #[error("{field} '{value}' is not a valid identifier")]
    InvalidIdentifier {
        /// The setting.
        field: &'static str,
        /// Its rejected value.
        value: String,
    },
}

/// How query-string keys are derived from parameter names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKeyStyle {
    /// `pageSize` / `page_size` -> `page-size`.
    #[default]
    Kebab,
    /// The parameter name unchanged.
    Verbatim,
}

/// Knobs shared by the tree builder, the emitter and the helper catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Path of the navigation runtime crate used by emitted code.
    pub runtime_path: String,
    /// Constructor parameter treated as the opaque payload.
    pub payload_field: String,
    /// Associated constant holding a shell route's own navigator key.
    pub navigator_key_field: String,
    /// Associated constant pinning a route to an ancestor navigator.
    pub parent_navigator_key_field: String,
    /// Type names accepted as navigator keys.
    pub navigator_key_types: Vec<String>,
    /// Query-string key derivation.
    pub query_key_style: QueryKeyStyle,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            payload_field: DEFAULT_PAYLOAD_FIELD.to_string(),
            navigator_key_field: DEFAULT_NAVIGATOR_KEY_FIELD.to_string(),
            parent_navigator_key_field: DEFAULT_PARENT_NAVIGATOR_KEY_FIELD.to_string(),
            navigator_key_types: DEFAULT_NAVIGATOR_KEY_TYPES
                .iter()
                .map(ToString::to_string)
                .collect(),
            query_key_style: QueryKeyStyle::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every name can appear in emitted code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.runtime()?;
        for (field, value) in [
            ("payload_field", &self.payload_field),
            ("navigator_key_field", &self.navigator_key_field),
            ("parent_navigator_key_field", &self.parent_navigator_key_field),
        ] {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidIdentifier {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// The runtime crate path as a parsed `syn::Path`.
    pub fn runtime(&self) -> Result<syn::Path, ConfigError> {
        syn::parse_str(&self.runtime_path)
            .map_err(|_| ConfigError::InvalidRuntimePath(self.runtime_path.clone()))
    }

    /// Query-string key for a parameter name.
    pub fn query_key(&self, parameter: &str) -> String {
        match self.query_key_style {
            QueryKeyStyle::Kebab => kebab_case(parameter),
            QueryKeyStyle::Verbatim => parameter.to_string(),
        }
    }

    /// Whether a static field type counts as a navigator key.
    pub fn is_navigator_key_type(&self, type_name: &str) -> bool {
        self.navigator_key_types.iter().any(|t| t == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            runtime_path = "crate::nav"
            query_key_style = "verbatim"
            "#,
        )
        .unwrap();
        assert_eq!(config.runtime_path, "crate::nav");
        assert_eq!(config.query_key_style, QueryKeyStyle::Verbatim);
        assert_eq!(config.payload_field, "extra");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GeneratorConfig::from_toml_str("runtime = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_invalid_runtime_path() {
        let err = GeneratorConfig::from_toml_str("runtime_path = \"not a path\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRuntimePath(_)));
    }

    #[test]
    fn test_invalid_payload_field() {
        let err = GeneratorConfig::from_toml_str("payload_field = \"$extra\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidIdentifier {
                field: "payload_field",
                ..
            }
        ));
    }

    #[test]
    fn test_query_key_styles() {
        let mut config = GeneratorConfig::default();
        assert_eq!(config.query_key("pageSize"), "page-size");
        config.query_key_style = QueryKeyStyle::Verbatim;
        assert_eq!(config.query_key("pageSize"), "pageSize");
    }

    #[test]
    fn test_navigator_key_type() {
        let config = GeneratorConfig::default();
        assert!(config.is_navigator_key_type("NavigatorKey"));
        assert!(!config.is_navigator_key_type("String"));
    }
}

//! Input document and configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use routegen::{GeneratorConfig, RouteDeclaration, TypeCatalog};
use serde::Deserialize;
use tracing::debug;

/// Config file picked up next to the input when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "routegen.toml";

/// What the host build pipeline hands over: type metadata and declarations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDocument {
    pub types: TypeCatalog,
    #[serde(default)]
    pub declarations: Vec<RouteDeclaration>,
}

impl InputDocument {
    pub fn parse(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("input is not a valid route document")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display()))?;
        let document = Self::parse(&source)
            .with_context(|| format!("failed to parse input {}", path.display()))?;
        debug!(
            types = document.types.len(),
            declarations = document.declarations.len(),
            "loaded input"
        );
        Ok(document)
    }
}

/// The config file to use: the explicit one, else `routegen.toml` beside the input.
pub fn config_path(input: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let beside = input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_CONFIG_FILE);
    beside.is_file().then_some(beside)
}

pub fn load_config(input: &Path, explicit: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = config_path(input, explicit) else {
        debug!("no config file, using defaults");
        return Ok(GeneratorConfig::default());
    };

    let source = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = GeneratorConfig::from_toml_str(&source)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"{
        "types": [{"name": "HomeRoute", "kind": "struct"}],
        "declarations": [
            {"type_name": "HomeRoute", "annotation": {"kind": "go_route", "type": "HomeRoute", "path": "/"}}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let document = InputDocument::parse(DOCUMENT).unwrap();
        assert_eq!(document.types.len(), 1);
        assert_eq!(document.declarations.len(), 1);
        assert_eq!(document.declarations[0].type_name, "HomeRoute");
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = InputDocument::parse(r#"{"types": [], "routes": []}"#).unwrap_err();
        assert!(format!("{err:#}").contains("routes"));
    }

    #[test]
    fn test_declarations_default_empty() {
        let document = InputDocument::parse(r#"{"types": []}"#).unwrap();
        assert!(document.declarations.is_empty());
    }

    #[test]
    fn test_load_missing_input_names_path() {
        let err = InputDocument::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_explicit_config_wins() {
        let path = config_path(Path::new("a/in.json"), Some(Path::new("b/custom.toml")));
        assert_eq!(path, Some(PathBuf::from("b/custom.toml")));
    }

    #[test]
    fn test_no_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("in.json"), None).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_config_beside_input() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "payload_field = \"data\"\n").unwrap();
        let config = load_config(&dir.path().join("in.json"), None).unwrap();
        assert_eq!(config.payload_field, "data");
    }

    #[test]
    fn test_invalid_config_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "no_such_key = 1\n").unwrap();
        let err = load_config(&dir.path().join("in.json"), Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}

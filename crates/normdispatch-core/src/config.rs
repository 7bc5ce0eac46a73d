//! Configuration schema (normdispatch.toml)

use serde::{Deserialize, Serialize};
use crate::NORMALIZATION_VERSION;

/// Normalization settings applied to every resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationSettings {
    /// Normalization version requested when composing references
    #[serde(default = "default_version")]
    pub version: String,

    /// Normalization image named by the deployment, checked for drift only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn default_version() -> String {
    NORMALIZATION_VERSION.to_string()
}

impl Default for NormalizationSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            image: None,
        }
    }
}

/// A destination connector definition as published in a definitions file
///
/// Accepts both the snake_case keys used in `normdispatch.toml` and the
/// camelCase keys of JSON definition catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDefinition {
    /// Connector repository, e.g. `airbyte/destination-postgres`
    #[serde(alias = "dockerRepository")]
    pub docker_repository: String,

    /// Connector tag
    #[serde(default, alias = "dockerImageTag", skip_serializing_if = "Option::is_none")]
    pub docker_image_tag: Option<String>,

    /// Normalization image the definition expects to run with
    #[serde(default, alias = "normalizationImage", skip_serializing_if = "Option::is_none")]
    pub normalization_image: Option<String>,
}

impl DestinationDefinition {
    /// Create a definition for a bare repository
    pub fn new(docker_repository: impl Into<String>) -> Self {
        Self {
            docker_repository: docker_repository.into(),
            docker_image_tag: None,
            normalization_image: None,
        }
    }

    /// Set the connector tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.docker_image_tag = Some(tag.into());
        self
    }

    /// Set the expected normalization image
    pub fn with_normalization_image(mut self, image: impl Into<String>) -> Self {
        self.normalization_image = Some(image.into());
        self
    }

    /// Full connector image (`repository[:tag]`)
    pub fn connector_image(&self) -> String {
        match &self.docker_image_tag {
            Some(tag) => format!("{}:{}", self.docker_repository, tag),
            None => self.docker_repository.clone(),
        }
    }

    /// Load a JSON array of definitions
    pub fn load_all(path: &std::path::Path) -> Result<Vec<Self>, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::parse_all(&contents)
    }

    /// Parse a JSON array of definitions
    pub fn parse_all(json: &str) -> Result<Vec<Self>, ConfigError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Normalization settings
    #[serde(default)]
    pub normalization: NormalizationSettings,

    /// Destination definitions to check against the mapping table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<DestinationDefinition>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.normalization.version, "0.2.25");
        assert_eq!(config.normalization.image, None);
        assert!(config.destinations.is_empty());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_destinations() {
        let config = Config::from_toml(
            r#"
            [normalization]
            version = "0.2.24"
            image = "airbyte/normalization:0.2.24"

            [[destinations]]
            docker_repository = "airbyte/destination-postgres"
            docker_image_tag = "1.2.3"
            normalization_image = "airbyte/normalization:0.2.24"

            [[destinations]]
            docker_repository = "airbyte/destination-snowflake"
            "#,
        )
        .unwrap();

        assert_eq!(config.normalization.version, "0.2.24");
        assert_eq!(config.normalization.image.as_deref(), Some("airbyte/normalization:0.2.24"));
        assert_eq!(
            config.destinations,
            vec![
                DestinationDefinition::new("airbyte/destination-postgres")
                    .with_tag("1.2.3")
                    .with_normalization_image("airbyte/normalization:0.2.24"),
                DestinationDefinition::new("airbyte/destination-snowflake"),
            ]
        );
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Config::from_toml("[normalization\nversion =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.destinations.push(DestinationDefinition::new("airbyte/destination-tidb"));
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn save_and_reload_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("normdispatch.toml");

        let mut config = Config::default();
        config.normalization.image = Some("airbyte/normalization:0.2.25".to_string());
        config.destinations.push(
            DestinationDefinition::new("airbyte/destination-mssql")
                .with_tag("0.1.22")
                .with_normalization_image("airbyte/normalization-mssql:0.2.25"),
        );

        config.save_to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn load_definitions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("destinations.json");
        std::fs::write(
            &path,
            r#"[{"dockerRepository": "airbyte/destination-redshift", "dockerImageTag": "0.3.46"}]"#,
        )
        .unwrap();

        let definitions = DestinationDefinition::load_all(&path).unwrap();
        assert_eq!(
            definitions,
            vec![DestinationDefinition::new("airbyte/destination-redshift").with_tag("0.3.46")]
        );
    }

    #[test]
    fn missing_definitions_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        match DestinationDefinition::load_all(&path).unwrap_err() {
            ConfigError::IoError(message) => assert!(message.contains("nope.json")),
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn malformed_definitions_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("destinations.json");
        std::fs::write(&path, r#"{"dockerRepository": "not-an-array"}"#).unwrap();

        let err = DestinationDefinition::load_all(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn json_definitions_use_camel_case_keys() {
        let definitions = DestinationDefinition::parse_all(
            r#"[
                {"dockerRepository": "airbyte/destination-mysql", "dockerImageTag": "0.1.20",
                 "normalizationImage": "airbyte/normalization-mysql:0.2.25"},
                {"dockerRepository": "airbyte/destination-oracle"}
            ]"#,
        )
        .unwrap();

        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].connector_image(), "airbyte/destination-mysql:0.1.20");
        assert_eq!(definitions[1].connector_image(), "airbyte/destination-oracle");
        assert_eq!(definitions[1].normalization_image, None);
    }
}

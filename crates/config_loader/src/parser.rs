//! Configuration parsing
//!
//! YAML (the historical `config.yml`), TOML and JSON are accepted.

use contracts::{CollectorConfig, ContractError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse YAML configuration
pub fn parse_yaml(content: &str) -> Result<CollectorConfig, ContractError> {
    serde_yaml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("YAML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<CollectorConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<CollectorConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<CollectorConfig, ContractError> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

//! Configuration parsing module
//!
//! Supports TOML (primary) and JSON (alternate) formats.

use contracts::{ConfigError, PipelineBlueprint};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a TOML-format blueprint
pub fn parse_toml(content: &str) -> Result<PipelineBlueprint, ConfigError> {
    toml::from_str(content)
        .map_err(|e| ConfigError::parse(format!("TOML parse error: {e}")))
}

/// Parse a JSON-format blueprint
pub fn parse_json(content: &str) -> Result<PipelineBlueprint, ConfigError> {
    serde_json::from_str(content)
        .map_err(|e| ConfigError::parse(format!("JSON parse error: {e}")))
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineBlueprint, ConfigError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[sync]
output_hz = 100
drain_per_tick_limit = 20

[[sync.sensor_map]]
sensor_id = 0
side = "left"
placement = "thigh"

[[sync.sensor_map]]
sensor_id = 1
side = "left"
placement = "shin"

[[sinks]]
name = "log_sink"
sink_type = "log"
"#;

    #[test]
    fn parse_toml_minimal() {
        let result = parse_toml(MINIMAL_TOML);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.sync.output_hz, 100);
        assert_eq!(bp.sync.sensor_map.len(), 2);
    }

    #[test]
    fn parse_json_minimal() {
        let content = r#"{
            "sync": {
                "output_hz": 100,
                "drain_per_tick_limit": 20,
                "sensor_map": [
                    {"sensor_id": 0, "side": "left", "placement": "thigh"},
                    {"sensor_id": 1, "side": "left", "placement": "shin"}
                ]
            },
            "sinks": [{"name": "log", "sink_type": "log"}]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse { .. }));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}

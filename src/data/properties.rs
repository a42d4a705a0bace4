//! Operator property definitions with defaults from operator.json
//!
//! This module parses operator.json (embedded at compile time) to extract property
//! definitions and their default values, so defaults are defined in ONE place.
//! User overrides come from a flat JSON object (`operator_config.json`) or from
//! command-line flags, and are validated against the definitions on read.

use super::colors::{parse_hex_color, Rgba};
use super::error::{PairplotError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Operator.json embedded at compile time
const OPERATOR_JSON: &str = include_str!("../../operator.json");

/// Property definition from operator.json
#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub default_value: String,
    pub description: String,
    /// For EnumeratedProperty, the valid values
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    String,
    Enumerated,
}

/// Registry of all operator properties with their defaults from operator.json
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse an operator.json document and build the registry
    pub fn from_json(json: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(json)?;

        let properties_array = json["properties"]
            .as_array()
            .ok_or_else(|| PairplotError::Config("missing 'properties' array".to_string()))?;

        let mut properties = HashMap::new();

        for prop in properties_array {
            let name = prop["name"]
                .as_str()
                .ok_or_else(|| PairplotError::Config("property missing 'name'".to_string()))?
                .to_string();

            let kind = match prop["kind"].as_str() {
                Some("StringProperty") => PropertyKind::String,
                Some("EnumeratedProperty") => PropertyKind::Enumerated,
                other => {
                    return Err(PairplotError::Config(format!(
                        "Unknown kind {:?} for property '{}'",
                        other, name
                    )))
                }
            };

            let default_value = prop["defaultValue"].as_str().unwrap_or("").to_string();
            let description = prop["description"].as_str().unwrap_or("").to_string();

            let valid_values = if kind == PropertyKind::Enumerated {
                prop["values"].as_array().map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(|s| s.to_string()))
                        .collect()
                })
            } else {
                None
            };

            properties.insert(
                name.clone(),
                PropertyDef {
                    name,
                    kind,
                    default_value,
                    description,
                    valid_values,
                },
            );
        }

        Ok(Self { properties })
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    /// Get the property definition
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true) // Non-enumerated properties accept any value
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(|| {
        PropertyRegistry::from_json(OPERATOR_JSON).unwrap_or_else(|e| {
            warn!("Failed to load operator.json: {}", e);
            PropertyRegistry::default()
        })
    })
}

/// Typed property reader
///
/// Returns the user-set value when present and valid, otherwise the default from
/// operator.json. Invalid user values are logged and replaced by the default.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with no overrides (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a flat JSON object, e.g. `{"data.rows": 200}`
    ///
    /// Strings, numbers and booleans are accepted; nested values are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut reader = Self::new();
        for (key, value) in map {
            let value_str = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    warn!("Skipping non-scalar value for property '{}': {}", key, other);
                    continue;
                }
            };
            reader.set(key, value_str);
        }

        Ok(reader)
    }

    /// Load overrides from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Set an override. Empty values mean "not set".
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if registry().get_property(&name).is_none() {
            warn!("Unknown property '{}' will be ignored", name);
        }
        if value.is_empty() {
            self.user_values.remove(&name);
        } else {
            self.user_values.insert(name, value);
        }
    }

    fn default_of(name: &str) -> &'static str {
        registry().get_default(name).unwrap_or("")
    }

    /// Get string property (user value or default from operator.json)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        Self::default_of(name).to_string()
    }

    /// Get enumerated property with validation
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = Self::default_of(name);

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value, name, valid_values, default
            );
        }

        default.to_string()
    }

    /// Get f64 property, falling back to the default on parse errors
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = Self::default_of(name).parse::<f64>().unwrap_or(0.0);

        let Some(value) = self.user_values.get(name) else {
            return default;
        };

        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(
                    "Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value, name, default
                );
                default
            }
        }
    }

    /// Get f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        let default = Self::default_of(name).parse::<f64>().unwrap_or(min);

        if (min..=max).contains(&value) {
            value
        } else {
            warn!(
                "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                value, name, min, max, default
            );
            default
        }
    }

    /// Get u64 property, falling back to the default on parse errors
    pub fn get_u64(&self, name: &str) -> u64 {
        let default = Self::default_of(name).parse::<u64>().unwrap_or(0);

        let Some(value) = self.user_values.get(name) else {
            return default;
        };

        value.trim().parse::<u64>().unwrap_or_else(|_| {
            warn!(
                "Invalid integer value '{}' for property '{}'. Using default: {}",
                value, name, default
            );
            default
        })
    }

    /// Get usize property with range validation
    pub fn get_usize_in_range(&self, name: &str, min: usize, max: usize) -> usize {
        let default = Self::default_of(name).parse::<usize>().unwrap_or(min);
        let value = self.get_u64(name) as usize;

        if (min..=max).contains(&value) {
            value
        } else {
            warn!(
                "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                value, name, min, max, default
            );
            default
        }
    }

    /// Get a comma separated list (entries trimmed, empty entries dropped)
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.get_string(name)
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// Get a hex color property
    pub fn get_color(&self, name: &str) -> Rgba {
        let parse = |s: &str| parse_hex_color(s).map(|[r, g, b]| Rgba::rgb(r, g, b));

        let value = self.get_string(name);
        parse(&value).unwrap_or_else(|| {
            let default = Self::default_of(name);
            warn!(
                "Invalid color '{}' for property '{}'. Using default: '{}'",
                value, name, default
            );
            parse(default).unwrap_or(Rgba::BLACK)
        })
    }

    /// Log every effective property value at debug level
    pub fn log_effective_values(&self) {
        let mut names: Vec<&String> = registry().properties.keys().collect();
        names.sort();
        for name in names {
            let source = if self.user_values.contains_key(name.as_str()) {
                "user"
            } else {
                "default"
            };
            debug!("property '{}' = '{}' ({})", name, self.get_string(name), source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let reg = registry();
        assert!(reg.get_property("data.seed").is_some());
        assert!(reg.get_property("point.color").is_some());
        assert!(reg.get_property("output.format").is_some());
    }

    #[test]
    fn test_registry_defaults() {
        let reg = registry();
        assert_eq!(reg.get_default("data.seed"), Some("42"));
        assert_eq!(reg.get_default("data.rows"), Some("100"));
        assert_eq!(reg.get_default("corr.decimals"), Some("3"));
        assert_eq!(reg.get_default("output.format"), Some("png"));
    }

    #[test]
    fn test_enum_validation() {
        let reg = registry();
        assert!(reg.is_valid_enum_value("output.format", "png"));
        assert!(reg.is_valid_enum_value("output.format", "SVG"));
        assert!(!reg.is_valid_enum_value("output.format", "gif"));
        // Non-enumerated properties accept anything
        assert!(reg.is_valid_enum_value("data.columns", "anything"));
    }

    #[test]
    fn test_reader_defaults() {
        let reader = PropertyReader::new();
        assert_eq!(reader.get_u64("data.seed"), 42);
        assert_eq!(reader.get_enum("output.format"), "png");
        assert_eq!(reader.get_f64("point.alpha"), 0.6);
        assert_eq!(
            reader.get_list("data.columns"),
            vec!["Eco_S", "Soc_S", "Env_S", "HQ", "WY", "CS", "SC"]
        );
        assert_eq!(reader.get_color("point.color"), Rgba::rgb(153, 204, 51));
    }

    #[test]
    fn test_reader_from_json_overrides() {
        let reader =
            PropertyReader::from_json_str(r##"{"data.rows": 250, "output.format": "svg", "point.color": "#000000"}"##)
                .unwrap();
        assert_eq!(reader.get_u64("data.rows"), 250);
        assert_eq!(reader.get_enum("output.format"), "svg");
        assert_eq!(reader.get_color("point.color"), Rgba::BLACK);
    }

    #[test]
    fn test_reader_invalid_values_fall_back() {
        let mut reader = PropertyReader::new();
        reader.set("output.format", "gif");
        reader.set("point.alpha", "lots");
        reader.set("point.color", "not-a-color");
        reader.set("data.rows", "-3");

        assert_eq!(reader.get_enum("output.format"), "png");
        assert_eq!(reader.get_f64("point.alpha"), 0.6);
        assert_eq!(reader.get_color("point.color"), Rgba::rgb(153, 204, 51));
        assert_eq!(reader.get_u64("data.rows"), 100);
    }

    #[test]
    fn test_reader_range_validation() {
        let mut reader = PropertyReader::new();
        reader.set("point.alpha", "1.5");
        assert_eq!(reader.get_f64_in_range("point.alpha", 0.0, 1.0), 0.6);

        reader.set("tick.count", "1");
        assert_eq!(reader.get_usize_in_range("tick.count", 2, 20), 5);
    }

    #[test]
    fn test_empty_override_clears_value() {
        let mut reader = PropertyReader::new();
        reader.set("data.seed", "7");
        assert_eq!(reader.get_u64("data.seed"), 7);
        reader.set("data.seed", "");
        assert_eq!(reader.get_u64("data.seed"), 42);
    }

    #[test]
    fn test_non_scalar_json_values_are_skipped() {
        let reader = PropertyReader::from_json_str(r#"{"data.columns": ["a", "b"]}"#).unwrap();
        assert_eq!(reader.get_list("data.columns").len(), 7);
    }
}

//! Bridge configuration types.
//!
//! Provides the configuration model for a bridge instance:
//! - [`UserConfig`]: Key-value configuration as delivered by the host
//! - [`BridgeConfig`]: Validated bridge settings derived from it
//!
//! The host hands the function its user configuration either as a flat
//! string map or as a JSON object; [`UserConfig::from_json`] flattens the
//! latter into the former.

use std::collections::HashMap;

use crate::error::BridgeError;

/// Configuration key holding the route definition text. Required.
pub const CONFIG_KEY_ROUTE: &str = "route";

/// Configuration key selecting the route definition language. Optional.
pub const CONFIG_KEY_ROUTE_LANGUAGE: &str = "routeLanguage";

/// Language assumed when [`CONFIG_KEY_ROUTE_LANGUAGE`] is not set.
pub const DEFAULT_ROUTE_LANGUAGE: &str = "yaml";

/// User configuration for a bridge instance.
///
/// A flat string key-value map, typically delivered by the function host
/// at deployment time.
#[derive(Debug, Clone, Default)]
pub struct UserConfig {
    properties: HashMap<String, String>,
}

impl UserConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from existing properties.
    #[must_use]
    pub fn with_properties(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Flattens a JSON object into a configuration.
    ///
    /// Scalars are converted directly (no quoting). Arrays and objects are
    /// carried as their JSON text. `null` entries are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Configuration` if `value` is not a JSON
    /// object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, BridgeError> {
        let serde_json::Value::Object(map) = value else {
            return Err(BridgeError::Configuration(
                "user config must be a JSON object".to_string(),
            ));
        };

        let mut config = Self::new();
        for (key, val) in map {
            match val {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => config.set(key, s),
                serde_json::Value::Number(n) => config.set(key, n.to_string()),
                serde_json::Value::Bool(b) => config.set(key, b.to_string()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    config.set(key, serde_json::to_string(val).unwrap_or_default());
                }
            }
        }
        Ok(config)
    }

    /// Sets a configuration property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Gets a configuration property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Gets a required configuration property, returning an error if missing.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingConfig` if the key is not set.
    pub fn require(&self, key: &str) -> Result<&str, BridgeError> {
        self.get(key)
            .ok_or_else(|| BridgeError::MissingConfig(key.to_string()))
    }

    /// Returns all properties as a reference.
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }
}

/// Validated bridge settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    route: String,
    route_language: String,
}

impl BridgeConfig {
    /// Creates a bridge config directly from a route definition.
    #[must_use]
    pub fn new(route: impl Into<String>, route_language: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            route_language: route_language.into(),
        }
    }

    /// Derives a bridge config from user configuration.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingConfig` if the `route` key is absent,
    /// or `BridgeError::Configuration` if it is blank.
    pub fn from_user_config(config: &UserConfig) -> Result<Self, BridgeError> {
        let route = config.require(CONFIG_KEY_ROUTE)?;
        if route.trim().is_empty() {
            return Err(BridgeError::Configuration(
                "route definition is blank".to_string(),
            ));
        }
        let route_language = config
            .get(CONFIG_KEY_ROUTE_LANGUAGE)
            .unwrap_or(DEFAULT_ROUTE_LANGUAGE);
        Ok(Self::new(route, route_language))
    }

    /// Returns the route definition text.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the route definition language.
    #[must_use]
    pub fn route_language(&self) -> &str {
        &self.route_language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_key() {
        let config = UserConfig::new();
        let err = config.require(CONFIG_KEY_ROUTE).unwrap_err();
        assert!(matches!(err, BridgeError::MissingConfig(k) if k == "route"));
    }

    #[test]
    fn test_bridge_config_defaults_language() {
        let mut config = UserConfig::new();
        config.set(CONFIG_KEY_ROUTE, "- from:\n    uri: direct:in");

        let bridge = BridgeConfig::from_user_config(&config).unwrap();
        assert_eq!(bridge.route_language(), DEFAULT_ROUTE_LANGUAGE);
        assert!(bridge.route().contains("direct:in"));
    }

    #[test]
    fn test_bridge_config_explicit_language() {
        let config = UserConfig::with_properties(HashMap::from([
            (CONFIG_KEY_ROUTE.to_string(), "<routes/>".to_string()),
            (CONFIG_KEY_ROUTE_LANGUAGE.to_string(), "xml".to_string()),
        ]));

        let bridge = BridgeConfig::from_user_config(&config).unwrap();
        assert_eq!(bridge.route_language(), "xml");
    }

    #[test]
    fn test_bridge_config_missing_route() {
        let config = UserConfig::new();
        let err = BridgeConfig::from_user_config(&config).unwrap_err();
        assert!(matches!(err, BridgeError::MissingConfig(_)));
    }

    #[test]
    fn test_bridge_config_blank_route() {
        let mut config = UserConfig::new();
        config.set(CONFIG_KEY_ROUTE, "   \n");
        let err = BridgeConfig::from_user_config(&config).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }

    #[test]
    fn test_from_json_flattens_scalars() {
        let json = serde_json::json!({
            "route": "- from: direct:in",
            "routeLanguage": "yaml",
            "attempts": 3,
            "verbose": true,
            "skipped": null,
        });

        let config = UserConfig::from_json(&json).unwrap();
        assert_eq!(config.get("route"), Some("- from: direct:in"));
        assert_eq!(config.get("attempts"), Some("3"));
        assert_eq!(config.get("verbose"), Some("true"));
        assert_eq!(config.get("skipped"), None);
        assert_eq!(config.properties().len(), 4);
    }

    #[test]
    fn test_from_json_carries_nested_values_as_json_text() {
        let json = serde_json::json!({
            "tags": ["a", "b"],
            "limits": {"max": 10},
        });

        let config = UserConfig::from_json(&json).unwrap();
        assert_eq!(config.get("tags"), Some(r#"["a","b"]"#));
        assert_eq!(config.get("limits"), Some(r#"{"max":10}"#));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = UserConfig::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
    }
}

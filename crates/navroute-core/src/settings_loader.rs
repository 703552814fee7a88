//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `NAVROUTE_DEBUG` | `debug` |
//! | `NAVROUTE_LOG_LEVEL` | `log_level` |
//! | `NAVROUTE_UNKNOWN_ROUTE` | `unknown_route_name` |
//! | `NAVROUTE_MAX_BACK_STEPS` | `max_back_steps` |
//!
//! ## Examples
//!
//! ```
//! use navroute_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_str(r#"
//!     unknown_route_name = "not-found"
//!
//!     [[routes]]
//!     name = "user"
//!     spec = "/users/:id"
//! "#).unwrap();
//!
//! assert_eq!(settings.routes.len(), 1);
//! assert_eq!(settings.unknown_route_name, "not-found");
//! ```

use std::path::Path;

use crate::error::RouterError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RouterError> {
    // TOML is converted to JSON first so it can be deep-merged over the
    // serialized defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`RouterError::IoError`] if the file cannot be read, or
/// [`RouterError::ConfigurationError`] if the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, RouterError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns [`RouterError::IoError`] if the file cannot be read, or
/// [`RouterError::ConfigurationError`] if the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, RouterError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Supported environment variables:
///
/// - `NAVROUTE_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `NAVROUTE_LOG_LEVEL` -> `log_level`
/// - `NAVROUTE_UNKNOWN_ROUTE` -> `unknown_route_name`
/// - `NAVROUTE_MAX_BACK_STEPS` -> `max_back_steps` (ignored unless it parses as an integer)
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("NAVROUTE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("NAVROUTE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("NAVROUTE_UNKNOWN_ROUTE") {
        settings.unknown_route_name = val;
    }

    if let Ok(val) = std::env::var("NAVROUTE_MAX_BACK_STEPS") {
        if let Ok(steps) = val.trim().parse::<usize>() {
            settings.max_back_steps = Some(steps);
        }
    }
}

// ============================================================
// Helpers
// ============================================================

/// Deep-merges `value` over the serialized default settings and deserializes the result.
fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, RouterError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RouteEntry;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "debug"
            unknown_route_name = "missing"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.unknown_route_name, "missing");
        // Defaults preserved
        assert!(settings.routes.is_empty());
        assert!(settings.max_back_steps.is_none());
    }

    #[test]
    fn test_from_toml_str_routes_keep_order() {
        let toml = r#"
            [[routes]]
            name = "user-new"
            spec = "/users/new"

            [[routes]]
            name = "user"
            spec = "/users/:id"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(
            settings.routes,
            vec![
                RouteEntry::new("user-new", "/users/new"),
                RouteEntry::new("user", "/users/:id"),
            ]
        );
    }

    #[test]
    fn test_from_toml_str_max_back_steps() {
        let settings = from_toml_str("max_back_steps = 5").unwrap();
        assert_eq!(settings.max_back_steps, Some(5));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.unknown_route_name, "unknown");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(RouterError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_route_missing_spec() {
        let toml = r#"
            [[routes]]
            name = "user"
        "#;
        assert!(from_toml_str(toml).is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "debug": false,
            "routes": [{"name": "home", "spec": "/"}],
            "extra": {"theme": "dark"}
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.routes, vec![RouteEntry::new("home", "/")]);
        assert_eq!(settings.extra["theme"], "dark");
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(settings.debug);
        assert!(settings.routes.is_empty());
    }

    #[test]
    fn test_from_json_str_invalid() {
        let result = from_json_str("{invalid json");
        assert!(result.is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("navroute_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("routes.toml");

        let toml_content = r#"
            unknown_route_name = "lost"
            [[routes]]
            name = "home"
            spec = "/"
        "#;
        std::fs::write(&path, toml_content).unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.unknown_route_name, "lost");
        assert_eq!(settings.routes.len(), 1);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("navroute_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("routes.json");

        std::fs::write(&path, r#"{"max_back_steps": 3, "debug": false}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.max_back_steps, Some(3));
        assert!(!settings.debug);

        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/routes.toml");
        assert!(matches!(result, Err(RouterError::IoError(_))));
        assert!(result.unwrap_err().is_configuration());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/routes.json");
        assert!(matches!(result, Err(RouterError::IoError(_))));
    }

    // ── Environment variable overrides ──────────────────────────────
    //
    // All env assertions live in one test so parallel tests never observe
    // each other's variables.

    #[test]
    fn test_apply_env_overrides() {
        let mut settings = Settings::default();
        settings.debug = false;
        std::env::set_var("NAVROUTE_DEBUG", "1");
        std::env::set_var("NAVROUTE_LOG_LEVEL", "trace");
        std::env::set_var("NAVROUTE_UNKNOWN_ROUTE", "404");
        std::env::set_var("NAVROUTE_MAX_BACK_STEPS", "12");
        apply_env_overrides(&mut settings);
        assert!(settings.debug);
        assert_eq!(settings.log_level, "trace");
        assert_eq!(settings.unknown_route_name, "404");
        assert_eq!(settings.max_back_steps, Some(12));

        std::env::set_var("NAVROUTE_DEBUG", "false");
        std::env::set_var("NAVROUTE_MAX_BACK_STEPS", "not-a-number");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);
        assert_eq!(settings.max_back_steps, Some(12)); // Should not change

        let from_env_settings = from_env();
        assert_eq!(from_env_settings.unknown_route_name, "404");

        let dir = std::env::temp_dir().join("navroute_test_toml_env");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("routes_env.toml");
        std::fs::write(&path, "unknown_route_name = \"from-file\"\nlog_level = \"warn\"").unwrap();
        let with_env = from_toml_file_with_env(&path).unwrap();
        assert_eq!(with_env.unknown_route_name, "404");
        assert_eq!(with_env.log_level, "trace");

        for var in [
            "NAVROUTE_DEBUG",
            "NAVROUTE_LOG_LEVEL",
            "NAVROUTE_UNKNOWN_ROUTE",
            "NAVROUTE_MAX_BACK_STEPS",
        ] {
            std::env::remove_var(var);
        }
        std::fs::remove_file(&path).ok();
        std::fs::remove_dir(&dir).ok();
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_merge_json_array_override() {
        let base = serde_json::json!({"routes": [1, 2, 3]});
        let over = serde_json::json!({"routes": [4]});
        let merged = merge_json(base, over);
        // Arrays are replaced, not merged
        assert_eq!(merged["routes"], serde_json::json!([4]));
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}

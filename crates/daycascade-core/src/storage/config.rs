//! TOML-based application configuration.
//!
//! Stores:
//! - Timeline viewport settings (visible hours, top padding)
//! - Placement defaults (task duration, day overflow policy)
//!
//! Configuration is stored at `~/.config/daycascade/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::placement::OverflowPolicy;
use crate::time::DEFAULT_DURATION_MINUTES;

/// Timeline viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_view_start_hour")]
    pub view_start_hour: u32,
    #[serde(default = "default_view_end_hour")]
    pub view_end_hour: u32,
    /// Pixels above minute 0 of the viewport.
    #[serde(default)]
    pub top_padding_px: u32,
}

/// Placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i32,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daycascade/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

fn default_view_start_hour() -> u32 {
    9
}
fn default_view_end_hour() -> u32 {
    24
}
fn default_duration_minutes() -> i32 {
    DEFAULT_DURATION_MINUTES
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            view_start_hour: default_view_start_hour(),
            view_end_hour: default_view_end_hour(),
            top_padding_px: 0,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: default_duration_minutes(),
            overflow: OverflowPolicy::Allow,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be resolved.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "using default configuration");
            Self::default()
        })
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for out-of-range view hours or a
    /// non-positive default duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timeline;
        if t.view_end_hour > 24 || t.view_start_hour >= t.view_end_hour {
            return Err(ConfigError::InvalidValue {
                key: "timeline.view_start_hour".into(),
                message: format!(
                    "view hours must satisfy start < end <= 24, got {}..{}",
                    t.view_start_hour, t.view_end_hour
                ),
            });
        }
        if self.placement.default_duration_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "placement.default_duration_minutes".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every setting as a `(section.key, value)` pair, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) else {
            return out;
        };
        for (section, fields) in sections {
            let serde_json::Value::Object(fields) = fields else {
                continue;
            };
            for (field, value) in fields {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                out.push((format!("{section}.{field}"), value));
            }
        }
        out
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails [`Config::validate`].
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Same as [`Config::apply`], plus failures writing the file.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timeline.view_start_hour, 9);
        assert_eq!(parsed.placement.overflow, OverflowPolicy::Allow);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[placement]\noverflow = \"reject\"\n").unwrap();
        assert_eq!(parsed.placement.overflow, OverflowPolicy::Reject);
        assert_eq!(parsed.placement.default_duration_minutes, 30);
        assert_eq!(parsed.timeline.view_end_hour, 24);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timeline.view_start_hour").as_deref(), Some("9"));
        assert_eq!(cfg.get("placement.overflow").as_deref(), Some("allow"));
        assert!(cfg.get("timeline.missing_key").is_none());
    }

    #[test]
    fn entries_list_every_dot_path_key() {
        let entries = Config::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "placement.default_duration_minutes",
                "placement.overflow",
                "timeline.top_padding_px",
                "timeline.view_end_hour",
                "timeline.view_start_hour",
            ]
        );
        assert!(entries.contains(&("placement.overflow".into(), "allow".into())));
        assert!(entries.contains(&("timeline.view_start_hour".into(), "9".into())));
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("timeline.view_start_hour", "7").unwrap();
        cfg.apply("placement.overflow", "reject").unwrap();
        assert_eq!(cfg.timeline.view_start_hour, 7);
        assert_eq!(cfg.placement.overflow, OverflowPolicy::Reject);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("timeline.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("timeline.view_start_hour", "nine").is_err());
        assert!(cfg.apply("placement.overflow", "wrap").is_err());
        assert!(cfg.apply("timeline.view_start_hour", "24").is_err());
        assert!(cfg.apply("placement.default_duration_minutes", "0").is_err());
        assert_eq!(cfg.timeline.view_start_hour, 9);
    }
}

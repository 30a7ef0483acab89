//! Configuration shared by the codec, the validation gate and app events.

use crate::validation::ValidationOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default ceiling for decoded payloads: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Configuration for a sharing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Application identifier events are attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Largest payload the codec will attempt to decode.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// Whether app-authored captions are acceptable.
    #[serde(default)]
    pub allow_prefilled_captions: bool,

    /// Capacity of the app events broadcast channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Custom options (host-specific)
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_event_capacity() -> usize {
    256
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            allow_prefilled_captions: false,
            event_capacity: default_event_capacity(),
            options: HashMap::new(),
        }
    }
}

impl ShareConfig {
    /// Create a config attributed to an application
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            ..Default::default()
        }
    }

    /// Set the decode size ceiling
    pub fn max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Allow captions the app filled in
    pub fn allow_prefilled_captions(mut self, allow: bool) -> Self {
        self.allow_prefilled_captions = allow;
        self
    }

    /// Set the app events channel capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Validation options seeded from this config.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new().allow_prefilled_captions(self.allow_prefilled_captions)
    }

    /// Add a custom option
    pub fn option(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.options.insert(key.into(), v);
        }
        self
    }

    /// Get a custom option
    pub fn get_option<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShareConfig::default();
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
        assert!(!config.allow_prefilled_captions);
        assert!(config.app_id.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ShareConfig = serde_json::from_str(r#"{"app_id":"123456"}"#).unwrap();
        assert_eq!(config.app_id.as_deref(), Some("123456"));
        assert_eq!(config.event_capacity, 256);
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
    }

    #[test]
    fn test_custom_options() {
        let config = ShareConfig::new("123456")
            .option("dialog_mode", "native")
            .option("retries", 0);
        assert_eq!(
            config.get_option::<String>("dialog_mode").as_deref(),
            Some("native")
        );
        assert_eq!(config.get_option::<u32>("retries"), Some(0));
        assert_eq!(config.get_option::<u32>("missing"), None);
    }

    #[test]
    fn test_validation_options_seeded() {
        let options = ShareConfig::default()
            .allow_prefilled_captions(true)
            .validation_options();
        assert!(options.allow_prefilled_captions);
    }
}

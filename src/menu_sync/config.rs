// src/menu_sync/config.rs
use crate::error::SyncError;
use crate::utils::ids::DEFAULT_SUFFIX_LEN;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

const DEFAULT_WEBP_QUALITY: f32 = 90.0;
const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024; // 20 MiB

/// Tunables of the sync layer. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SyncConfig {
    /// Lossy WebP quality used when re-encoding uploads.
    #[validate(range(min = 1.0, max = 100.0))]
    pub webp_quality: f32,
    /// Upper bound for a single actor call. `None` disables timeouts.
    #[validate(range(min = 1))]
    pub call_timeout_ms: Option<u64>,
    /// Raw files above this size are rejected before decoding.
    #[validate(range(min = 1))]
    pub max_image_bytes: usize,
    /// Length of the random base36 suffix of generated photo ids.
    #[validate(range(min = 1, max = 16))]
    pub id_suffix_len: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            webp_quality: DEFAULT_WEBP_QUALITY,
            call_timeout_ms: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            id_suffix_len: DEFAULT_SUFFIX_LEN,
        }
    }
}

impl SyncConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` on malformed JSON or out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        let config: SyncConfig =
            serde_json::from_str(json).map_err(|e| SyncError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self, SyncError> {
        self.validate().map_err(|e| SyncError::Config(e.to_string()))?;
        Ok(self)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = SyncConfig::from_json("{}").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.webp_quality, 90.0);
        assert_eq!(config.call_timeout(), None);
    }

    #[test]
    fn partial_json_overrides_fields() {
        let config = SyncConfig::from_json(r#"{ "call_timeout_ms": 1500, "id_suffix_len": 12 }"#).unwrap();
        assert_eq!(config.call_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.id_suffix_len, 12);
        assert_eq!(config.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            SyncConfig::from_json(r#"{ "webp_quality": 0.0 }"#),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(
            SyncConfig::from_json(r#"{ "id_suffix_len": 40 }"#),
            Err(SyncError::Config(_))
        ));
        assert!(matches!(SyncConfig::from_json("not json"), Err(SyncError::Config(_))));
    }
}

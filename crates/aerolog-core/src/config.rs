//! Runtime configuration for the classifier and detection engine.
//!
//! Loaded once at process start; read-only afterwards. The pattern table
//! itself lives in `aerolog-analysis` and is validated against
//! [`ClassifierConfig::anchor_weight`] when compiled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Classifier thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Weight a pattern must carry to count as a high-confidence anchor.
    pub anchor_weight: u32,
    /// Confidence below which a manual-review warning is attached.
    pub low_confidence_warning: f64,
    /// Runner-up/primary score ratio above which an ambiguity warning is attached.
    pub ambiguity_ratio: f64,
    /// Normalized text shorter than this attaches a limited-text warning.
    pub short_text_chars: usize,
    /// Maximum evidence snippet length in characters.
    pub snippet_max_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            anchor_weight: 10,
            low_confidence_warning: 0.3,
            ambiguity_ratio: 0.7,
            short_text_chars: 100,
            snippet_max_chars: 120,
        }
    }
}

/// Detection-run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Maximum reference identifiers stored per audit event payload.
    pub audit_refs_cap: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { audit_refs_cap: 50 }
    }
}

/// Top-level configuration, loadable from `aerolog.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AerologConfig {
    pub classifier: ClassifierConfig,
    pub detection: DetectionConfig,
}

impl AerologConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load `aerolog.toml` from the given directory, falling back to
    /// defaults when the file does not exist.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join("aerolog.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AerologConfig::default();
        assert_eq!(config.classifier.anchor_weight, 10);
        assert_eq!(config.classifier.snippet_max_chars, 120);
        assert_eq!(config.detection.audit_refs_cap, 50);
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = AerologConfig::from_toml(
            r#"
            [classifier]
            low_confidence_warning = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.low_confidence_warning, 0.5);
        assert_eq!(config.classifier.anchor_weight, 10);
    }

    #[test]
    fn test_from_toml_malformed_is_error() {
        assert!(AerologConfig::from_toml("classifier = 3").is_err());
    }
}

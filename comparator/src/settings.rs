//! Comparator settings with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use certcmp_types::VerifierConfig;
use certcmp_utils::LogFormat;

use crate::ComparatorError;

/// Settings for a [`crate::Comparator`].
///
/// Can be loaded from a TOML file via [`ComparatorSettings::from_toml_file`]
/// or built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorSettings {
    /// Whether trial comparison runs at all. When off, requests go straight
    /// to the primary verifier.
    #[serde(default = "default_true")]
    pub trial_enabled: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Configuration pushed to every verifier.
    #[serde(default)]
    pub verifier: VerifierConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ComparatorSettings {
    /// Load settings from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ComparatorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ComparatorError> {
        toml::from_str(s).map_err(|e| ComparatorError::Config(e.to_string()))
    }

    /// Serialize the settings to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ComparatorError> {
        toml::to_string_pretty(self).map_err(|e| ComparatorError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber these settings describe.
    pub fn init_logging(&self) -> Result<(), ComparatorError> {
        certcmp_utils::init_logging(self.log_format, &self.log_level)?;
        Ok(())
    }
}

impl Default for ComparatorSettings {
    fn default() -> Self {
        Self {
            trial_enabled: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            verifier: VerifierConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_gives_defaults() {
        let settings = ComparatorSettings::from_toml_str("").unwrap();
        assert_eq!(settings, ComparatorSettings::default());
        assert!(settings.trial_enabled);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn parses_verifier_table() {
        let settings = ComparatorSettings::from_toml_str(
            r#"
            trial_enabled = false
            log_format = "json"

            [verifier]
            enable_rev_checking = true
            allow_weak_legacy_roots = true
            "#,
        )
        .unwrap();
        assert!(!settings.trial_enabled);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(settings.verifier.enable_rev_checking);
        assert!(settings.verifier.allow_weak_legacy_roots);
        assert!(!settings.verifier.require_rev_checking_local_anchors);
        assert!(!settings.verifier.disallow_known_weak_cas);
    }

    #[test]
    fn toml_roundtrip_preserves_settings() {
        let settings = ComparatorSettings {
            trial_enabled: false,
            log_format: LogFormat::Json,
            log_level: "debug".to_string(),
            verifier: VerifierConfig {
                disallow_known_weak_cas: true,
                ..VerifierConfig::default()
            },
        };
        let text = settings.to_toml_string().unwrap();
        assert_eq!(ComparatorSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ComparatorSettings::from_toml_str("trial_enabled = \"maybe\"").unwrap_err();
        assert!(matches!(err, ComparatorError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();
        let settings = ComparatorSettings::from_toml_file(file.path()).unwrap();
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ComparatorSettings::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ComparatorError::Io(_)));
    }
}

//! Proctoring configuration with TOML file support.

use crate::error::SessionError;
use crate::gate::EscalationPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vigil_media::ModelManifest;
use vigil_types::{FailureLanePolicy, LivenessPolicy, ProctorParams};

/// Configuration for the proctoring engine.
///
/// Can be loaded from a TOML file via [`ProctorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Loudness a microphone sample must strictly exceed at test expiry.
    #[serde(default = "default_mic_threshold")]
    pub mic_threshold: f32,

    /// Camera liveness policy.
    #[serde(default)]
    pub liveness: LivenessPolicy,

    /// Microphone failure-lane policy.
    #[serde(default)]
    pub mic_failure_lane: FailureLanePolicy,

    /// Auto-escalation threshold; omit to disable.
    #[serde(default = "default_max_violations")]
    pub max_violations: Option<u32>,

    /// Whether the live session takes a fullscreen lock on entry.
    #[serde(default = "default_true")]
    pub require_fullscreen: bool,

    /// Whether leaving fullscreen early raises a violation.
    #[serde(default)]
    pub flag_fullscreen_exit: bool,

    /// Base URL of the liveness model artifacts.
    #[serde(default = "default_model_base_url")]
    pub model_base_url: String,

    /// Version tag of the model artifact set.
    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Artifact names loaded from the base URL.
    #[serde(default = "default_model_artifacts")]
    pub model_artifacts: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ProctorConfig {
    /// Load configuration from a TOML file. Missing fields fall back to
    /// their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, SessionError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|err| SessionError::Config(err.to_string()))
    }

    /// The integrity-policy parameters carried by this config.
    pub fn params(&self) -> ProctorParams {
        ProctorParams {
            mic_threshold: self.mic_threshold,
            liveness: self.liveness,
            mic_failure_lane: self.mic_failure_lane,
            max_violations: self.max_violations,
            require_fullscreen: self.require_fullscreen,
            flag_fullscreen_exit: self.flag_fullscreen_exit,
        }
    }

    /// The escalation policy handed to the session gate.
    pub fn escalation_policy(&self) -> EscalationPolicy {
        EscalationPolicy {
            max_violations: self.max_violations,
        }
    }

    /// The liveness model manifest.
    pub fn model_manifest(&self) -> ModelManifest {
        ModelManifest {
            base_url: self.model_base_url.clone(),
            version: self.model_version.clone(),
            artifacts: self.model_artifacts.clone(),
        }
    }
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            mic_threshold: default_mic_threshold(),
            liveness: LivenessPolicy::default(),
            mic_failure_lane: FailureLanePolicy::default(),
            max_violations: default_max_violations(),
            require_fullscreen: true,
            flag_fullscreen_exit: false,
            model_base_url: default_model_base_url(),
            model_version: default_model_version(),
            model_artifacts: default_model_artifacts(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

fn default_mic_threshold() -> f32 {
    1.5
}

fn default_max_violations() -> Option<u32> {
    Some(5)
}

fn default_true() -> bool {
    true
}

fn default_model_base_url() -> String {
    "https://raw.githubusercontent.com/justadudewhohacks/face-api.js/master/weights".to_string()
}

fn default_model_version() -> String {
    "master".to_string()
}

fn default_model_artifacts() -> Vec<String> {
    vec![
        "tiny_face_detector_model".to_string(),
        "face_landmark_68_model".to_string(),
    ]
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_source_policy() {
        let config = ProctorConfig::default();
        assert_eq!(config.mic_threshold, 1.5);
        assert_eq!(config.max_violations, Some(5));
        assert!(config.require_fullscreen);
        assert!(!config.flag_fullscreen_exit);
        assert_eq!(config.model_artifacts.len(), 2);
    }

    #[test]
    fn from_toml_file_applies_overrides_and_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
mic_threshold = 4.0
max_violations = 3
flag_fullscreen_exit = true

[liveness]
mode = "sustained_presence"
min_positive_ticks = 10
"#
        )
        .expect("write");

        let config = ProctorConfig::from_toml_file(file.path()).expect("load");
        assert_eq!(config.mic_threshold, 4.0);
        assert_eq!(config.max_violations, Some(3));
        assert!(config.flag_fullscreen_exit);
        assert_eq!(
            config.liveness,
            LivenessPolicy::SustainedPresence {
                min_positive_ticks: 10
            }
        );
        // Untouched fields fall back to defaults.
        assert!(config.require_fullscreen);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "mic_threshold = \"loud\"").expect("write");

        let result = ProctorConfig::from_toml_file(file.path());
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn params_round_trip() {
        let config = ProctorConfig {
            mic_threshold: 9.0,
            max_violations: None,
            ..ProctorConfig::default()
        };
        let params = config.params();
        assert_eq!(params.mic_threshold, 9.0);
        assert_eq!(params.max_violations, None);
        assert_eq!(config.escalation_policy().max_violations, None);
    }
}

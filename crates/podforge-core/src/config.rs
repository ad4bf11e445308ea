//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::voices;

/// Top-level podforge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Text-to-speech provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// TTS model identifier.
    #[serde(default = "default_tts_model")]
    pub model: String,

    /// Fallback style instructions when the transcript provides none.
    #[serde(default = "default_style_instructions")]
    pub style_instructions: String,

    /// Prebuilt voice for Speaker 1.
    #[serde(default = "default_speaker_1_voice")]
    pub speaker_1_voice: String,

    /// Prebuilt voice for Speaker 2.
    #[serde(default = "default_speaker_2_voice")]
    pub speaker_2_voice: String,

    /// Output language tag (GA locales only, see [`voices::LANGUAGES`]).
    #[serde(default = "default_language")]
    pub language: String,

    /// Persist the transcript alongside the generated audio.
    #[serde(default = "default_true")]
    pub save_transcript: bool,

    /// Sampling temperature for generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// API base URL override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".into()
}

fn default_style_instructions() -> String {
    "Read aloud in a warm, welcoming tone".into()
}

fn default_speaker_1_voice() -> String {
    "Zephyr".into()
}

fn default_speaker_2_voice() -> String {
    "Puck".into()
}

fn default_language() -> String {
    "en-US".into()
}

fn default_true() -> bool {
    true
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
            model: default_tts_model(),
            style_instructions: default_style_instructions(),
            speaker_1_voice: default_speaker_1_voice(),
            speaker_2_voice: default_speaker_2_voice(),
            language: default_language(),
            save_transcript: true,
            temperature: None,
            base_url: None,
        }
    }
}

impl TtsConfig {
    /// Resolve the API key: the `api_key` field first, then `api_key_env`,
    /// then the `GEMINI_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret_field(&self.api_key, &self.api_key_env)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty()))
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage directory (default: `~/.podforge/files`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Base URL prepended to file content URLs in citations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("files"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "plain" (default) or "json".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log level override (trace/debug/info/warn/error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Per-crate log level overrides (e.g. "podforge_provider=debug").
    #[serde(default)]
    pub filters: Vec<String>,
}

fn default_log_format() -> String {
    "plain".into()
}

/// Resolve a secret: check the direct value first, then the env-var reference.
pub fn resolve_secret_field(direct: &Option<String>, env_var: &Option<String>) -> Option<String> {
    if let Some(val) = direct {
        if !val.is_empty() {
            return Some(val.clone());
        }
    }
    if let Some(env) = env_var {
        if let Ok(val) = std::env::var(env) {
            if !val.is_empty() {
                return Some(val);
            }
        }
    }
    None
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .into_owned()
}

impl Config {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(crate::error::PodforgeError::Io)?;

        let substituted = substitute_env_vars(&raw);

        let config: Config = json5::from_str(&substituted)
            .map_err(|e| crate::error::PodforgeError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Default config file location: `~/.podforge/config.json`
    pub fn default_path() -> PathBuf {
        data_dir().join("config.json")
    }

    /// TTS config with defaults applied when the section is absent.
    pub fn tts(&self) -> TtsConfig {
        self.tts.clone().unwrap_or_default()
    }

    /// Storage config with defaults applied when the section is absent.
    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    /// Validate config, returning (warnings, errors).
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let tts = self.tts();

        if tts.resolve_api_key().is_none() {
            warnings.push(
                "No TTS API key configured (set tts.api_key, tts.api_key_env, or GEMINI_API_KEY)"
                    .to_string(),
            );
        }

        for (field, voice) in [
            ("speaker_1_voice", &tts.speaker_1_voice),
            ("speaker_2_voice", &tts.speaker_2_voice),
        ] {
            if voices::find_voice(voice).is_none() {
                errors.push(format!("Unknown voice '{voice}' for {field}"));
            }
        }

        if voices::find_language(&tts.language).is_none() {
            errors.push(format!("Unknown output language tag '{}'", tts.language));
        }

        (warnings, errors)
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Base directory for podforge data: `~/.podforge/`
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".podforge")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        let tts = config.tts();
        assert_eq!(tts.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(tts.speaker_1_voice, "Zephyr");
        assert_eq!(tts.speaker_2_voice, "Puck");
        assert_eq!(tts.language, "en-US");
        assert!(tts.save_transcript);
        assert_eq!(tts.style_instructions, "Read aloud in a warm, welcoming tone");
    }

    #[test]
    fn test_env_var_substitution() {
        // SAFETY: test-only, single-threaded test runner
        unsafe { std::env::set_var("TEST_PF_KEY", "sk-test-123") };
        let input = r#"{"key": "${TEST_PF_KEY}", "other": "plain"}"#;
        let result = substitute_env_vars(input);
        assert!(result.contains("sk-test-123"));
        assert!(result.contains("plain"));
        unsafe { std::env::remove_var("TEST_PF_KEY") };
    }

    #[test]
    fn test_resolve_api_key_order() {
        // SAFETY: test-only, single-threaded test runner
        unsafe { std::env::set_var("TEST_PF_API_KEY", "from-env") };
        let tts = TtsConfig {
            api_key_env: Some("TEST_PF_API_KEY".into()),
            ..TtsConfig::default()
        };
        assert_eq!(tts.resolve_api_key(), Some("from-env".into()));

        let tts = TtsConfig {
            api_key: Some("direct-key".into()),
            api_key_env: Some("TEST_PF_API_KEY".into()),
            ..TtsConfig::default()
        };
        // Direct key takes priority
        assert_eq!(tts.resolve_api_key(), Some("direct-key".into()));
        unsafe { std::env::remove_var("TEST_PF_API_KEY") };
    }

    #[test]
    fn test_load_json5_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                // TTS settings
                tts: {
                    speaker_1_voice: "Kore",
                    save_transcript: false,
                },
            }"#,
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        let tts = config.tts();
        assert_eq!(tts.speaker_1_voice, "Kore");
        assert!(!tts.save_transcript);
        // Unset fields fall back to serde defaults
        assert_eq!(tts.speaker_2_voice, "Puck");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/podforge.json")).unwrap();
        assert!(config.tts.is_none());
    }

    #[test]
    fn test_validate_unknown_voice_errors() {
        let config = Config {
            tts: Some(TtsConfig {
                api_key: Some("key".into()),
                speaker_1_voice: "NotAVoice".into(),
                ..TtsConfig::default()
            }),
            ..Config::default()
        };
        let (_warnings, errors) = config.validate();
        assert!(
            errors.iter().any(|e| e.contains("NotAVoice")),
            "Expected an error about the unknown voice, got: {errors:?}"
        );
    }

    #[test]
    fn test_validate_unknown_language_errors() {
        let config = Config {
            tts: Some(TtsConfig {
                api_key: Some("key".into()),
                language: "xx-XX".into(),
                ..TtsConfig::default()
            }),
            ..Config::default()
        };
        let (_warnings, errors) = config.validate();
        assert!(errors.iter().any(|e| e.contains("xx-XX")));
    }
}

use crate::documents::DEFAULT_MAX_CHUNK_SIZE;
use crate::types::{AppError, AppResult, LLMProvider};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_MODEL: &str = crate::llm::google::models::GEMINI_PRO;
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

const ENV_PREFIX: &str = "DOCQA";
const FALLBACK_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LLMConfig,
    pub processing: ProcessingConfig,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

// Keep the credential out of logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    pub max_chunk_size: usize,
    pub analysis_concurrency: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            analysis_concurrency: 1,
        }
    }
}

impl Config {
    /// Load configuration once at startup.
    ///
    /// Sources, lowest priority first: built-in defaults, `.env`, the JSON
    /// config file (missing file is fine), then `DOCQA_*` environment
    /// variables. A bare `GEMINI_API_KEY` is consulted only when none of
    /// those supplies a key.
    /// A missing or blank credential is a [`AppError::Configuration`].
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let path: PathBuf = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        debug!(path = %path.display(), "Loading configuration");

        let settings = config::Config::builder()
            .set_default("provider", "google")
            .and_then(|b| b.set_default("model", DEFAULT_MODEL))
            .and_then(|b| b.set_default("api_base", DEFAULT_API_BASE))
            .and_then(|b| b.set_default("max_chunk_size", DEFAULT_MAX_CHUNK_SIZE as i64))
            .and_then(|b| b.set_default("analysis_concurrency", 1_i64))
            .map_err(config_error)?
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(config_error)?;

        Self::from_settings(&settings, env::var(FALLBACK_KEY_VAR).ok())
    }

    fn from_settings(settings: &config::Config, fallback_key: Option<String>) -> AppResult<Self> {
        // `config.json` usually spells the key in upper case; accept both.
        let api_key = ["gemini_api_key", "GEMINI_API_KEY"]
            .iter()
            .find_map(|key| settings.get_string(key).ok())
            .or(fallback_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "no API key found; set GEMINI_API_KEY in {} or {}_GEMINI_API_KEY in the environment",
                    DEFAULT_CONFIG_FILE, ENV_PREFIX
                ))
            })?;

        let provider_id = settings.get_string("provider").map_err(config_error)?;
        let provider = LLMProvider::from_id(&provider_id).ok_or_else(|| {
            AppError::Configuration(format!("unsupported LLM provider: {}", provider_id))
        })?;

        let max_chunk_size = positive(settings, "max_chunk_size")?;
        let analysis_concurrency = positive(settings, "analysis_concurrency")?;

        Ok(Self {
            llm: LLMConfig {
                provider,
                api_key,
                model: settings.get_string("model").map_err(config_error)?,
                api_base: settings
                    .get_string("api_base")
                    .map_err(config_error)?
                    .trim_end_matches('/')
                    .to_string(),
            },
            processing: ProcessingConfig {
                max_chunk_size,
                analysis_concurrency,
            },
        })
    }
}

fn positive(settings: &config::Config, key: &str) -> AppResult<usize> {
    let value = settings.get_int(key).map_err(config_error)?;
    if value <= 0 {
        return Err(AppError::Configuration(format!(
            "{} must be greater than zero (got {})",
            key, value
        )));
    }
    Ok(value as usize)
}

fn config_error(e: config::ConfigError) -> AppError {
    AppError::Configuration(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from_json(json: &str) -> config::Config {
        config::Config::builder()
            .set_default("provider", "google")
            .unwrap()
            .set_default("model", DEFAULT_MODEL)
            .unwrap()
            .set_default("api_base", DEFAULT_API_BASE)
            .unwrap()
            .set_default("max_chunk_size", DEFAULT_MAX_CHUNK_SIZE as i64)
            .unwrap()
            .set_default("analysis_concurrency", 1_i64)
            .unwrap()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .unwrap()
    }

    #[test]
    fn test_key_from_uppercase_config_layout() {
        let settings = settings_from_json(r#"{"GEMINI_API_KEY": "abc123"}"#);
        let config = Config::from_settings(&settings, None).unwrap();

        assert_eq!(config.llm.api_key, "abc123");
        assert_eq!(config.llm.model, "gemini-pro");
        assert_eq!(config.llm.provider, LLMProvider::Google);
        assert_eq!(config.processing, ProcessingConfig::default());
    }

    #[test]
    fn test_fallback_key_used_when_file_has_none() {
        let settings = settings_from_json("{}");
        let config = Config::from_settings(&settings, Some("from-env".to_string())).unwrap();
        assert_eq!(config.llm.api_key, "from-env");
    }

    #[test]
    fn test_configured_key_wins_over_fallback() {
        let settings = settings_from_json(r#"{"GEMINI_API_KEY": "from-file"}"#);
        let config = Config::from_settings(&settings, Some("from-env".to_string())).unwrap();
        assert_eq!(config.llm.api_key, "from-file");
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let settings = settings_from_json("{}");
        let err = Config::from_settings(&settings, None).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let settings = settings_from_json(r#"{"GEMINI_API_KEY": "   "}"#);
        assert!(Config::from_settings(&settings, None).is_err());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let settings = settings_from_json(r#"{"GEMINI_API_KEY": "k", "max_chunk_size": 0}"#);
        let err = Config::from_settings(&settings, None).unwrap_err();
        assert!(err.to_string().contains("max_chunk_size"));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let settings = settings_from_json(
            r#"{"GEMINI_API_KEY": "k", "model": "gemini-1.5-flash", "api_base": "http://localhost:9999/", "analysis_concurrency": 4}"#,
        );
        let config = Config::from_settings(&settings, None).unwrap();
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.api_base, "http://localhost:9999");
        assert_eq!(config.processing.analysis_concurrency, 4);
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = settings_from_json(r#"{"GEMINI_API_KEY": "super-secret"}"#);
        let config = Config::from_settings(&settings, None).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_load_missing_file_without_key_fails() {
        // Only meaningful when the environment does not already provide a key.
        if env::var(FALLBACK_KEY_VAR).is_ok() || env::var("DOCQA_GEMINI_API_KEY").is_ok() {
            return;
        }
        let path = std::env::temp_dir().join(format!("doc-qa-missing-{}.json", uuid::Uuid::new_v4()));
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_reads_json_file() {
        let path = std::env::temp_dir().join(format!("doc-qa-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"GEMINI_API_KEY": "file-key", "max_chunk_size": 500}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.processing.max_chunk_size, 500);
        assert!(!config.llm.api_key.is_empty());
    }
}

//! newtool configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main newtool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Where lessons, progress and sessions are written
    pub storage: StorageConfig,

    /// Learner identity
    pub user: UserConfig,

    /// Agent runtime limits and per-agent model overrides
    pub agents: AgentsConfig,

    /// Conversation memory
    pub memory: MemoryConfig,

    /// Terminal output
    pub display: DisplayConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != "gemini" {
            return Err(eyre::eyre!(
                "Unknown LLM provider: '{}'. Supported: gemini",
                self.llm.provider
            ));
        }
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable (or add it to .env).",
                self.llm.api_key_env
            ));
        }
        if self.agents.max_tool_rounds == 0 {
            return Err(eyre::eyre!("agents.max-tool-rounds must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: .newtool.yml
        let local_config = PathBuf::from(".newtool.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/newtool/newtool.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("newtool").join("newtool.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".newtool.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("newtool").join("newtool.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (only "gemini" is supported)
    pub provider: String,

    /// Default model for every agent
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum output tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "LlmConfig::get_api_key: called");
        std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("Environment variable {} is not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded exponential backoff for LLM calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub attempts: u32,

    /// Multiplier between consecutive delays
    #[serde(rename = "exp-base")]
    pub exp_base: u32,

    /// Delay before the first retry
    #[serde(rename = "initial-delay-ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on a single delay
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Random extra delay added to each wait, 0 disables jitter
    #[serde(rename = "jitter-ms")]
    pub jitter_ms: u64,

    /// HTTP statuses that are retried
    #[serde(rename = "status-codes")]
    pub status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7,
            initial_delay_ms: 1000,
            max_delay_ms: 60_000,
            jitter_ms: 0,
            status_codes: vec![429, 500, 503, 504],
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding progress/session files and the lessons folder
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// Lessons directory, relative to the data directory
    #[serde(rename = "lessons-dir")]
    pub lessons_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            lessons_dir: PathBuf::from(lessonstore::DEFAULT_LESSONS_DIR),
        }
    }
}

/// Learner identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    #[serde(rename = "user-id")]
    pub user_id: String,

    #[serde(rename = "app-name")]
    pub app_name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            user_id: "learner_001".to_string(),
            app_name: "newToolNoProblem".to_string(),
        }
    }
}

/// Agent runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Tool rounds per agent run before a final answer is forced
    #[serde(rename = "max-tool-rounds")]
    pub max_tool_rounds: u32,

    /// Per-agent model overrides, keyed by agent name
    pub models: HashMap<String, String>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 20,
            models: HashMap::new(),
        }
    }
}

/// Memory configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Add matching memories to the orchestrator's instructions every turn
    pub preload: bool,
}

/// Display configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print text as it streams instead of rendering the final answer
    pub stream: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.llm.retry.attempts, 5);
        assert_eq!(config.llm.retry.exp_base, 7);
        assert_eq!(config.llm.retry.status_codes, vec![429, 500, 503, 504]);
        assert_eq!(config.storage.lessons_dir, PathBuf::from("lessons"));
        assert_eq!(config.user.user_id, "learner_001");
        assert_eq!(config.agents.max_tool_rounds, 20);
        assert!(!config.memory.preload);
        assert!(!config.display.stream);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
log-level: DEBUG
llm:
  model: gemini-2.5-pro
  retry:
    attempts: 2
storage:
  data-dir: /tmp/learning
agents:
  models:
    researcher_agent: gemini-2.5-flash-lite
display:
  stream: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.retry.attempts, 2);
        assert_eq!(config.llm.retry.exp_base, 7);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/learning"));
        assert_eq!(config.storage.lessons_dir, PathBuf::from("lessons"));
        assert_eq!(
            config.agents.models.get("researcher_agent").map(String::as_str),
            Some("gemini-2.5-flash-lite")
        );
        assert!(config.display.stream);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("newtool.yml");
        fs::write(&path, "user:\n  user-id: alice\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.user.user_id, "alice");
        assert_eq!(config.user.app_name, "newToolNoProblem");
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("newtool.yml");
        fs::write(&path, "log-level: WARN\n").unwrap();

        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_validate_missing_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "NEWTOOL_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("NEWTOOL_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "anthropic".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[test]
    fn test_validate_accepts_present_key() {
        let mut config = Config::default();
        // PATH is always set
        config.llm.api_key_env = "PATH".to_string();
        assert!(config.validate().is_ok());
    }
}

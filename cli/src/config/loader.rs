//! CLI configuration loader for pentrex
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./pentrex.json or ./.pentrex/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/pentrex/config.json or ~/.config/pentrex/config.json
//! 4. Environment variables only (no files)
//!
//! Missing model settings in a file are filled from the environment.

use anyhow::{anyhow, Context, Result};
use pentrex_core::config::{DEFAULT_MODEL, WORKER_MAX_STEPS};
use pentrex_core::{ModelParams, Protocol, ResolvedLlmConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Raw configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Protocol to use; only "anthropic" is supported
    pub protocol: Option<String>,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: Option<String>,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Model parameters (optional)
    pub params: ModelParams,
    /// Additional headers (optional)
    pub headers: HashMap<String, String>,
    /// Iteration cap for the chat, agent and orchestrator loops
    pub max_iterations: Option<usize>,
    /// Default target
    pub target: Option<String>,
    /// Notes file path; `~` is expanded
    pub notes_file: Option<String>,
    /// Report directory; `~` is expanded
    pub report_dir: Option<String>,
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl RawConfig {
    /// Session settings; never needs an API key
    pub fn session_config(&self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            max_agent_iterations: self.max_iterations.unwrap_or(defaults.max_agent_iterations),
            worker_max_steps: WORKER_MAX_STEPS,
            target: self.target.clone().filter(|t| !t.trim().is_empty()),
            notes_path: self
                .notes_file
                .as_deref()
                .map(expand_path)
                .unwrap_or(defaults.notes_path),
            report_dir: self
                .report_dir
                .as_deref()
                .map(expand_path)
                .unwrap_or(defaults.report_dir),
        }
    }

    /// Resolve to a validated model configuration
    pub fn llm_config(&self) -> Result<ResolvedLlmConfig> {
        let protocol = Protocol::parse(self.protocol.as_deref().unwrap_or("anthropic"));

        // Resolve API key (handle env: prefix)
        let api_key = match self.api_key.as_deref() {
            Some(key) => match key.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name)
                    .with_context(|| format!("Environment variable not found: {}", var_name))?,
                None => key.to_string(),
            },
            None => {
                return Err(anyhow!(
                    "No API key found. Set ANTHROPIC_API_KEY (a .env file works) or add api_key to pentrex.json"
                ))
            }
        };

        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => protocol
                .default_base_url()
                .ok_or_else(|| anyhow!("base_url is required for protocol '{}'", protocol.as_str()))?
                .to_string(),
        };

        let model = self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let resolved = ResolvedLlmConfig::new(protocol, base_url, api_key, model)
            .with_params(self.params.clone())
            .with_headers(self.headers.clone());

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

/// CLI configuration loader
#[derive(Debug, Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    target_override: Option<String>,
    max_iterations_override: Option<usize>,
    notes_file_override: Option<String>,
}

impl CliConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    pub fn with_target_override(mut self, target: String) -> Self {
        self.target_override = Some(target);
        self
    }

    pub fn with_max_iterations_override(mut self, max_iterations: usize) -> Self {
        self.max_iterations_override = Some(max_iterations);
        self
    }

    pub fn with_notes_file_override(mut self, notes_file: String) -> Self {
        self.notes_file_override = Some(notes_file);
        self
    }

    /// Discover, fill from the environment, then apply flag overrides
    pub async fn load(&self) -> Result<RawConfig> {
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        fill_from_env(&mut config);

        if let Some(api_key) = &self.api_key_override {
            config.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = Some(model.clone());
        }
        if let Some(target) = &self.target_override {
            config.target = Some(target.clone());
        }
        if let Some(max_iterations) = self.max_iterations_override {
            config.max_iterations = Some(max_iterations);
        }
        if let Some(notes_file) = &self.notes_file_override {
            config.notes_file = Some(notes_file.clone());
        }

        Ok(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        let cwd = std::env::current_dir()?;
        let mut candidates = vec![
            cwd.join("pentrex.json"),
            cwd.join(".pentrex").join("config.json"),
        ];
        if let Some(config_dir) = self.get_xdg_config_dir() {
            candidates.push(config_dir.join("pentrex").join("config.json"));
        }

        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "using config file");
                return self.load_file(&path).await;
            }
        }

        tracing::debug!("no config file found, using environment only");
        Ok(RawConfig::default())
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `$XDG_CONFIG_HOME`, falling back to the platform config directory
    fn get_xdg_config_dir(&self) -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
    }
}

/// Fill model settings the file left out from the environment
fn fill_from_env(config: &mut RawConfig) {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

    if config.api_key.is_none() {
        config.api_key = env("ANTHROPIC_API_KEY");
    }
    if config.base_url.is_none() {
        config.base_url = env("ANTHROPIC_BASE_URL");
    }
    if config.model.is_none() {
        config.model = env("PENTREX_MODEL");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_override_path_and_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"api_key": "sk-file", "model": "claude-from-file", "max_iterations": 10, "target": "10.0.0.1"}"#,
        )
        .unwrap();

        let config = CliConfigLoader::new()
            .with_config_override(dir.path().to_path_buf())
            .with_model_override("claude-from-flag".to_string())
            .with_target_override("10.0.0.2".to_string())
            .load()
            .await
            .unwrap();

        let llm = config.llm_config().unwrap();
        assert_eq!(llm.api_key, "sk-file");
        assert_eq!(llm.model, "claude-from-flag");

        let session = config.session_config();
        assert_eq!(session.max_agent_iterations, 10);
        assert_eq!(session.worker_max_steps, 15);
        assert_eq!(session.target.as_deref(), Some("10.0.0.2"));
    }

    #[tokio::test]
    async fn test_missing_override_path() {
        let dir = TempDir::new().unwrap();
        let result = CliConfigLoader::new()
            .with_config_override(dir.path().join("absent.json"))
            .load()
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_llm_config_defaults_and_env_key() {
        std::env::set_var("PENTREX_LOADER_TEST_KEY", "sk-env");
        let config = RawConfig {
            api_key: Some("env:PENTREX_LOADER_TEST_KEY".to_string()),
            ..Default::default()
        };

        let llm = config.llm_config().unwrap();
        assert_eq!(llm.api_key, "sk-env");
        assert_eq!(llm.protocol, Protocol::Anthropic);
        assert_eq!(llm.base_url, "https://api.anthropic.com");
        assert_eq!(llm.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_llm_config_errors() {
        assert!(RawConfig::default().llm_config().is_err());

        let unsupported = RawConfig {
            protocol: Some("openai".to_string()),
            api_key: Some("sk".to_string()),
            ..Default::default()
        };
        assert!(unsupported.llm_config().is_err());
    }

    #[test]
    fn test_session_config_expands_home() {
        let config = RawConfig {
            notes_file: Some("~/loot/notes.json".to_string()),
            target: Some("  ".to_string()),
            ..Default::default()
        };
        let session = config.session_config();
        assert!(!session.notes_path.starts_with("~"));
        assert!(session.notes_path.ends_with("loot/notes.json"));
        assert_eq!(session.target, None);
        assert_eq!(session.report_dir, PathBuf::from("loot"));
    }
}

//! `decider.toml` loading and resolution.
//!
//! Resolution order: an explicit `--config` path, then `DECIDER_CONFIG`,
//! then `./decider.toml` when it exists, then built-in defaults.
//! `DECIDER_ENDPOINT` overrides `endpoint.base_url` in every case.

use std::path::{Path, PathBuf};
use std::time::Duration;

use decider_core::{CriteriaStyle, WorkflowRules, SUBMIT_PATH};
use serde::Deserialize;

pub const CONFIG_ENV: &str = "DECIDER_CONFIG";
pub const ENDPOINT_ENV: &str = "DECIDER_ENDPOINT";
pub const DEFAULT_CONFIG_FILE: &str = "decider.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DeciderConfig {
    pub endpoint: EndpointConfig,
    pub workflow: WorkflowConfig,
    pub clipboard: ClipboardConfig,
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    pub base_url: String,
    pub submit_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            base_url: "http://127.0.0.1:5000".to_string(),
            submit_path: SUBMIT_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub min_options: usize,
    pub criteria_style: CriteriaStyle,
    pub notice_ttl_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let rules = WorkflowRules::default();
        WorkflowConfig {
            min_options: rules.min_options,
            criteria_style: rules.criteria_style,
            notice_ttl_ms: rules.notice_ttl.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ClipboardConfig {
    /// Program (with arguments) that reads the text to copy from stdin.
    /// Unset means the platform default.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig { port: 5000 }
    }
}

impl DeciderConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config '{}': {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let config: DeciderConfig = toml::from_str(content).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config from the process environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        Self::resolve_with(explicit, |key| std::env::var(key).ok())
    }

    /// Resolution with an injectable environment lookup.
    pub fn resolve_with<F>(explicit: Option<&Path>, env: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).filter(|p| !p.is_empty()).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            });

        let mut config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)?
            }
            None => DeciderConfig::default(),
        };

        if let Some(url) = env(ENDPOINT_ENV).filter(|u| !u.trim().is_empty()) {
            config.endpoint.base_url = url;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.workflow.min_options == 0 {
            return Err("workflow.min_options must be at least 1".to_string());
        }
        if self.endpoint.base_url.trim().is_empty() {
            return Err("endpoint.base_url must not be empty".to_string());
        }
        Ok(())
    }

    pub fn rules(&self) -> WorkflowRules {
        WorkflowRules {
            min_options: self.workflow.min_options,
            criteria_style: self.workflow.criteria_style,
            notice_ttl: Duration::from_millis(self.workflow.notice_ttl_ms),
            ..WorkflowRules::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = DeciderConfig::parse("").unwrap();
        assert_eq!(config, DeciderConfig::default());
        assert_eq!(config.endpoint.submit_path, "/decision/submit");
        assert_eq!(config.rules(), WorkflowRules::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DeciderConfig::parse(
            r#"
[workflow]
min_options = 1
criteria_style = "plain"

[serve]
port = 8088
"#,
        )
        .unwrap();
        let rules = config.rules();
        assert_eq!(rules.min_options, 1);
        assert_eq!(rules.min_criteria, 1);
        assert_eq!(rules.criteria_style, CriteriaStyle::Plain);
        assert_eq!(config.serve.port, 8088);
        assert_eq!(config.endpoint, EndpointConfig::default());
    }

    #[test]
    fn zero_min_options_is_rejected() {
        let err = DeciderConfig::parse("[workflow]\nmin_options = 0\n").unwrap_err();
        assert!(err.contains("min_options"), "{}", err);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DeciderConfig::parse("[endpoint]\nbase = \"x\"\n").is_err());
    }

    #[test]
    fn explicit_path_wins_over_env_path() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("a.toml");
        let from_env = dir.path().join("b.toml");
        fs::write(&explicit, "[serve]\nport = 1111\n").unwrap();
        fs::write(&from_env, "[serve]\nport = 2222\n").unwrap();

        let env_path = from_env.display().to_string();
        let env = move |key: &str| (key == CONFIG_ENV).then(|| env_path.clone());

        let config = DeciderConfig::resolve_with(Some(&explicit), &env).unwrap();
        assert_eq!(config.serve.port, 1111);
        let config = DeciderConfig::resolve_with(None, &env).unwrap();
        assert_eq!(config.serve.port, 2222);
    }

    #[test]
    fn endpoint_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("decider.toml");
        fs::write(&path, "[endpoint]\nbase_url = \"http://file:1\"\n").unwrap();

        let vars: HashMap<&str, String> =
            HashMap::from([(ENDPOINT_ENV, "http://env:2".to_string())]);
        let config =
            DeciderConfig::resolve_with(Some(&path), |key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.endpoint.base_url, "http://env:2");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = DeciderConfig::resolve_with(Some(Path::new("/nonexistent/decider.toml")), no_env)
            .unwrap_err();
        assert!(err.starts_with("failed to read config"), "{}", err);
    }
}

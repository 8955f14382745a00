//! Configuration for custom-trends.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line overrides (`--base-url`)
//! 2. Config file settings (.custom-trends/config.yaml)
//! 3. Process environment (BACKEND_API_URL)
//!
//! Config file discovery:
//! - CUSTOM_TRENDS_CONFIG, if set, names the file directly
//! - Otherwise searches current directory and parents for .custom-trends/config.yaml
//! - Falls back to ~/.custom-trends/config.yaml

pub mod settings;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

pub use settings::{non_empty, EnvSettings, LayeredSettings, SettingsSource, StaticSettings};

/// Setting key holding the trends backend base URL
pub const BACKEND_API_URL: &str = "BACKEND_API_URL";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CUSTOM_TRENDS_CONFIG";

const CONFIG_DIR: &str = ".custom-trends";
const CONFIG_FILE: &str = "config.yaml";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Runtime settings handed to providers (e.g. BACKEND_API_URL)
    #[serde(default)]
    pub settings: HashMap<String, String>,
    #[serde(default)]
    pub agent: Option<AgentConfig>,
}

/// Template variables describing the posting agent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentConfig {
    pub name: Option<String>,
    pub twitter_user_name: Option<String>,
    pub adjective: Option<String>,
    pub topic: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Settings from the config file
    pub settings: StaticSettings,
    /// Agent profile used for template rendering
    pub agent: AgentConfig,
}

impl ResolvedConfig {
    /// Runtime settings as seen by providers: CLI override first, then file.
    pub fn runtime_settings(&self, base_url_override: Option<String>) -> LayeredSettings {
        let mut cli = StaticSettings::new();
        if let Some(url) = base_url_override {
            cli.set(BACKEND_API_URL, url);
        }

        LayeredSettings::new()
            .layer("command line", cli)
            .layer("config file", self.settings.clone())
    }

    /// Full lookup stack including the process environment, for diagnostics
    pub fn effective_settings(&self, base_url_override: Option<String>) -> LayeredSettings {
        self.runtime_settings(base_url_override)
            .layer("environment", EnvSettings)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Locate the config file from all discovery sources
fn find_config_file() -> Option<PathBuf> {
    if let Some(explicit) = non_empty(std::env::var(CONFIG_PATH_ENV).ok()) {
        return Some(PathBuf::from(explicit));
    }

    if let Some(found) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file_from(&cwd))
    {
        return Some(found);
    }

    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Build a resolved config from an optional config file path
fn load_config_from(config_file: Option<PathBuf>) -> Result<ResolvedConfig> {
    let Some(path) = config_file else {
        return Ok(ResolvedConfig::default());
    };

    let file = load_config_file(&path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");

    Ok(ResolvedConfig {
        config_file: Some(path),
        settings: StaticSettings::from(file.settings),
        agent: file.agent.unwrap_or_default(),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    load_config_from(find_config_file())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1.0"
settings:
  BACKEND_API_URL: http://localhost:3000/
agent:
  name: Eliza
  twitter_user_name: eliza_ai
  adjective: witty
"#,
        );

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.settings.get(BACKEND_API_URL),
            Some(&"http://localhost:3000/".to_string())
        );
        let agent = config.agent.unwrap();
        assert_eq!(agent.name.as_deref(), Some("Eliza"));
        assert_eq!(agent.twitter_user_name.as_deref(), Some("eliza_ai"));
        assert_eq!(agent.topic, None);
    }

    #[test]
    fn test_minimal_config_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"");

        let resolved = load_config_from(Some(path.clone())).unwrap();
        assert_eq!(resolved.config_file, Some(path));
        assert!(resolved.settings.is_empty());
        assert!(resolved.agent.name.is_none());
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "settings: [not, a, map]");

        let err = load_config_from(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let expected = write_config(temp.path(), "version: \"1.0\"");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file_from(&nested), Some(expected));
    }

    #[test]
    fn test_no_config_file_yields_defaults() {
        let resolved = load_config_from(None).unwrap();
        assert!(resolved.config_file.is_none());
        assert!(resolved.settings.is_empty());
    }

    #[test]
    fn test_runtime_settings_override_order() {
        let resolved = ResolvedConfig {
            settings: StaticSettings::new().with(BACKEND_API_URL, "http://file"),
            ..Default::default()
        };

        let from_file = resolved.runtime_settings(None);
        assert_eq!(
            from_file.resolve(BACKEND_API_URL),
            Some(("config file", "http://file".to_string()))
        );

        let overridden = resolved.runtime_settings(Some("http://cli".to_string()));
        assert_eq!(
            overridden.resolve(BACKEND_API_URL),
            Some(("command line", "http://cli".to_string()))
        );
    }
}

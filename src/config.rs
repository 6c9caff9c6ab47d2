use crate::github::client::{Repository, endpoints};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Repository,
    ApiBaseUrl,
    ProjectName,
    ListenAddress,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Repository => "repository",
            ConfigKey::ApiBaseUrl => "api_base_url",
            ConfigKey::ProjectName => "project_name",
            ConfigKey::ListenAddress => "listen_address",
        }
    }

    /// Environment variable overriding this key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::Repository => "JABREF_ACTIONS_REPOSITORY",
            ConfigKey::ApiBaseUrl => "JABREF_ACTIONS_API_BASE_URL",
            ConfigKey::ProjectName => "JABREF_ACTIONS_PROJECT_NAME",
            ConfigKey::ListenAddress => "JABREF_ACTIONS_LISTEN_ADDRESS",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Repository,
            ConfigKey::ApiBaseUrl,
            ConfigKey::ProjectName,
            ConfigKey::ListenAddress,
        ]
    }
}

/// Filename for the configuration within the config directory.
pub const CONFIG_FILENAME: &str = "config.json";
/// Directory name, relative to the working directory, holding the config file.
pub const CONFIG_DIR: &str = ".jabref-actions";

pub const DEFAULT_REPOSITORY: &str = "JabRef/jabref";
pub const DEFAULT_PROJECT_NAME: &str = "JabRef";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:5055";

/// Parses a JSON configuration file content into a map of configuration values.
///
/// - Returns an empty HashMap if `content` is empty or contains only whitespace.
/// - Unknown keys are skipped.
/// - Returns an `Err` if the JSON is invalid or is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let Value::Object(map) = &value else {
        return Err(anyhow::anyhow!("Config must be a JSON object"));
    };

    Ok(ConfigKey::all()
        .iter()
        .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
        .collect())
}

/// Collects overrides from environment variables, read through `lookup`.
pub fn env_overrides<F>(lookup: F) -> HashMap<ConfigKey, Value>
where
    F: Fn(&str) -> Option<String>,
{
    ConfigKey::all()
        .iter()
        .filter_map(|key| lookup(key.env_var()).map(|val| (*key, Value::String(val))))
        .collect()
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub repository: Repository,
    pub api_base_url: String,
    pub project_name: String,
    pub listen_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            repository: Repository {
                owner: "JabRef".to_string(),
                name: "jabref".to_string(),
            },
            api_base_url: endpoints::API_BASE_URL.to_string(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

impl Settings {
    /// Applies a configuration map on top of the defaults.
    pub fn from_config(config: &HashMap<ConfigKey, Value>) -> Result<Self> {
        let mut settings = Settings::default();
        for key in ConfigKey::all() {
            let Some(value) = config.get(key) else {
                continue;
            };
            let text = value
                .as_str()
                .with_context(|| format!("Config key '{}' must be a string", key.as_str()))?;
            match key {
                ConfigKey::Repository => {
                    settings.repository = Repository::parse(text).with_context(|| {
                        format!("Invalid repository format '{text}'. Please use <owner>/<repo>.")
                    })?;
                }
                ConfigKey::ApiBaseUrl => settings.api_base_url = text.to_string(),
                ConfigKey::ProjectName => settings.project_name = text.to_string(),
                ConfigKey::ListenAddress => settings.listen_address = text.to_string(),
            }
        }
        Ok(settings)
    }

    /// Loads defaults < `<dir>/.jabref-actions/config.json` < environment.
    pub fn load(dir: &Path) -> Result<Self> {
        Settings::load_with_env(dir, |name| std::env::var(name).ok())
    }

    /// Same as [`Settings::load`], reading environment variables through `lookup`.
    pub fn load_with_env<F>(dir: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = dir.join(CONFIG_DIR).join(CONFIG_FILENAME);
        let file_config = match std::fs::read(&path) {
            Ok(content) => parse_config(&content)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };
        let merged = update_config(&file_config, &env_overrides(lookup));
        Settings::from_config(&merged)
    }
}

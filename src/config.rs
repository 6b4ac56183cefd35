// Configuration module
// Internal representation of user configuration, plus the optional TOML file
// layered over the compiled-in defaults from `user_config`.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{EditorError, Result};

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// (key description, command name), applied in order
    pub keybindings: Vec<(String, String)>,
    pub settings: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    keybindings: BTreeMap<String, String>,
    #[serde(default)]
    settings: BTreeMap<String, toml::Value>,
}

impl Config {
    /// Compiled-in defaults, then the config file. An explicit `path` must
    /// exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        crate::user_config::configure(&mut config);

        match path {
            Some(path) => config.merge_file(path)?,
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    config.merge_file(&path)?;
                }
            }
        }
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/chordline/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("chordline").join("config.toml"))
    }

    /// Apply a TOML file over the current values.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EditorError::Config(format!("{}: {}", path.display(), e)))?;
        self.merge_toml(&contents)
            .map_err(|e| EditorError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "loaded config file");
        Ok(())
    }

    /// Apply TOML text over the current values. Settings of unsupported types
    /// are skipped with a warning.
    pub fn merge_toml(&mut self, contents: &str) -> std::result::Result<(), toml::de::Error> {
        let raw: RawConfig = toml::from_str(contents)?;
        for (key, command) in &raw.keybindings {
            self.bind(key, command);
        }
        for (name, value) in raw.settings {
            match ConfigValue::try_from(value) {
                Ok(value) => self.set(&name, value),
                Err(other) => {
                    tracing::warn!(setting = %name, value = %other, "unsupported setting type")
                }
            }
        }
        Ok(())
    }

    /// Bind a key sequence to a command. Rebinding a description keeps its
    /// original position.
    pub fn bind(&mut self, key: &str, command: &str) {
        match self.keybindings.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = command.to_string(),
            None => self
                .keybindings
                .push((key.to_string(), command.to_string())),
        }
    }

    /// Command bound to a description, if any
    pub fn binding(&self, key: &str) -> Option<&str> {
        self.keybindings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c.as_str())
    }

    /// Set a configuration value
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) {
        self.settings.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    /// Get integer setting
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    /// Get boolean setting (Test helper)
    #[cfg(test)]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Get string setting (Test helper)
    #[cfg(test)]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl TryFrom<toml::Value> for ConfigValue {
    type Error = toml::Value;

    fn try_from(value: toml::Value) -> std::result::Result<Self, Self::Error> {
        match value {
            toml::Value::Boolean(b) => Ok(ConfigValue::Bool(b)),
            toml::Value::Integer(i) => Ok(ConfigValue::Int(i)),
            toml::Value::String(s) => Ok(ConfigValue::String(s)),
            other => Err(other),
        }
    }
}

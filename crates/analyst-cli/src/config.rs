//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use analyst_sdk::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding config and history
const CONFIG_DIR: &str = ".grounded-analyst";

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Where this config was loaded from and is saved to
    #[serde(skip)]
    location: Option<PathBuf>,

    /// Profile chosen for this run only; never written back
    #[serde(skip)]
    session_profile: Option<String>,
}

/// Connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Analysis endpoint URL
    pub endpoint_url: String,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// REPL history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Styled terminal text
    Text,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and REPL history
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(CONFIG_DIR))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::path()?),
        }
    }

    /// Load configuration from a file, or use the defaults if it does not exist.
    ///
    /// Either way the returned config saves back to `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.location = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to the file it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = self
            .location
            .as_deref()
            .ok_or_else(|| CliError::Config("No configuration file location".into()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Name of the profile in use: the per-run choice if any, else the saved one
    pub fn profile_in_use(&self) -> &str {
        self.session_profile.as_deref().unwrap_or(&self.active_profile)
    }

    /// Get the profile in use.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        let name = self.profile_in_use();
        self.profiles
            .get(name)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", name)))
    }

    /// Use a profile for this run without changing the saved active profile.
    pub fn use_profile_for_session(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.session_profile = Some(name);
        Ok(())
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        // An explicit switch supersedes the per-run choice
        self.session_profile = None;
        Ok(())
    }

    /// Endpoint URL to use: the override if given, else the active profile's
    pub fn endpoint_url(&self, override_url: Option<&str>) -> Result<String> {
        match override_url {
            Some(url) => Ok(url.to_string()),
            None => Ok(self.get_active_profile()?.endpoint_url.clone()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_profile: default_profile(),
            profiles: default_profiles(),
            settings: Settings::default(),
            location: None,
            session_profile: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_profiles() -> BTreeMap<String, Profile> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        default_profile(),
        Profile {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
        },
    );
    profiles
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert_eq!(
            config.get_active_profile().unwrap().endpoint_url,
            "http://127.0.0.1:5000/api/analyze"
        );
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Text);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            endpoint_url: "http://example.com:5000/api/analyze".to_string(),
        };

        config.set_profile("test".to_string(), profile);
        assert!(config.profiles.contains_key("test"));

        config.switch_profile("test".to_string()).unwrap();
        assert_eq!(config.active_profile, "test");
        assert_eq!(
            config.endpoint_url(None).unwrap(),
            "http://example.com:5000/api/analyze"
        );
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_override_wins() {
        let config = Config::default();
        assert_eq!(
            config.endpoint_url(Some("http://other/api")).unwrap(),
            "http://other/api"
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.set_profile(
            "staging".to_string(),
            Profile {
                endpoint_url: "http://staging:5000/api/analyze".to_string(),
            },
        );
        config.settings.format = OutputFormat::Json;
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.profiles.len(), 2);
        assert_eq!(reloaded.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.settings.history_size, 1000);
        assert!(config.profiles.contains_key("default"));
    }

    #[test]
    fn test_session_profile_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::load_from(&path).unwrap();
        config.set_profile(
            "staging".to_string(),
            Profile {
                endpoint_url: "http://staging:5000/api/analyze".to_string(),
            },
        );
        config.save().unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.use_profile_for_session("staging".to_string()).unwrap();
        assert_eq!(config.profile_in_use(), "staging");
        assert_eq!(
            config.endpoint_url(None).unwrap(),
            "http://staging:5000/api/analyze"
        );

        config.set_profile(
            "other".to_string(),
            Profile {
                endpoint_url: "http://other:5000/api/analyze".to_string(),
            },
        );
        config.save().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.active_profile, "default");
        assert_eq!(reloaded.profile_in_use(), "default");
        assert!(reloaded.profiles.contains_key("other"));
    }

    #[test]
    fn test_session_profile_must_exist() {
        let mut config = Config::default();
        assert!(config.use_profile_for_session("missing".to_string()).is_err());
        assert_eq!(config.profile_in_use(), "default");
    }

    #[test]
    fn test_switch_clears_session_profile() {
        let mut config = Config::default();
        config.set_profile(
            "a".to_string(),
            Profile {
                endpoint_url: "http://a/api".to_string(),
            },
        );
        config.set_profile(
            "b".to_string(),
            Profile {
                endpoint_url: "http://b/api".to_string(),
            },
        );
        config.use_profile_for_session("a".to_string()).unwrap();
        config.switch_profile("b".to_string()).unwrap();
        assert_eq!(config.profile_in_use(), "b");
    }

    #[test]
    fn test_save_without_location_fails() {
        let config = Config::default();
        assert!(matches!(config.save(), Err(CliError::Config(_))));
    }
}

//! Configuration handling for the TUI

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `api_url`
pub const API_URL_ENV: &str = "HOMESERVICES_API_URL";

const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 30;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// GraphQL endpoint; the offline demo backend is used when unset
    pub api_url: Option<String>,
    /// Prefilled into the registration form
    pub referral_code: Option<String>,
    /// Seconds before another reset code can be requested
    pub resend_cooldown_secs: Option<u64>,
    /// Remember the last signed-in email address; on unless set to false
    pub remember_email: Option<bool>,
    pub last_email: Option<String>,
    /// Endpoint from the environment, never written back to disk
    #[serde(skip)]
    api_url_override: Option<String>,
    /// File this config was loaded from and is saved to
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "homeservices", "homeservices-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Load configuration from a specific file; missing files give defaults.
    /// Later saves go back to the same file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing config at {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(config.with_path(path))
    }

    /// Save to the file this config belongs to; a no-op when it has none
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Use a non-empty override instead of `api_url` for this run
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url_override = Some(url.trim().to_string());
        }
        self
    }

    /// Endpoint to talk to: the override if any, else the saved `api_url`
    pub fn endpoint(&self) -> Option<&str> {
        self.api_url_override
            .as_deref()
            .or(self.api_url.as_deref())
    }

    pub fn resend_cooldown(&self) -> Duration {
        Duration::from_secs(
            self.resend_cooldown_secs
                .unwrap_or(DEFAULT_RESEND_COOLDOWN_SECS),
        )
    }

    pub fn remembers_email(&self) -> bool {
        self.remember_email.unwrap_or(true)
    }

    /// Email to prefill into the login form
    pub fn remembered_email(&self) -> Option<&str> {
        self.last_email
            .as_deref()
            .filter(|_| self.remembers_email())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("homeservices-tui-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.api_url.is_none());
        assert!(config.referral_code.is_none());
        assert_eq!(config.resend_cooldown(), Duration::from_secs(30));
        assert!(config.remembers_email());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"api_url": "https://api.example.com/graphql", "theme": "dark"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.api_url.as_deref(),
            Some("https://api.example.com/graphql")
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_config_path();
        let config = AppConfig {
            referral_code: Some("FRIEND10".to_string()),
            resend_cooldown_secs: Some(5),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config.with_path(&path));
        assert_eq!(loaded.resend_cooldown(), Duration::from_secs(5));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = temp_config_path();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, AppConfig::default().with_path(&path));
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let path = temp_config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_env_override_replaces_api_url() {
        let config = AppConfig {
            api_url: Some("https://file.example.com".to_string()),
            ..Default::default()
        };
        let config = config.with_api_url_override(Some(" https://env.example.com ".to_string()));
        assert_eq!(config.endpoint(), Some("https://env.example.com"));
        assert_eq!(config.api_url.as_deref(), Some("https://file.example.com"));
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = AppConfig::default().with_api_url_override(Some("  ".to_string()));
        assert_eq!(config.endpoint(), None);
    }

    #[test]
    fn test_env_override_is_not_saved() {
        let path = temp_config_path();
        AppConfig::default().save_to(&path).unwrap();

        let mut config = AppConfig::load_from(&path)
            .unwrap()
            .with_api_url_override(Some("http://env-only".to_string()));
        config.last_email = Some("jo@example.com".to_string());
        config.save().unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.api_url, None);
        assert_eq!(reloaded.endpoint(), None);
        assert_eq!(reloaded.last_email.as_deref(), Some("jo@example.com"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_without_path_is_noop() {
        assert!(AppConfig::default().save().is_ok());
    }

    #[test]
    fn test_remembered_email_unless_opted_out() {
        let mut config = AppConfig {
            last_email: Some("jo@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.remembered_email(), Some("jo@example.com"));
        config.remember_email = Some(false);
        assert_eq!(config.remembered_email(), None);
    }
}

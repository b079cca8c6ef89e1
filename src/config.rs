use crate::error::{Error, Result};
use crate::jmap::{ClientConfig, DEFAULT_APP_NAME, SESSION_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted settings in `~/.maskedemail-cli/config.json`.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
}

impl Config {
    fn config_dir() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not find home directory".into()))?
            .join(".maskedemail-cli");
        Ok(dir)
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
        }

        let path = Self::config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn set_token(&mut self, token: String) {
        self.api_token = Some(token);
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub account_id: Option<String>,
    pub app_name: Option<String>,
    pub session_url: Option<String>,
}

/// Resolved settings for one invocation. Built once and handed to commands.
#[derive(Debug, Clone)]
pub struct Settings {
    token: Option<String>,
    account_id: Option<String>,
    app_name: String,
    session_url: String,
}

impl Settings {
    /// Overrides win over the config file, which wins over built-in defaults.
    /// Empty strings count as unset.
    pub fn resolve(overrides: Overrides, config: Config) -> Self {
        fn pick(first: Option<String>, second: Option<String>) -> Option<String> {
            first
                .filter(|s| !s.is_empty())
                .or(second.filter(|s| !s.is_empty()))
        }

        Self {
            token: pick(overrides.token, config.api_token),
            account_id: pick(overrides.account_id, config.account_id),
            app_name: pick(overrides.app_name, config.app_name)
                .unwrap_or_else(|| DEFAULT_APP_NAME.into()),
            session_url: overrides
                .session_url
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| SESSION_URL.into()),
        }
    }

    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::NotAuthenticated)
    }

    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(self.token()?)
            .with_app_name(self.app_name.as_str())
            .with_session_url(self.session_url.as_str()))
    }

    /// Same settings, authenticating with `token` instead.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let config = Config {
            api_token: Some("from-file".into()),
            account_id: Some("F1".into()),
            app_name: Some("file-app".into()),
        };
        let settings = Settings::resolve(
            Overrides {
                token: Some("from-flag".into()),
                account_id: Some("A1".into()),
                app_name: None,
                session_url: None,
            },
            config,
        );
        assert_eq!(settings.token().unwrap(), "from-flag");
        assert_eq!(settings.account_id(), Some("A1"));

        let client = settings.client_config().unwrap();
        assert_eq!(client.app_name, "file-app");
        assert_eq!(client.session_url, SESSION_URL);
    }

    #[test]
    fn test_empty_values_are_unset() {
        let settings = Settings::resolve(
            Overrides {
                token: Some("".into()),
                account_id: Some("".into()),
                app_name: Some("".into()),
                session_url: Some("".into()),
            },
            Config::default(),
        );
        assert!(matches!(settings.token(), Err(Error::NotAuthenticated)));
        assert_eq!(settings.account_id(), None);
        assert!(settings.client_config().is_err());
    }

    #[test]
    fn test_default_app_name() {
        let settings = Settings::resolve(
            Overrides {
                token: Some("tok".into()),
                ..Default::default()
            },
            Config::default(),
        );
        assert_eq!(settings.client_config().unwrap().app_name, DEFAULT_APP_NAME);
    }

    #[test]
    fn test_config_file_shape() {
        let config: Config =
            serde_json::from_str(r#"{"apiToken": "tok", "appName": "mine"}"#).unwrap();
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.app_name.as_deref(), Some("mine"));
        assert!(config.account_id.is_none());
    }
}

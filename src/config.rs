//! Runtime configuration: where the service lives and who may administer it.
//!
//! Read from a TOML file, then overridden by environment variables:
//!
//! | Variable                  | Overrides            |
//! |---------------------------|----------------------|
//! | `FEEDBACK_CONFIG`         | path of the file     |
//! | `FEEDBACK_API_URL`        | `api.base_url`       |
//! | `FEEDBACK_API_TIMEOUT`    | `api.timeout_secs`   |
//! | `FEEDBACK_ADMIN_USERNAME` | `admin.username`     |
//! | `FEEDBACK_ADMIN_PASSWORD` | `admin.password`     |
//! | `FEEDBACK_SESSION_FILE`   | `session_file`       |
//!
//! ```toml
//! session_file = "/var/lib/feedback/session.json"
//!
//! [api]
//! base_url = "http://127.0.0.1:5000/api"
//! timeout_secs = 10
//!
//! [admin]
//! username = "admin"
//! password = "change me"
//! ```

use crate::{
    client::{self, DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    error::{ConfigError, MalformedConfig},
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Everything the crate can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How to reach the service.
    pub api: ApiConfig,
    /// Administrator credentials. Admin login is refused when absent.
    pub admin: Option<AdminCredentials>,
    /// Where sessions are remembered. Defaults to the platform data directory.
    pub session_file: Option<PathBuf>,
}

/// How to reach the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint is resolved against.
    pub base_url: String,
    /// Per-request timeout in whole seconds.
    pub timeout_secs: u64,
    /// Custom `User-Agent`, if any.
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: None,
        }
    }
}

/// Username and password an administrator signs in with.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminCredentials {
    #[allow(missing_docs)]
    pub username: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Loads configuration from the default location, then applies environment overrides.
    ///
    /// The file is `$FEEDBACK_CONFIG` if set, otherwise `config.toml` in the platform
    /// config directory. A missing file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::IoError`] if the file exists but can't be read.
    /// - [`ConfigError::MalformedConfig`] if it isn't valid TOML for [`Config`].
    /// - [`ConfigError::InvalidBaseUrl`] / [`ConfigError::InvalidTimeout`] for bad values.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("FEEDBACK_CONFIG")
            .map(PathBuf::from)
            .or_else(default_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            None => {
                warn!("no platform config directory, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Reads configuration from a TOML file, without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses configuration from TOML text, without environment overrides.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(MalformedConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides, looking each variable up with `var`.
    ///
    /// Empty values are ignored. An admin username without a password (or the
    /// reverse) only takes effect if the other half is already configured.
    fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|value| !value.is_empty());

        if let Some(url) = var("FEEDBACK_API_URL") {
            self.api.base_url = url;
        }

        if let Some(timeout) = var("FEEDBACK_API_TIMEOUT") {
            self.api.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_err| ConfigError::InvalidTimeout)?;
        }

        if let Some(path) = var("FEEDBACK_SESSION_FILE") {
            self.session_file = Some(PathBuf::from(path));
        }

        let username = var("FEEDBACK_ADMIN_USERNAME");
        let password = var("FEEDBACK_ADMIN_PASSWORD");

        match (username, password) {
            (Some(username), Some(password)) => {
                self.admin = Some(AdminCredentials { username, password });
            }
            (Some(username), None) => match &mut self.admin {
                Some(admin) => admin.username = username,
                None => warn!("`FEEDBACK_ADMIN_USERNAME` is set without a password, ignoring it"),
            },
            (None, Some(password)) => match &mut self.admin {
                Some(admin) => admin.password = password,
                None => warn!("`FEEDBACK_ADMIN_PASSWORD` is set without a username, ignoring it"),
            },
            (None, None) => {}
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        client::parse_base_url(&self.api.base_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(())
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_file_should_use_defaults() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(Config::default(), config);
        assert_eq!("http://127.0.0.1:5000/api", config.api.base_url);
        assert_eq!(10, config.api.timeout_secs);
        assert!(config.admin.is_none());
    }

    #[test]
    fn should_parse_every_section() {
        const TOML: &str = r#"
            session_file = "/tmp/session.json"

            [api]
            base_url = "https://feedback.example.com/api"
            timeout_secs = 3

            [admin]
            username = "root"
            password = "hunter22"
        "#;

        let config = Config::from_toml_str(TOML).unwrap();

        assert_eq!("https://feedback.example.com/api", config.api.base_url);
        assert_eq!(3, config.api.timeout_secs);
        assert_eq!("root", config.admin.as_ref().unwrap().username);
        assert_eq!(Some(PathBuf::from("/tmp/session.json")), config.session_file);
    }

    #[test]
    fn should_reject_unknown_keys() {
        let result = Config::from_toml_str("[api]\nbase = \"http://localhost\"");
        assert!(matches!(result, Err(ConfigError::MalformedConfig(_))));
    }

    #[test]
    fn should_reject_bad_base_url() {
        let result = Config::from_toml_str("[api]\nbase_url = \"localhost:5000\"");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));
    }

    #[test]
    fn env_should_override_file() {
        let mut config = Config::from_toml_str("[api]\ntimeout_secs = 3").unwrap();

        config
            .apply_env(env(&[
                ("FEEDBACK_API_URL", "http://10.0.0.2:8080/api"),
                ("FEEDBACK_API_TIMEOUT", "30"),
                ("FEEDBACK_ADMIN_USERNAME", "admin"),
                ("FEEDBACK_ADMIN_PASSWORD", "s3cret"),
            ]))
            .unwrap();

        assert_eq!("http://10.0.0.2:8080/api", config.api.base_url);
        assert_eq!(30, config.api.timeout_secs);
        assert_eq!("s3cret", config.admin.unwrap().password);
    }

    #[test]
    fn lone_admin_half_should_be_ignored() {
        let mut config = Config::default();

        config
            .apply_env(env(&[("FEEDBACK_ADMIN_PASSWORD", "s3cret")]))
            .unwrap();

        assert!(config.admin.is_none());
    }

    #[test]
    fn non_numeric_timeout_should_fail() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("FEEDBACK_API_TIMEOUT", "ten")]));

        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn debug_should_not_leak_password() {
        let credentials = AdminCredentials {
            username: "admin".to_owned(),
            password: "hunter22".to_owned(),
        };

        assert!(!format!("{credentials:?}").contains("hunter22"));
    }
}

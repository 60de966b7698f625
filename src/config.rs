//! Environment-based configuration.
//!
//! All settings are read once at startup into a [`Config`] that is passed
//! into the router state. Missing mail settings do not abort startup; they
//! put notification dispatch into a degraded mode (see [`crate::notify`]).

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use config::ConfigError;

pub trait EnvConfig: Sized {
    fn from_env() -> Result<Self, ConfigError>;
    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError>;
}

impl<D> EnvConfig for D
where
    D: DeserializeOwned,
{
    fn from_env() -> Result<Self, ConfigError> {
        let c = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .expect("basic config builder");
        c.try_deserialize()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let c = config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix))
            .build()
            .expect("basic config builder");
        c.try_deserialize()
    }
}

/// Service configuration.
///
/// Everything except `port` is optional: the service always accepts location
/// reports, and the dispatch decision degrades per missing value.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Notification recipient address.
    #[serde(default)]
    pub email_to: Option<String>,

    /// SMTP username, also used as the From address.
    #[serde(default)]
    pub email_user: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub email_pass: Option<String>,

    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP connection timeout in seconds.
    #[serde(default = "default_smtp_timeout")]
    pub smtp_timeout: u64,

    /// ipinfo.io token echoed by `GET /api-keys` for the client page.
    #[serde(default)]
    pub ipinfo_key: Option<String>,

    /// vpnapi.io key echoed by `GET /api-keys` for the client page.
    #[serde(default)]
    pub vpnapi_key: Option<String>,

    /// Directory holding the static client page.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            email_to: None,
            email_user: None,
            email_pass: None,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_timeout: default_smtp_timeout(),
            ipinfo_key: None,
            vpnapi_key: None,
            static_dir: default_static_dir(),
        }
    }
}

impl Config {
    /// SMTP credentials, present only when both halves are configured.
    pub fn smtp_credentials(&self) -> Option<(&str, &str)> {
        match (self.email_user.as_deref(), self.email_pass.as_deref()) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }
}

fn default_port() -> u16 {
    4000
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    10
}

fn default_static_dir() -> String {
    "static".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config: Config = serde_json::from_value(json!({})).unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.email_to, None);
        assert_eq!(config.smtp_credentials(), None);
    }

    #[test]
    fn credentials_require_both_user_and_pass() {
        let config = Config {
            email_user: Some("sender@example.com".into()),
            ..Config::default()
        };
        assert_eq!(config.smtp_credentials(), None);

        let config = Config {
            email_user: Some("sender@example.com".into()),
            email_pass: Some("hunter2".into()),
            ..Config::default()
        };
        assert_eq!(
            config.smtp_credentials(),
            Some(("sender@example.com", "hunter2"))
        );
    }
}

//! Configuration loaded from environment variables.
//!
//! Every value has a default except the secrets. The store section is
//! optional: without `SUPABASE_URL` and `SUPABASE_ANON_KEY` the server runs the
//! notification endpoints only.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `EMAIL_PROVIDER` | `resend` if `RESEND_API_KEY` is set, else `console` |
//! | `RESEND_API_URL` | `https://api.resend.com` |
//! | `EMAIL_FROM` | `Sathi <onboarding@resend.dev>` |
//! | `ADMIN_NOTIFICATION_EMAIL` | the operations inbox |
//! | `SMTP_PORT` | `587` |
//! | `FUNCTIONS_URL` | `{SUPABASE_URL}/functions/v1` |

use sathi_notifications::providers::DEFAULT_RESEND_API_URL;
use sathi_notifications::{DEFAULT_ADMIN_RECIPIENT, DEFAULT_SENDER};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set to something unusable
    #[error("{key} has invalid value {value:?}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Where outgoing email goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProviderKind {
    /// Resend HTTP API
    Resend,
    /// Plain SMTP relay
    Smtp,
    /// Logged, never sent
    Console,
}

impl EmailProviderKind {
    /// Lowercase name, as accepted in `EMAIL_PROVIDER`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resend => "resend",
            Self::Smtp => "smtp",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for EmailProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(Self::Resend),
            "smtp" => Ok(Self::Smtp),
            "console" => Ok(Self::Console),
            _ => Err(ConfigError::Invalid {
                key: "EMAIL_PROVIDER",
                value: s.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Listener settings
    pub server: ServerConfig,
    /// Email delivery
    pub email: EmailConfig,
    /// Hosted data store, when configured
    pub store: Option<StoreConfig>,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Email delivery settings
#[derive(Clone)]
pub struct EmailConfig {
    /// Selected provider
    pub provider: EmailProviderKind,
    /// Resend API key (required for `resend`)
    pub resend_api_key: Option<String>,
    /// Resend base URL
    pub resend_api_url: String,
    /// `From` header on every email
    pub from: String,
    /// Inbox that receives new-booking notifications
    pub admin_recipient: String,
    /// SMTP relay (required for `smtp`)
    pub smtp: Option<SmtpConfig>,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("provider", &self.provider)
            .field("resend_api_url", &self.resend_api_url)
            .field("from", &self.from)
            .field("admin_recipient", &self.admin_recipient)
            .field("smtp", &self.smtp)
            .finish_non_exhaustive()
    }
}

/// SMTP relay settings
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay host
    pub server: String,
    /// Relay port
    pub port: u16,
    /// Login
    pub username: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Hosted data store settings
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project URL
    pub supabase_url: String,
    /// Public anon key
    pub anon_key: String,
    /// Base URL of the deployed notification functions
    pub functions_url: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("supabase_url", &self.supabase_url)
            .field("functions_url", &self.functions_url)
            .finish_non_exhaustive()
    }
}

/// Admin console credentials
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin email
    pub email: String,
    /// Admin password
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Read a variable, treating an empty value as unset
fn var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_port<F>(lookup: &F, key: &'static str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(lookup, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value })
    })
}

impl Config {
    /// Load from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable value or a missing secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key-value source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable value or a missing secret.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: var(&lookup, "HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_port(&lookup, "PORT", 8080)?,
        };

        Ok(Self {
            server,
            email: EmailConfig::from_lookup(&lookup)?,
            store: StoreConfig::from_lookup(&lookup)?,
        })
    }
}

impl EmailConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resend_api_key = var(lookup, "RESEND_API_KEY");
        let provider = match var(lookup, "EMAIL_PROVIDER") {
            Some(value) => value.parse()?,
            None if resend_api_key.is_some() => EmailProviderKind::Resend,
            None => EmailProviderKind::Console,
        };

        if provider == EmailProviderKind::Resend && resend_api_key.is_none() {
            return Err(ConfigError::Missing("RESEND_API_KEY"));
        }

        let smtp = if provider == EmailProviderKind::Smtp {
            Some(SmtpConfig {
                server: var(lookup, "SMTP_SERVER").ok_or(ConfigError::Missing("SMTP_SERVER"))?,
                port: parse_port(lookup, "SMTP_PORT", 587)?,
                username: var(lookup, "SMTP_USERNAME").ok_or(ConfigError::Missing("SMTP_USERNAME"))?,
                password: var(lookup, "SMTP_PASSWORD").ok_or(ConfigError::Missing("SMTP_PASSWORD"))?,
            })
        } else {
            None
        };

        Ok(Self {
            provider,
            resend_api_key,
            resend_api_url: var(lookup, "RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            from: var(lookup, "EMAIL_FROM").unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            admin_recipient: var(lookup, "ADMIN_NOTIFICATION_EMAIL")
                .unwrap_or_else(|| DEFAULT_ADMIN_RECIPIENT.to_string()),
            smtp,
        })
    }
}

impl StoreConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(supabase_url) = var(lookup, "SUPABASE_URL") else {
            return Ok(None);
        };
        let supabase_url = supabase_url.trim_end_matches('/').to_string();
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                value: supabase_url,
            });
        }
        let anon_key = var(lookup, "SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let functions_url = var(lookup, "FUNCTIONS_URL")
            .unwrap_or_else(|| format!("{supabase_url}/functions/v1"));

        Ok(Some(Self {
            supabase_url,
            anon_key,
            functions_url,
        }))
    }
}

impl AdminCredentials {
    /// Read `SATHI_ADMIN_EMAIL` and `SATHI_ADMIN_PASSWORD`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the credentials from any key-value source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if either is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            email: var(&lookup, "SATHI_ADMIN_EMAIL").ok_or(ConfigError::Missing("SATHI_ADMIN_EMAIL"))?,
            password: var(&lookup, "SATHI_ADMIN_PASSWORD")
                .ok_or(ConfigError::Missing("SATHI_ADMIN_PASSWORD"))?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.email.provider, EmailProviderKind::Console);
        assert_eq!(config.email.from, "Sathi <onboarding@resend.dev>");
        assert_eq!(config.email.admin_recipient, DEFAULT_ADMIN_RECIPIENT);
        assert_eq!(config.email.resend_api_url, "https://api.resend.com");
        assert!(config.store.is_none());
    }

    #[test]
    fn test_resend_chosen_when_key_present() {
        let config = load(&[("RESEND_API_KEY", "re_test")]).unwrap();
        assert_eq!(config.email.provider, EmailProviderKind::Resend);
    }

    #[test]
    fn test_explicit_resend_needs_key() {
        let err = load(&[("EMAIL_PROVIDER", "resend")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("RESEND_API_KEY"));
    }

    #[test]
    fn test_smtp_settings() {
        let config = load(&[
            ("EMAIL_PROVIDER", "SMTP"),
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "secret"),
        ])
        .unwrap();
        let smtp = config.email.smtp.unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.server, "smtp.example.com");
        assert!(!format!("{smtp:?}").contains("secret"));
    }

    #[test]
    fn test_smtp_needs_server() {
        let err = load(&[("EMAIL_PROVIDER", "smtp")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SMTP_SERVER"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = load(&[("EMAIL_PROVIDER", "carrier-pigeon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "EMAIL_PROVIDER", .. }));
    }

    #[test]
    fn test_bad_port_rejected() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_store_derives_functions_url() {
        let config = load(&[
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ])
        .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.supabase_url, "https://abc.supabase.co");
        assert_eq!(store.functions_url, "https://abc.supabase.co/functions/v1");
    }

    #[test]
    fn test_store_needs_anon_key() {
        let err = load(&[("SUPABASE_URL", "https://abc.supabase.co")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn test_admin_credentials() {
        let err = AdminCredentials::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SATHI_ADMIN_EMAIL"));

        let credentials = AdminCredentials::from_lookup(|key| match key {
            "SATHI_ADMIN_EMAIL" => Some("admin@example.com".to_string()),
            "SATHI_ADMIN_PASSWORD" => Some("hunter2".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}

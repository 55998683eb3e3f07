//! Client configuration, either built in code or read from the environment

use std::env;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Default HTTPS port of the IdP
pub const DEFAULT_PORT: u16 = 443;

/// Realm used by a fresh IdP install
pub const DEFAULT_REALM: &str = "secureauth1";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection and credential settings for a single IdP realm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Application ID issued by the realm's API settings
    pub app_id: String,
    /// Hex-encoded application key paired with `app_id`
    pub app_key: String,
    /// IdP host name, without scheme
    pub host: String,
    /// IdP port
    pub port: u16,
    /// Realm name, the first path segment of every API URL
    pub realm: String,
    /// Whether to talk HTTPS (`true`) or plain HTTP
    pub use_https: bool,
    /// Accept self-signed or otherwise invalid certificates
    pub accept_invalid_certs: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with HTTPS, certificate validation and the
    /// default timeout.
    #[must_use]
    pub fn new(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            host: host.into(),
            port,
            realm: realm.into(),
            use_https: true,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Reads the configuration from `SAIDP_*` environment variables
    ///
    /// `SAIDP_APP_ID`, `SAIDP_APP_KEY` and `SAIDP_HOST` are required.
    /// `SAIDP_PORT`, `SAIDP_REALM`, `SAIDP_USE_HTTPS`, `SAIDP_SELF_SIGNED` and
    /// `SAIDP_TIMEOUT_SECS` fall back to defaults when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> ClientResult<Self> {
        let app_id = required_var("SAIDP_APP_ID")?;
        let app_key = required_var("SAIDP_APP_KEY")?;
        let host = required_var("SAIDP_HOST")?;

        let port = parsed_var("SAIDP_PORT", DEFAULT_PORT)?;
        let realm = env::var("SAIDP_REALM")
            .map_or_else(|_| DEFAULT_REALM.to_string(), |val| val.trim().to_string());
        let use_https = bool_var("SAIDP_USE_HTTPS", true)?;
        let accept_invalid_certs = bool_var("SAIDP_SELF_SIGNED", false)?;
        let timeout_secs = parsed_var("SAIDP_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            app_id,
            app_key,
            host,
            port,
            realm,
            use_https,
            accept_invalid_certs,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Sets whether requests use HTTPS
    #[must_use]
    pub const fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Sets whether self-signed certificates are accepted
    #[must_use]
    pub const fn with_self_signed(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Sets the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL scheme for the configured transport security
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }

    /// `{scheme}://{host}:{port}`
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Path prefix shared by every endpoint, e.g. `/secureauth1`
    #[must_use]
    pub fn realm_path(&self) -> String {
        format!("/{}", self.realm.trim_matches('/'))
    }

    pub(crate) fn validate(&self) -> ClientResult<()> {
        if self.app_id.trim().is_empty() {
            return Err(ClientError::Config("app_id must not be empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if self.realm.trim_matches('/').trim().is_empty() {
            return Err(ClientError::Config("realm must not be empty".to_string()));
        }
        Ok(())
    }
}

fn required_var(name: &str) -> ClientResult<String> {
    env::var(name)
        .map(|val| val.trim().to_string())
        .map_err(|_| ClientError::Config(format!("{name} environment variable is not set")))
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> ClientResult<T> {
    env::var(name).map_or(Ok(default), |val| {
        val.trim()
            .parse::<T>()
            .map_err(|_| ClientError::Config(format!("{name} has an invalid value: {val}")))
    })
}

fn bool_var(name: &str, default: bool) -> ClientResult<bool> {
    env::var(name).map_or(Ok(default), |val| {
        match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ClientError::Config(format!(
                "{name} has an invalid value: {val}"
            ))),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    const ALL_VARS: [&str; 8] = [
        "SAIDP_APP_ID",
        "SAIDP_APP_KEY",
        "SAIDP_HOST",
        "SAIDP_PORT",
        "SAIDP_REALM",
        "SAIDP_USE_HTTPS",
        "SAIDP_SELF_SIGNED",
        "SAIDP_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for name in ALL_VARS {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_applies_defaults() {
        clear_env();
        env::set_var("SAIDP_APP_ID", "app-id");
        env::set_var("SAIDP_APP_KEY", "00ff");
        env::set_var("SAIDP_HOST", "idp.example.com");

        let config = ClientConfig::from_env().unwrap();

        assert_eq!(
            config,
            ClientConfig::new("app-id", "00ff", "idp.example.com", 443, "secureauth1")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        env::set_var("SAIDP_APP_ID", "app-id");
        env::set_var("SAIDP_APP_KEY", "00ff");
        env::set_var("SAIDP_HOST", "localhost");
        env::set_var("SAIDP_PORT", "8443");
        env::set_var("SAIDP_REALM", "secureauth2");
        env::set_var("SAIDP_USE_HTTPS", "false");
        env::set_var("SAIDP_SELF_SIGNED", "true");
        env::set_var("SAIDP_TIMEOUT_SECS", "5");

        let config = ClientConfig::from_env().unwrap();

        assert_eq!(config.port, 8443);
        assert_eq!(config.realm, "secureauth2");
        assert!(!config.use_https);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.origin(), "http://localhost:8443");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_host() {
        clear_env();
        env::set_var("SAIDP_APP_ID", "app-id");
        env::set_var("SAIDP_APP_KEY", "00ff");

        let err = ClientConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("SAIDP_HOST"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_port() {
        clear_env();
        env::set_var("SAIDP_APP_ID", "app-id");
        env::set_var("SAIDP_APP_KEY", "00ff");
        env::set_var("SAIDP_HOST", "localhost");
        env::set_var("SAIDP_PORT", "not-a-port");

        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_realm_path_strips_slashes() {
        let config = ClientConfig::new("id", "00", "host", 443, "/secureauth1/");
        assert_eq!(config.realm_path(), "/secureauth1");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        assert!(ClientConfig::new("", "00", "host", 443, "realm").validate().is_err());
        assert!(ClientConfig::new("id", "00", " ", 443, "realm").validate().is_err());
        assert!(ClientConfig::new("id", "00", "host", 443, "/").validate().is_err());
        assert!(ClientConfig::new("id", "00", "host", 443, "realm").validate().is_ok());
    }
}

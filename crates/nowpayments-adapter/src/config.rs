/*
[INPUT]:  YAML configuration file or NOWPAYMENTS_* environment variables
[OUTPUT]: Parsed client settings (credentials + connection options)
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::{
    ClientConfig, Credentials, NowPaymentsError, PRODUCTION_BASE_URL, Result, SANDBOX_BASE_URL,
};

pub const ENV_API_KEY: &str = "NOWPAYMENTS_API_KEY";
pub const ENV_SESSION_TOKEN: &str = "NOWPAYMENTS_SESSION_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "NOWPAYMENTS_TIMEOUT_SECS";
pub const ENV_BASE_URL: &str = "NOWPAYMENTS_BASE_URL";
pub const ENV_SANDBOX: &str = "NOWPAYMENTS_SANDBOX";
pub const ENV_IPN_SECRET: &str = "NOWPAYMENTS_IPN_SECRET";

/// Client settings
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Merchant API key sent as `x-api-key`
    pub api_key: String,
    /// JWT from a previous login, for gated endpoints
    #[serde(default)]
    pub session_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API root override; takes precedence over `sandbox`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Use the sandbox API root
    #[serde(default)]
    pub sandbox: bool,
    /// IPN secret from the merchant dashboard
    #[serde(default)]
    pub ipn_secret: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .field("sandbox", &self.sandbox)
            .field("ipn_secret", &self.ipn_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            session_token: None,
            timeout_secs: default_timeout_secs(),
            base_url: None,
            sandbox: false,
            ipn_secret: None,
        }
    }

    /// Parse settings from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(content)
            .map_err(|e| NowPaymentsError::Config(format!("invalid settings yaml: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NowPaymentsError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load settings through a variable lookup function
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| NowPaymentsError::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut settings = Self::new(api_key);
        settings.session_token = lookup(ENV_SESSION_TOKEN).filter(|token| !token.is_empty());
        settings.base_url = lookup(ENV_BASE_URL).filter(|url| !url.is_empty());
        settings.ipn_secret = lookup(ENV_IPN_SECRET).filter(|secret| !secret.is_empty());

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            settings.timeout_secs = raw.trim().parse().map_err(|_| {
                NowPaymentsError::Config(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_SANDBOX) {
            settings.sandbox = parse_flag(&raw).ok_or_else(|| {
                NowPaymentsError::Config(format!("{ENV_SANDBOX} must be true or false, got {raw:?}"))
            })?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(NowPaymentsError::Config("api_key must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(NowPaymentsError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// API root after applying `base_url` and `sandbox`
    pub fn resolved_base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url,
            None if self.sandbox => SANDBOX_BASE_URL,
            None => PRODUCTION_BASE_URL,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.resolved_base_url())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(self.api_key.clone());
        match &self.session_token {
            Some(token) => credentials.with_session_token(token.clone()),
            None => credentials,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_yaml_defaults() {
        let settings = Settings::from_yaml_str("api_key: key-1\n").unwrap();
        assert_eq!(settings.api_key, "key-1");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.session_token.is_none());
        assert_eq!(settings.resolved_base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_yaml_full() {
        let yaml = r#"
api_key: key-1
session_token: jwt-abc
timeout_secs: 5
sandbox: true
ipn_secret: ipn
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.resolved_base_url(), SANDBOX_BASE_URL);
        assert_eq!(settings.client_config().timeout, Duration::from_secs(5));
        assert_eq!(settings.credentials().session_token(), Some("jwt-abc"));
        assert_eq!(settings.ipn_secret.as_deref(), Some("ipn"));
    }

    #[test]
    fn test_yaml_missing_api_key() {
        let err = Settings::from_yaml_str("sandbox: true\n").unwrap_err();
        assert!(matches!(err, NowPaymentsError::Config(_)));
    }

    #[test]
    fn test_env_lookup() {
        let settings = Settings::from_env_with(lookup(&[
            (ENV_API_KEY, "key-2"),
            (ENV_TIMEOUT_SECS, "12"),
            (ENV_BASE_URL, "http://localhost:8080/v1/"),
            (ENV_SANDBOX, "true"),
            (ENV_SESSION_TOKEN, ""),
        ]))
        .unwrap();
        assert_eq!(settings.timeout_secs, 12);
        assert_eq!(settings.resolved_base_url(), "http://localhost:8080/v1/");
        assert!(settings.session_token.is_none());
    }

    #[test]
    fn test_env_errors() {
        assert!(matches!(
            Settings::from_env_with(lookup(&[])),
            Err(NowPaymentsError::Config(_))
        ));
        assert!(
            Settings::from_env_with(lookup(&[(ENV_API_KEY, "k"), (ENV_TIMEOUT_SECS, "soon")]))
                .is_err()
        );
        assert!(
            Settings::from_env_with(lookup(&[(ENV_API_KEY, "k"), (ENV_SANDBOX, "maybe")])).is_err()
        );
        assert!(Settings::from_env_with(lookup(&[(ENV_API_KEY, " ")])).is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let mut settings = Settings::new("secret-key");
        settings.session_token = Some("secret-jwt".to_string());
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("secret-jwt"));
    }
}

//! Environment-driven configuration
//!
//! Expected environment variables:
//! - SF_LOGIN_URL: Salesforce login endpoint (optional, defaults to production)
//! - SF_USERNAME: Username (required)
//! - SF_PASSWORD: Password (required)
//! - SF_SECURITY_TOKEN: Security token appended to the password (optional)
//! - SF_API_VERSION: API version without the leading `v` (optional, defaults to 62.0)
//! - SF_REPORT_LAST_RUN_DATE: Only extract reports run after this timestamp (optional)

use crate::client::Credentials;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Filters applied to the report listing
///
/// Serialized into the run summary as `queryConfig`, so an empty config
/// shows up as `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_date: Option<String>,
}

impl ExtractConfig {
    pub fn new(last_run_date: Option<String>) -> Self {
        Self { last_run_date }
    }

    /// Load the listing filters from `SF_REPORT_LAST_RUN_DATE`
    ///
    /// An unset or empty variable means "no filter".
    pub fn from_env() -> Self {
        let last_run_date = std::env::var("SF_REPORT_LAST_RUN_DATE")
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self { last_run_date }
    }
}

impl std::fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.last_run_date {
            Some(date) => write!(f, "{{ lastRunDate: {} }}", date),
            None => write!(f, "{{}}"),
        }
    }
}

/// Connection settings for the Salesforce org
#[derive(Debug)]
pub struct Settings {
    pub login_url: Url,
    pub api_version: String,
    pub credentials: Credentials,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let login_url_str =
            std::env::var("SF_LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string());
        let login_url = Url::parse(&login_url_str)
            .with_context(|| format!("Invalid SF_LOGIN_URL: {}", login_url_str))?;

        let username =
            std::env::var("SF_USERNAME").context("SF_USERNAME environment variable not set")?;
        let password =
            std::env::var("SF_PASSWORD").context("SF_PASSWORD environment variable not set")?;
        let security_token = std::env::var("SF_SECURITY_TOKEN").unwrap_or_default();

        let api_version = std::env::var("SF_API_VERSION")
            .ok()
            .map(|v| v.trim().trim_start_matches('v').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        Ok(Self {
            login_url,
            api_version,
            credentials: Credentials::new(username, password, security_token),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "SF_LOGIN_URL",
        "SF_USERNAME",
        "SF_PASSWORD",
        "SF_SECURITY_TOKEN",
        "SF_API_VERSION",
        "SF_REPORT_LAST_RUN_DATE",
    ];

    fn clear_env() {
        unsafe {
            for var in VARS {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_extract_config_without_filter() {
        clear_env();
        let config = ExtractConfig::from_env();
        assert_eq!(config, ExtractConfig::default());
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
    }

    #[test]
    #[serial_test::serial]
    fn test_extract_config_with_filter() {
        clear_env();
        unsafe {
            std::env::set_var("SF_REPORT_LAST_RUN_DATE", "2024-01-01T00:00:00Z");
        }

        let config = ExtractConfig::from_env();
        assert_eq!(config.last_run_date.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"lastRunDate":"2024-01-01T00:00:00Z"}"#
        );

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_extract_config_blank_filter_is_absent() {
        clear_env();
        unsafe {
            std::env::set_var("SF_REPORT_LAST_RUN_DATE", "  ");
        }
        assert!(ExtractConfig::from_env().last_run_date.is_none());
        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_settings_missing_username() {
        clear_env();
        let result = Settings::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SF_USERNAME"));
    }

    #[test]
    #[serial_test::serial]
    fn test_settings_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("SF_USERNAME", "user@example.com");
            std::env::set_var("SF_PASSWORD", "hunter2");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.login_url.as_str(), "https://login.salesforce.com/");
        assert_eq!(settings.api_version, "62.0");
        assert_eq!(settings.credentials.username(), "user@example.com");

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_settings_invalid_login_url() {
        clear_env();
        unsafe {
            std::env::set_var("SF_LOGIN_URL", "not-a-valid-url");
            std::env::set_var("SF_USERNAME", "user@example.com");
            std::env::set_var("SF_PASSWORD", "hunter2");
        }

        let result = Settings::from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid SF_LOGIN_URL")
        );

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_settings_api_version_strips_prefix() {
        clear_env();
        unsafe {
            std::env::set_var("SF_USERNAME", "user@example.com");
            std::env::set_var("SF_PASSWORD", "hunter2");
            std::env::set_var("SF_API_VERSION", "v60.0");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.api_version, "60.0");

        clear_env();
    }
}

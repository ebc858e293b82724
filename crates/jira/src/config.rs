//! Configuration for the Jira client.

use std::env;
use std::fmt;

use reqwest::Url;

use crate::error::{JiraError, Result};

/// Base URL of the Jira instance.
pub const ENV_URL: &str = "JIRA_URL";
/// User for basic authentication.
pub const ENV_USER: &str = "JIRA_USER";
/// Password or API key for basic authentication.
pub const ENV_PASSWORD: &str = "JIRA_PASSWORD";
/// Personal access token, sent as a bearer token.
pub const ENV_PAT_TOKEN: &str = "JIRA_PAT_TOKEN";
/// Name of an extra header sent with every request.
pub const ENV_CUSTOM_AUTH_HEADER_KEY: &str = "JIRA_CUSTOM_AUTH_HEADER_KEY";
/// Value of the extra header.
pub const ENV_CUSTOM_AUTH_HEADER_VALUE: &str = "JIRA_CUSTOM_AUTH_HEADER_VALUE";

/// How requests authenticate against Jira.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP basic auth with user and password/API key.
    Basic { username: String, password: String },
    /// Personal access token.
    Bearer { token: String },
    /// No credentials (only useful behind an authenticating proxy).
    Anonymous,
}

impl Auth {
    /// Pick the auth mode from optional credentials.
    ///
    /// A PAT token wins over user/password.
    #[must_use]
    pub fn resolve(
        user: Option<String>,
        password: Option<String>,
        pat_token: Option<String>,
    ) -> Self {
        if let Some(token) = non_empty(pat_token) {
            return Self::Bearer { token };
        }
        match non_empty(user) {
            Some(username) => Self::Basic {
                username,
                password: password.unwrap_or_default(),
            },
            None => Self::Anonymous,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Jira client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Jira instance, including any context path.
    pub base_url: String,
    /// Authentication mode.
    pub auth: Auth,
    /// Extra header (name, value) sent with every request.
    pub custom_header: Option<(String, String)>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field(
                "custom_header",
                &self.custom_header.as_ref().map(|(key, _)| key),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL and auth.
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            custom_header: None,
        }
    }

    /// Attach an extra header to every request.
    #[must_use]
    pub fn with_custom_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_header = Some((key.into(), value.into()));
        self
    }

    /// Build the configuration from `JIRA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url = env_var(ENV_URL)
            .ok_or_else(|| JiraError::Config(format!("{ENV_URL} is not set")))?;

        let auth = Auth::resolve(
            env_var(ENV_USER),
            env_var(ENV_PASSWORD),
            env_var(ENV_PAT_TOKEN),
        );

        let custom_header = custom_header(
            env_var(ENV_CUSTOM_AUTH_HEADER_KEY),
            env_var(ENV_CUSTOM_AUTH_HEADER_VALUE),
        )?;

        let config = Self {
            base_url,
            auth,
            custom_header,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration and return the parsed base URL.
    ///
    /// The returned URL always ends with `/` so endpoints resolve below it.
    pub fn validate(&self) -> Result<Url> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(JiraError::Config("base url must not be empty".to_string()));
        }

        let mut normalized = trimmed.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }

        let url = Url::parse(&normalized)
            .map_err(|e| JiraError::Config(format!("invalid base url '{trimmed}': {e}")))?;
        if url.cannot_be_a_base() {
            return Err(JiraError::Config(format!(
                "base url '{trimmed}' cannot be used as a base"
            )));
        }

        if let Some((key, _)) = &self.custom_header {
            if key.trim().is_empty() {
                return Err(JiraError::Config(
                    "custom auth header key must not be empty".to_string(),
                ));
            }
        }

        Ok(url)
    }
}

/// Pair up the custom header key and value; one without the other is an error.
pub fn custom_header(
    key: Option<String>,
    value: Option<String>,
) -> Result<Option<(String, String)>> {
    match (non_empty(key), non_empty(value)) {
        (Some(key), Some(value)) => Ok(Some((key, value))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(JiraError::Config(
            "custom auth header key is set but the value is missing".to_string(),
        )),
        (None, Some(_)) => Err(JiraError::Config(
            "custom auth header value is set but the key is missing".to_string(),
        )),
    }
}

fn env_var(name: &str) -> Option<String> {
    non_empty(env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 6] = [
        ENV_URL,
        ENV_USER,
        ENV_PASSWORD,
        ENV_PAT_TOKEN,
        ENV_CUSTOM_AUTH_HEADER_KEY,
        ENV_CUSTOM_AUTH_HEADER_VALUE,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_pat_token_takes_precedence() {
        let auth = Auth::resolve(
            Some("admin".to_string()),
            Some("secret".to_string()),
            Some("pat".to_string()),
        );
        assert_eq!(
            auth,
            Auth::Bearer {
                token: "pat".to_string()
            }
        );
    }

    #[test]
    fn test_basic_auth_allows_empty_password() {
        let auth = Auth::resolve(Some("admin".to_string()), None, Some(String::new()));
        assert_eq!(
            auth,
            Auth::Basic {
                username: "admin".to_string(),
                password: String::new()
            }
        );
    }

    #[test]
    fn test_no_credentials_is_anonymous() {
        assert_eq!(Auth::resolve(None, None, None), Auth::Anonymous);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new(
            "https://jira.example.com",
            Auth::Basic {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            },
        )
        .with_custom_header("X-Proxy-Auth", "s3cret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("admin"));
        assert!(rendered.contains("X-Proxy-Auth"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_validate_appends_trailing_slash() {
        let config = ClientConfig::new("https://jira.example.com/jira", Auth::Anonymous);
        let url = config.validate().unwrap();
        assert_eq!(url.as_str(), "https://jira.example.com/jira/");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(ClientConfig::new("", Auth::Anonymous).validate().is_err());
        assert!(ClientConfig::new("not a url", Auth::Anonymous)
            .validate()
            .is_err());
    }

    #[test]
    fn test_half_configured_custom_header_is_rejected() {
        assert!(custom_header(Some("X-Key".to_string()), None).is_err());
        assert!(custom_header(None, Some("value".to_string())).is_err());
        assert_eq!(custom_header(None, Some(String::new())).unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_all_variables() {
        clear_env();
        env::set_var(ENV_URL, "https://jira.example.com");
        env::set_var(ENV_USER, "admin");
        env::set_var(ENV_PASSWORD, "secret");
        env::set_var(ENV_CUSTOM_AUTH_HEADER_KEY, "X-Proxy");
        env::set_var(ENV_CUSTOM_AUTH_HEADER_VALUE, "token");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://jira.example.com");
        assert_eq!(
            config.auth,
            Auth::Basic {
                username: "admin".to_string(),
                password: "secret".to_string()
            }
        );
        assert_eq!(
            config.custom_header,
            Some(("X-Proxy".to_string(), "token".to_string()))
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_url() {
        clear_env();
        let err = ClientConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_URL));
    }
}

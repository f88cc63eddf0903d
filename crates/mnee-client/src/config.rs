//! Client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use mnee_tokens::MneeError;

/// Default lifetime of a cached system configuration.
pub const DEFAULT_CONFIG_TTL: Duration = Duration::from_secs(60 * 60);

/// MNEE deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Production.
    Main,
    /// Sandbox.
    #[default]
    Sandbox,
}

impl Environment {
    /// API base URL of this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Main => "https://proxy-api.mnee.net",
            Environment::Sandbox => "https://sandbox-proxy-api.mnee.net",
        }
    }
}

impl FromStr for Environment {
    type Err = MneeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MAIN" => Ok(Environment::Main),
            "SANDBOX" => Ok(Environment::Sandbox),
            other => Err(MneeError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Main => f.write_str("MAIN"),
            Environment::Sandbox => f.write_str("SANDBOX"),
        }
    }
}

/// Configuration for [`Mnee`](crate::Mnee) and [`HttpLedger`](crate::HttpLedger).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deployment.
    pub environment: Environment,
    /// API token appended to every request.
    pub auth_token: String,
    /// Overrides the environment's base URL.
    pub base_url: Option<String>,
    /// How long a fetched system configuration stays fresh.
    pub config_ttl: Duration,
    /// Per-request timeout; none by default.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `environment` authenticated with `auth_token`.
    pub fn new(environment: Environment, auth_token: impl Into<String>) -> Self {
        ClientConfig {
            environment,
            auth_token: auth_token.into(),
            ..Default::default()
        }
    }

    /// Base URL requests go to, without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            environment: Environment::default(),
            auth_token: String::new(),
            base_url: None,
            config_ttl: DEFAULT_CONFIG_TTL,
            request_timeout: None,
        }
    }
}

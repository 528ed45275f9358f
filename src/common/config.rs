//! Client configuration.

use std::env;
use std::time::Duration;

use crate::common::error::{Error, Result};

/// Connection settings for a [`crate::CalDavClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the principal's calendar home, always ending in `/`.
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout applied by the transport.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

    /// Create a configuration for `base_url`. A trailing `/` is appended when missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(base_url.into()),
            username: None,
            password: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calendav/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Build a configuration from `CALDAV_URL`, `CALDAV_USERNAME`, `CALDAV_PASSWORD` and
    /// `CALDAV_TIMEOUT_SECS`. Only the URL is required.
    pub fn from_env() -> Result<Self> {
        let url = env::var("CALDAV_URL").map_err(|_| Error::InvalidArgument {
            name: "CALDAV_URL",
            reason: "environment variable is not set",
        })?;
        let mut config = Self::new(url);
        if let (Ok(user), Ok(pass)) = (env::var("CALDAV_USERNAME"), env::var("CALDAV_PASSWORD")) {
            config = config.with_credentials(user, pass);
        }
        if let Ok(raw) = env::var("CALDAV_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| Error::InvalidArgument {
                name: "CALDAV_TIMEOUT_SECS",
                reason: "must be a whole number of seconds",
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn normalize_base(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

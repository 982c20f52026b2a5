use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::constants::{defaults, envvars};
use crate::data_mgmt::cache::DuplicatePolicy;
use crate::error::{Result, UplinkError};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(UplinkError::Config("username and password must not be empty".into()));
        }
        Ok(Self { username, password })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(required_var(envvars::USERNAME)?, required_var(envvars::PASSWORD)?)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Client configuration, built once at startup and handed to [`crate::UplinkClient::connect`].
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub api_base_url: String,
    pub cache_dir: PathBuf,
    pub duplicate_policy: DuplicatePolicy,
    pub timezone: Tz,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(credentials: Credentials) -> Self {
        Config {
            credentials,
            api_base_url: defaults::API_BASE_URL.to_string(),
            cache_dir: PathBuf::from(defaults::CACHE_DIR),
            duplicate_policy: DuplicatePolicy::default(),
            timezone: defaults::TIMEZONE,
            request_timeout: defaults::API_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Config::new(Credentials::from_env()?);

        if let Some(url) = optional_var(envvars::API_URL) {
            config.api_base_url = url;
        }
        if let Some(dir) = optional_var(envvars::CACHE_DIR) {
            config.cache_dir = dir.into();
        }
        if let Some(policy) = optional_var(envvars::CACHE_DUPLICATES) {
            config.duplicate_policy = policy.parse()?;
        }
        if let Some(tz) = optional_var(envvars::TIMEZONE) {
            config.timezone = tz.parse::<Tz>().map_err(|e| {
                UplinkError::Config(format!("invalid {}: {e}", envvars::TIMEZONE))
            })?;
        }
        if let Some(secs) = optional_var(envvars::REQUEST_TIMEOUT_SECS) {
            config.request_timeout = match secs.parse::<u64>() {
                Ok(s) if s > 0 => Duration::from_secs(s),
                _ => {
                    return Err(UplinkError::Config(format!(
                        "{} must be a positive number of seconds, got '{secs}'",
                        envvars::REQUEST_TIMEOUT_SECS
                    )))
                }
            };
        }

        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name).ok_or_else(|| UplinkError::Config(format!("{name} is not set")))
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

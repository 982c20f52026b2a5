use std::time::Duration;

pub const API_BASE_URL: &str = "https://internalapi.myuplink.com/";
pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const CACHE_DIR: &str = "cache";
pub const FETCH_DAYS: u32 = 30;
pub const LOG_LEVEL: &str = "INFO";
pub const TIMEZONE: chrono_tz::Tz = chrono_tz::Europe::Helsinki;

pub const OAUTH_CLIENT_ID: &str = "My-Uplink-Web";
pub const OAUTH_GRANT_TYPE: &str = "password";

pub const PLOT_OUTPUT: &str = "plot.svg";
pub const PLOT_SIZE: (u32, u32) = (1280, 720);

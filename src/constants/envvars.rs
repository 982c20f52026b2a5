pub const USERNAME: &str = "UPLINK_USERNAME";
pub const PASSWORD: &str = "UPLINK_PASSWORD";

pub const API_URL: &str = "UPLINK_API_URL";
pub const CACHE_DIR: &str = "UPLINK_CACHE_DIR";
pub const CACHE_DUPLICATES: &str = "UPLINK_CACHE_DUPLICATES";
pub const TIMEZONE: &str = "UPLINK_TIMEZONE";
pub const REQUEST_TIMEOUT_SECS: &str = "UPLINK_REQUEST_TIMEOUT_SECS";

pub const LOG_LEVEL: &str = "LOG_LEVEL";

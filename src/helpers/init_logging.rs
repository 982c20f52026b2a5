use env_logger::Env;

use crate::constants::{defaults, envvars};

/// Initialize env_logger, filtered by LOG_LEVEL (default INFO).
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();
}

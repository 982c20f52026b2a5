use thiserror::Error;

#[derive(Error, Debug)]
pub enum UplinkError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("empty result: {0}")]
    EmptyResult(String),
    #[error("cannot plot empty table '{0}'")]
    EmptyTable(String),
    #[error("plot error: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for UplinkError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => {
                UplinkError::Transport(format!("unexpected HTTP status {code}"))
            }
            ureq::Error::Json(e) => UplinkError::Parse(e.to_string()),
            other => UplinkError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for UplinkError {
    fn from(err: serde_json::Error) -> Self {
        UplinkError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UplinkError>;

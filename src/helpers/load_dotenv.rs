use std::path::PathBuf;

/// Load `.env` from the working directory or its parents.
///
/// Runs before the logger exists so `LOG_LEVEL` can come from the file; the caller
/// logs the outcome once logging is up. A missing file is `Ok(None)`.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenv::Error> {
    match dotenv::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

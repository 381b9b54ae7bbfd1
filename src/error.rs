use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `EpisynthError` and maps other errors to
/// convert to an `EpisynthError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpisynthError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    ReportError(String),
    EpisynthError(String),
}

impl From<io::Error> for EpisynthError {
    fn from(error: io::Error) -> Self {
        EpisynthError::IoError(error)
    }
}

impl From<serde_json::Error> for EpisynthError {
    fn from(error: serde_json::Error) -> Self {
        EpisynthError::JsonError(error)
    }
}

impl From<csv::Error> for EpisynthError {
    fn from(error: csv::Error) -> Self {
        EpisynthError::CsvError(error)
    }
}

impl From<String> for EpisynthError {
    fn from(error: String) -> Self {
        EpisynthError::EpisynthError(error)
    }
}

impl From<&str> for EpisynthError {
    fn from(error: &str) -> Self {
        EpisynthError::EpisynthError(error.to_string())
    }
}

impl std::error::Error for EpisynthError {}

impl Display for EpisynthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}

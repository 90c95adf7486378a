use thiserror::Error;
use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The unit table requires a '{0}' column for clustering")]
    MissingColumn(String),

    #[error("Method argument (\"{0}\") not recognized in the clustering function")]
    UnknownMethod(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    pub fn missing_column<S: Into<String>>(column: S) -> Self {
        Error::MissingColumn(column.into())
    }

    /// True for errors caused by the caller's table or settings rather than the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Config(_) | Error::MissingColumn(_) | Error::UnknownMethod(_))
    }
}

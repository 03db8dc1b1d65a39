use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TgnError>;

/// Every variant is fatal to the stage that raised it.
#[derive(Error, Debug)]
pub enum TgnError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Query error: {0}")]
    Query(String),

    #[error("Malformed snapshot {}: {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    #[error("Graph write error: {0}")]
    Write(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),
}

impl TgnError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TgnError::Io {
            path: path.into(),
            source,
        }
    }
}

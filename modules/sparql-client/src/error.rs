use thiserror::Error;

pub type Result<T> = std::result::Result<T, SparqlError>;

#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for SparqlError {
    fn from(err: reqwest::Error) -> Self {
        SparqlError::Network(err.to_string())
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentifierError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for IdentifierError {
    fn from(err: reqwest::Error) -> Self {
        IdentifierError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IdentifierError>;

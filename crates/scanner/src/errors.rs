use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("Unsupported scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

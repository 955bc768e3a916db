use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Processing cancelled after {collected} result(s)")]
    Cancelled { collected: usize },

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ProcessError>;

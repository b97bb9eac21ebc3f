use thiserror::Error;

pub type ShoeboxResult<T> = Result<T, ShoeboxError>;

#[derive(Debug, Error)]
pub enum ShoeboxError {
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

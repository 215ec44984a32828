use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("business key must not be empty")]
    EmptyBusinessKey,
    #[error("unknown feed: {0}")]
    UnknownFeed(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

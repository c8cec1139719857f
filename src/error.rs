use thiserror::Error;

/// Errors raised by bush operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BushError {
    /// An argument did not refer to a usable node.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, BushError>;

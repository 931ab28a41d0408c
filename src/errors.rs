use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid range arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid range bounds: {0}")]
    InvalidBounds(String),

    #[error("Range has no start to step from")]
    UndefinedStart,

    #[error("Invalid step interval: {0}")]
    InvalidInterval(String),

    #[error("Could not parse interval: {0}")]
    UnrecognizedInterval(String),
}

pub type Result<T> = std::result::Result<T, Error>;

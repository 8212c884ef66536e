use thiserror::Error as ThisError;

/// A raw attribute value fell outside a closed enumeration.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("Cannot decode {value} as {target}")]
pub struct DecodeError {
    /// Name of the enumeration being decoded into.
    pub target: &'static str,
    /// The offending raw value, rendered for logging.
    pub value: String,
}

impl DecodeError {
    pub fn new(target: &'static str, value: impl ToString) -> Self {
        Self {
            target,
            value: value.to_string(),
        }
    }
}

#[derive(ThisError, Debug)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid attribute path: {0}")]
    InvalidAttributePath(String),

    #[error("Invalid discovery schema: {0}")]
    InvalidSchema(String),

    #[error("Node not found: {0}")]
    NodeNotFound(u64),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

/// Errors raised by the splitter, the classifier and the evaluation suite.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// An input violates the contract of the operation (range, length, dimension).
    InvalidArgument(String),
    /// The object is not in a state that allows the operation (e.g. not fitted).
    InvalidState(String),
}

impl ClassifierError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        ClassifierError::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        ClassifierError::InvalidState(msg.into())
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ClassifierError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
        }
    }
}

impl Error for ClassifierError {}

impl From<ShapeError> for ClassifierError {
    fn from(err: ShapeError) -> Self {
        ClassifierError::InvalidArgument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

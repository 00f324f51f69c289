use alloc::string::String;
use core::{error, fmt};

/// Errors raised by the core array routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Argument passed into a routine was invalid.
    InvalidArg {
        /// The invalid arg.
        arg: &'static str,
        /// Explaining why arg is invalid.
        reason: String,
    },
    /// Two operands disagree on a shared axis.
    ShapeMismatch {
        /// Name of the offending argument.
        arg: &'static str,
        /// Required extent.
        expected: usize,
        /// Received extent.
        got: usize,
    },
}

/// Result alias for core routines.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::ShapeMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Shape mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
        }
    }
}

impl error::Error for Error {}

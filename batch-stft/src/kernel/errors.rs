use alloc::string::String;
use core::fmt;

/// Validation errors raised at kernel construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration argument value is invalid.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A window function tag did not name a known window.
    UnknownWindow {
        /// The unrecognized tag.
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::UnknownWindow { name } => {
                write!(f, "Unknown window function `{name}`.")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// An execution precondition was violated.
    InvalidState {
        /// Human readable reason.
        reason: &'static str,
    },
    /// An input or output axis did not have the extent the kernel requires.
    ShapeMismatch {
        /// Name of the argument and axis.
        arg: &'static str,
        /// Required extent.
        expected: usize,
        /// Received extent.
        got: usize,
    },
    /// Kernel configuration failure.
    Config(ConfigError),
    /// Failure inside a core array routine.
    Core(batch_stft_core::Error),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<batch_stft_core::Error> for ExecInvariantViolation {
    fn from(value: batch_stft_core::Error) -> Self {
        Self::Core(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::InvalidState { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            ExecInvariantViolation::ShapeMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Shape mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
            ExecInvariantViolation::Core(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecInvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecInvariantViolation::Config(err) => Some(err),
            ExecInvariantViolation::Core(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_offending_argument() {
        let err = ExecInvariantViolation::ShapeMismatch {
            arg: "input.channels",
            expected: 10,
            got: 9,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch on `input.channels`. Expected 10, got 9."
        );

        let err: ExecInvariantViolation = ConfigError::UnknownWindow {
            name: "hanning-ish".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown window function `hanning-ish`.");
    }
}

//! Error types surfaced by `Failsafe::execute`.
use std::fmt;

/// The failsafe was asked to run without being fully configured.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no protected operation configured; call `run` before `execute`")]
    MissingOperation,
}

/// Error returned by `Failsafe::execute`.
///
/// A failure no handler matched and a failure a handler chose to propagate are both reported
/// as [`FailsafeError::Failed`]; the original failure is kept as the `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailsafeError<E> {
    /// Fatal misconfiguration. Nothing was run.
    Config(ConfigError),
    /// The protected operation failed and the failure was re-raised.
    Failed { attempt: u32, cause: E },
}

impl<E: fmt::Display> fmt::Display for FailsafeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "failsafe misconfigured: {}", e),
            Self::Failed { attempt, cause } => {
                write!(f, "protected operation failed on attempt {}: {}", attempt, cause)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for FailsafeError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Failed { cause, .. } => Some(cause),
        }
    }
}

impl<E> From<ConfigError> for FailsafeError<E> {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl<E> FailsafeError<E> {
    /// True when `execute` refused to run.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// True when the protected operation's failure was re-raised.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Attempt on which the re-raised failure occurred.
    pub fn attempt(&self) -> Option<u32> {
        match self {
            Self::Failed { attempt, .. } => Some(*attempt),
            Self::Config(_) => None,
        }
    }

    /// Borrow the original failure, if any.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::Failed { cause, .. } => Some(cause),
            Self::Config(_) => None,
        }
    }

    /// Take the original failure, if any.
    pub fn into_cause(self) -> Option<E> {
        match self {
            Self::Failed { cause, .. } => Some(cause),
            Self::Config(_) => None,
        }
    }
}

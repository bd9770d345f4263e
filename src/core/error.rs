//! Error types for the pricing kernel

use thiserror::Error;

use crate::numerics::NumericError;

/// Broad failure categories shared by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    UnsupportedModelOrMethod,
    NumericalNonConvergence,
    DomainInfeasible,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported model or method: {0}")]
    UnsupportedModelOrMethod(String),

    #[error("Numerical non-convergence: {0}")]
    NumericalNonConvergence(String),

    #[error("Domain infeasible: {0}")]
    DomainInfeasible(String),
}

pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedModelOrMethod(msg.into())
    }

    pub fn non_convergence(msg: impl Into<String>) -> Self {
        Self::NumericalNonConvergence(msg.into())
    }

    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::DomainInfeasible(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::UnsupportedModelOrMethod(_) => ErrorKind::UnsupportedModelOrMethod,
            Self::NumericalNonConvergence(_) => ErrorKind::NumericalNonConvergence,
            Self::DomainInfeasible(_) => ErrorKind::DomainInfeasible,
        }
    }

    /// Caller mistakes that no retry can fix.
    ///
    /// Numerical and domain failures are not fatal: other settings or another
    /// market price may succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidParameter | ErrorKind::UnsupportedModelOrMethod
        )
    }
}

impl From<NumericError> for KernelError {
    fn from(err: NumericError) -> Self {
        match err {
            NumericError::NoBracket { .. } => Self::DomainInfeasible(err.to_string()),
            NumericError::InvalidInput(_) => Self::InvalidParameter(err.to_string()),
            NumericError::MaxIterations { .. }
            | NumericError::SubdivisionLimit { .. }
            | NumericError::TailNotNegligible { .. }
            | NumericError::NonFinite { .. } => Self::NumericalNonConvergence(err.to_string()),
        }
    }
}

/// Reject NaN and infinities before they reach any formula.
pub fn ensure_finite(name: &str, value: f64) -> KernelResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KernelError::invalid_parameter(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

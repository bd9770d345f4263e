//! Errors raised by the numerical routines

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("no sign change on [{lo}, {hi}]")]
    NoBracket { lo: f64, hi: f64 },

    #[error("root-finder did not converge within {iterations} iterations")]
    MaxIterations { iterations: usize },

    #[error(
        "quadrature error {error:.3e} above tolerance {tolerance:.3e} \
         after {subdivisions} subdivisions"
    )]
    SubdivisionLimit {
        subdivisions: usize,
        error: f64,
        tolerance: f64,
    },

    #[error("integrand envelope still above {threshold:.3e} at truncation bound {bound}")]
    TailNotNegligible { bound: f64, threshold: f64 },

    #[error("non-finite value encountered at x = {at}")]
    NonFinite { at: f64 },

    #[error("invalid numerical input: {0}")]
    InvalidInput(String),
}

pub type NumericResult<T> = Result<T, NumericError>;

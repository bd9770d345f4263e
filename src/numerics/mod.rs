//! Shared numerics
//!
//! Pure functions used by every engine:
//! - Standard normal CDF/PDF
//! - Complex arithmetic helpers for characteristic functions
//! - Brent root-finder on a bracketing interval
//! - Adaptive Gauss-Kronrod quadrature with tail truncation
//! - Power-of-two FFT
//!
//! Nothing here holds state. Every routine takes its iteration or
//! subdivision limit as an explicit argument so callers can always bound
//! the work done.

pub mod complex;
pub mod distributions;
pub mod error;
pub mod fft;
pub mod quadrature;
pub mod roots;

pub use complex::*;
pub use distributions::*;
pub use error::*;
pub use fft::*;
pub use quadrature::*;
pub use roots::*;

//! Power-of-two discrete Fourier transform
//!
//! Backed by `rustfft`. A planner is built per call and all scratch space is
//! owned by the call, so concurrent transforms never share buffers.

use num_complex::Complex64;
use rustfft::FftPlanner;

use super::error::{NumericError, NumericResult};

fn check_len(n: usize) -> NumericResult<()> {
    if n < 2 || !n.is_power_of_two() {
        return Err(NumericError::InvalidInput(format!(
            "fft length must be a power of two >= 2, got {}",
            n
        )));
    }
    Ok(())
}

/// Forward DFT: `X_k = Σ_j x_j e^{-2πi jk/N}`
pub fn fft(input: &[Complex64]) -> NumericResult<Vec<Complex64>> {
    check_len(input.len())?;
    let mut buffer = input.to_vec();
    FftPlanner::<f64>::new()
        .plan_fft_forward(buffer.len())
        .process(&mut buffer);
    Ok(buffer)
}

/// Inverse DFT, normalised by `1/N` so that `ifft(fft(x)) == x`
pub fn ifft(input: &[Complex64]) -> NumericResult<Vec<Complex64>> {
    check_len(input.len())?;
    let mut buffer = input.to_vec();
    FftPlanner::<f64>::new()
        .plan_fft_inverse(buffer.len())
        .process(&mut buffer);
    let scale = 1.0 / buffer.len() as f64;
    for z in buffer.iter_mut() {
        *z *= scale;
    }
    Ok(buffer)
}

/// Zero-pad a sequence up to the next power of two (minimum 2).
pub fn pad_to_power_of_two(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len().max(2).next_power_of_two();
    let mut out = input.to_vec();
    out.resize(n, Complex64::new(0.0, 0.0));
    out
}

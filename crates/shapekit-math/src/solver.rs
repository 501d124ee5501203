//! Bracketing root finder used by auxiliary utilities.

use thiserror::Error;
use tracing::debug;

/// Errors raised by [`bisect`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// `f(lo) - target` and `f(hi) - target` have the same sign.
    #[error("no sign change in bracket [{lo}, {hi}]")]
    NoSignChange {
        /// Lower bracket bound.
        lo: f64,
        /// Upper bracket bound.
        hi: f64,
    },

    /// The iteration budget ran out before the bracket shrank below tolerance.
    #[error("bisection did not converge after {iterations} iterations (bracket width {bracket_width})")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
        /// Width of the remaining bracket.
        bracket_width: f64,
    },
}

/// Find `x` in `[lo, hi]` with `f(x) ≈ target` by bisection.
///
/// Converges when the bracket is narrower than `tolerance` or `f(x)` hits
/// `target` exactly. A bracket endpoint that already matches is returned
/// directly.
pub fn bisect<F>(
    f: F,
    target: f64,
    lo: f64,
    hi: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64, SolverError>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut g_lo = f(lo) - target;
    let g_hi = f(hi) - target;

    if g_lo == 0.0 {
        return Ok(lo);
    }
    if g_hi == 0.0 {
        return Ok(hi);
    }
    if g_lo.signum() == g_hi.signum() {
        return Err(SolverError::NoSignChange { lo, hi });
    }

    for iteration in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        let g_mid = f(mid) - target;
        if g_mid == 0.0 || (hi - lo) < tolerance {
            debug!(iterations = iteration, x = mid, "bisection converged");
            return Ok(mid);
        }
        if g_mid.signum() == g_lo.signum() {
            lo = mid;
            g_lo = g_mid;
        } else {
            hi = mid;
        }
    }

    Err(SolverError::NotConverged {
        iterations: max_iterations,
        bracket_width: hi - lo,
    })
}

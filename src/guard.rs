//! Precision & input validation
//!
//! Runs once, before any PSLQ state exists. Every check here guards against a
//! caller mistake or an unachievable request, as opposed to the invariants
//! checked during iteration (see [`crate::builder`] and [`crate::iterate`]),
//! which guard against bugs in *this* crate.

use rug::Float;

use crate::error::GuardError;
use crate::numeric::{epsilon, two_over_sqrt3, ulp_distance, Real};

/// Validate `x`, `gamma`, and `max_norm`; return the derived `tau` on success.
///
/// `x` must already be sorted in the caller's desired order (ascending,
/// strictly positive). This function checks that the property holds, it
/// does not sort.
pub fn validate(x: &[Real], max_norm: &Real, gamma: &Real, prec: u32) -> Result<Real, GuardError> {
    let n = x.len();
    if n < 2 {
        return Err(GuardError::InputTooShort(n));
    }

    for (i, xi) in x.iter().enumerate() {
        if *xi <= Float::with_val(prec, 0) {
            return Err(GuardError::InputNonPositive(i));
        }
    }

    for i in 1..n {
        if x[i - 1] >= x[i] {
            return Err(GuardError::InputNotSorted(i - 1, i));
        }
    }

    for i in 1..n {
        let dist = ulp_distance(&x[i - 1], &x[i], prec);
        if dist <= Float::with_val(prec, 2) {
            return Err(GuardError::InputIndistinguishable {
                i: i - 1,
                j: i,
                ulps: dist.to_f64(),
                prec,
            });
        }
    }

    let floor = two_over_sqrt3(prec);
    if *gamma <= floor {
        return Err(GuardError::GammaOutOfRange(gamma.to_f64()));
    }

    // tau = 1 / sqrt(1/4 + 1/gamma^2)
    let quarter = Float::with_val(prec, 0.25);
    let inv_gamma_sq = Float::with_val(prec, 1) / (gamma.clone() * gamma);
    let tau = Float::with_val(prec, 1) / (quarter + inv_gamma_sq).sqrt();
    if tau <= Float::with_val(prec, 1) || tau >= Float::with_val(prec, 2) {
        return Err(GuardError::TauOutOfRange(tau.to_f64()));
    }

    let mut norm_sq = Float::with_val(prec, 0);
    for xi in x {
        norm_sq += xi.clone() * xi;
    }
    let eps = epsilon(prec);
    let achievable = (max_norm.clone() * max_norm) * norm_sq.clone();
    let limit = Float::with_val(prec, 1) / &eps;
    if achievable >= limit {
        let max_permissible = Float::with_val(prec, 1) / (norm_sq * eps).sqrt();
        return Err(GuardError::PrecisionInsufficient {
            max_permissible: max_permissible.to_f64(),
            prec,
        });
    }

    Ok(tau)
}

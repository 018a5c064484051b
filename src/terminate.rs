//! Post-round checks: relation detection, residual validation, norm bound
//!
//! Runs once after every [`crate::iterate::one_round`] call; never mutates
//! `H`/`y`/the ledger, only reads them.

use rug::Float;

use crate::builder::HMatrix;
use crate::ledger::IntegerLedger;
use crate::numeric::{epsilon, Int, Real};

/// Outcome of inspecting one round.
pub enum RoundVerdict {
    /// A relation `r` was found; `residual_warning` is set when `|r.x|`
    /// exceeds the `16*eps*S` tolerance.
    Relation {
        /// Non-zero integer coefficients paired with their original reals.
        relation: Vec<(Int, Real)>,
        /// Set when the residual exceeds tolerance (carries `(residual, magnitude_sum)`).
        residual_warning: Option<(Real, Real)>,
    },
    /// No zero entry in `y` yet; iteration should continue. Carries the
    /// current certified norm bound.
    Continue {
        /// `1 / max_i |H[i][i]|`, today's certified lower bound on any
        /// undetected relation's Euclidean norm.
        norm_bound: Real,
    },
    /// The certified norm bound reached or exceeded the caller's limit with
    /// no relation found.
    NoRelation {
        /// The norm bound at the point of termination.
        norm_bound: Real,
    },
}

/// The empirical threshold exponent used to decide "y_i is indistinguishable
/// from zero": `eps^{15/16}` by default.
pub const DEFAULT_ZERO_THRESHOLD_EXPONENT: f64 = 15.0 / 16.0;

/// Inspect the state after a round and decide whether to return a relation,
/// terminate with no relation, or continue.
pub fn check_round(
    x: &[Real],
    y: &[Real],
    h: &HMatrix,
    ledger: &IntegerLedger,
    max_norm: &Real,
    prec: u32,
    zero_threshold_exponent: f64,
) -> RoundVerdict {
    let eps = epsilon(prec);
    let zero_threshold = eps.clone().pow_f64(zero_threshold_exponent, prec);

    for (idx, yi) in y.iter().enumerate() {
        if yi.clone().abs() < zero_threshold {
            let r = ledger.b_column(idx);
            return build_relation(x, r, &eps, prec);
        }
    }

    let n = h.len();
    let mut max_diag = Float::with_val(prec, 0);
    for i in 0..n - 1 {
        let d = h[i][i].clone().abs();
        if d > max_diag {
            max_diag = d;
        }
    }
    let norm_bound = if max_diag == Float::with_val(prec, 0) {
        Float::with_val(prec, f64::INFINITY)
    } else {
        Float::with_val(prec, 1) / max_diag
    };

    if norm_bound >= *max_norm {
        RoundVerdict::NoRelation { norm_bound }
    } else {
        RoundVerdict::Continue { norm_bound }
    }
}

fn build_relation(x: &[Real], r: Vec<Int>, eps: &Real, prec: u32) -> RoundVerdict {
    let mut rho = Float::with_val(prec, 0);
    let mut s = Float::with_val(prec, 0);
    let mut relation = Vec::new();
    for (ri, xi) in r.iter().zip(x.iter()) {
        if *ri == rug::Integer::from(0) {
            continue;
        }
        let term = Float::with_val(prec, ri) * xi;
        rho += term.clone();
        s += term.abs();
        relation.push((ri.clone(), xi.clone()));
    }

    let tolerance = Float::with_val(prec, 16) * eps * &s;
    let residual_warning = if rho.clone().abs() > tolerance {
        Some((rho, s))
    } else {
        None
    };

    RoundVerdict::Relation {
        relation,
        residual_warning,
    }
}

/// Extension trait giving `Real` a `pow_f64` that works with `rug::Float`'s
/// API (which only exposes integer and `Float` exponents directly).
trait PowF64 {
    fn pow_f64(self, exp: f64, prec: u32) -> Real;
}

impl PowF64 for Real {
    fn pow_f64(self, exp: f64, prec: u32) -> Real {
        // eps^exp = exp(exp * ln(eps))
        let ln_eps = self.ln();
        let scaled = ln_eps * Float::with_val(prec, exp);
        scaled.exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    #[test]
    fn continues_when_no_zero_entry_present() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (y, h) = builder::build(&x, prec).unwrap();
        let ledger = IntegerLedger::identity(3, None);
        let max_norm = Float::with_val(prec, 1e12);
        match check_round(&x, &y, &h, &ledger, &max_norm, prec, DEFAULT_ZERO_THRESHOLD_EXPONENT) {
            RoundVerdict::Continue { .. } => {}
            _ => panic!("expected Continue"),
        }
    }

    #[test]
    fn detects_relation_when_y_entry_is_near_zero() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.0]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (mut y, h) = builder::build(&x, prec).unwrap();
        y[1] = Float::with_val(prec, 0);
        let ledger = IntegerLedger::identity(3, None);
        let max_norm = Float::with_val(prec, 1e12);
        match check_round(&x, &y, &h, &ledger, &max_norm, prec, DEFAULT_ZERO_THRESHOLD_EXPONENT) {
            RoundVerdict::Relation { relation, .. } => {
                assert!(!relation.is_empty());
            }
            _ => panic!("expected Relation"),
        }
    }

    #[test]
    fn signals_no_relation_once_norm_bound_reaches_limit() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (y, h) = builder::build(&x, prec).unwrap();
        let ledger = IntegerLedger::identity(3, None);
        let tiny_max_norm = Float::with_val(prec, 0.5);
        match check_round(&x, &y, &h, &ledger, &tiny_max_norm, prec, DEFAULT_ZERO_THRESHOLD_EXPONENT) {
            RoundVerdict::NoRelation { .. } => {}
            _ => panic!("expected NoRelation"),
        }
    }
}

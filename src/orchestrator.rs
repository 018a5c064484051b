//! Public entry point
//!
//! Ties [`crate::guard`], [`crate::builder`], [`crate::ledger`],
//! [`crate::reduce`], [`crate::iterate`], and [`crate::terminate`] into the
//! single function external callers use.

use rug::Float;
use tracing::{debug, warn};

use crate::builder;
use crate::error::{IterateError, PslqError};
use crate::guard;
use crate::iterate;
use crate::ledger::IntegerLedger;
use crate::numeric::{int_to_real, two_over_sqrt3, Int, Real};
use crate::reduce::full_reduce;
use crate::terminate::{check_round, RoundVerdict, DEFAULT_ZERO_THRESHOLD_EXPONENT};

/// Knobs the orchestrator exposes beyond the bare `(x, max_norm, gamma)`
/// triple: precision, the empirical zero-detection threshold, an optional
/// cap on ledger entry size, and the emergency-termination multiplier.
#[derive(Debug, Clone)]
pub struct PslqConfig {
    /// Working precision, in bits of mantissa, for every `Real` used
    /// internally. Default 256 bits (~77 decimal digits).
    pub precision_bits: u32,
    /// Exponent `k` in the empirical zero-detection threshold `eps^k`.
    /// Default `15/16`.
    pub zero_threshold_exponent: f64,
    /// Optional cap, in bits, on any single integer ledger entry. `None`
    /// (the default) leaves the `rug::Integer`-backed ledger unbounded.
    pub max_ledger_bits: Option<u32>,
    /// How many multiples of the advertised iteration budget (see
    /// [`iteration_budget`]) to allow before giving up with
    /// [`IterateError::BudgetExceeded`].
    pub budget_multiplier: usize,
}

impl Default for PslqConfig {
    fn default() -> Self {
        Self {
            precision_bits: 256,
            zero_threshold_exponent: DEFAULT_ZERO_THRESHOLD_EXPONENT,
            max_ledger_bits: None,
            budget_multiplier: 10,
        }
    }
}

/// The result of a completed, non-cancelled, non-erroring invocation.
#[derive(Debug, Clone)]
pub enum PslqOutcome {
    /// A non-zero integer relation was found.
    Relation(Vec<(Int, Real)>),
    /// No relation exists below `max_norm`; carries the certified bound the
    /// search reached.
    NoRelation {
        /// The norm bound at the point of termination.
        reached_norm_bound: Real,
    },
}

/// A warning attached to an otherwise-successful [`PslqReport`].
#[derive(Debug, Clone)]
pub enum PslqWarning {
    /// The relation's residual exceeded the `16*eps*S` tolerance. The
    /// inputs likely don't carry their full declared precision.
    LargeResidual {
        /// `|sum r_j x_j|`.
        residual: Real,
        /// `sum |r_j x_j|`.
        magnitude_sum: Real,
    },
}

/// Full report from [`pslq_with_config`]: the outcome, how many rounds it
/// took, and any non-fatal warning.
#[derive(Debug, Clone)]
pub struct PslqReport {
    /// What was found (or not).
    pub outcome: PslqOutcome,
    /// Number of PSLQ rounds executed.
    pub rounds: usize,
    /// Set when the returned relation's residual exceeded tolerance.
    pub warning: Option<PslqWarning>,
}

/// The advertised iteration budget: `ceil(C(n,2) * log(gamma^(n-1) * max_norm) / log(tau))`.
///
/// Used only to size the emergency-termination cap; exceeding it is not
/// itself an error, only a multiple of it is (see [`PslqConfig::budget_multiplier`]).
pub fn iteration_budget(n: usize, gamma: &Real, tau: &Real, max_norm: &Real, prec: u32) -> usize {
    let pairs = (n * (n.saturating_sub(1))) / 2;
    let gamma_pow = {
        let mut acc = Float::with_val(prec, 1);
        for _ in 0..n.saturating_sub(1) {
            acc *= gamma;
        }
        acc
    };
    let numerator = (gamma_pow * max_norm).ln();
    let denominator = tau.clone().ln();
    if denominator <= Float::with_val(prec, 0) || numerator <= Float::with_val(prec, 0) {
        return pairs.max(1);
    }
    let rounds = (numerator / denominator).ceil();
    let rounds_u = rounds.to_f64().max(1.0) as usize;
    pairs.saturating_mul(rounds_u).max(1)
}

/// Simple entry point: default precision and config, no cancellation.
///
/// `gamma` defaults to `2/sqrt(3) + 0.01` when the caller passes `None`.
pub fn pslq(
    x: Vec<Real>,
    max_norm: Real,
    gamma: Option<Real>,
) -> Result<Option<Vec<(Int, Real)>>, PslqError> {
    let config = PslqConfig::default();
    let prec = config.precision_bits;
    let gamma = gamma.unwrap_or_else(|| default_gamma(prec));
    let report = pslq_with_config(x, max_norm, gamma, &config, None)?;
    Ok(match report.outcome {
        PslqOutcome::Relation(r) => Some(r),
        PslqOutcome::NoRelation { .. } => None,
    })
}

/// Default `gamma = 2/sqrt(3) + 0.01` at the given precision.
pub fn default_gamma(prec: u32) -> Real {
    two_over_sqrt3(prec) + Float::with_val(prec, 0.01)
}

/// Fully-parameterised entry point.
pub fn pslq_with_config(
    x: Vec<Real>,
    max_norm: Real,
    gamma: Real,
    config: &PslqConfig,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<PslqReport, PslqError> {
    let prec = config.precision_bits;
    let tau = guard::validate(&x, &max_norm, &gamma, prec)?;

    let n = x.len();
    let (mut y, mut h) = builder::build(&x, prec)?;
    let mut ledger = IntegerLedger::identity(n, config.max_ledger_bits);

    full_reduce(&mut h, &mut y, &mut ledger, n, prec)?;

    let budget = iteration_budget(n, &gamma, &tau, &max_norm, prec);
    let emergency_cap = budget.saturating_mul(config.budget_multiplier);

    let mut previous_bound: Option<Real> = None;
    let mut rounds = 0usize;

    loop {
        rounds += 1;
        if rounds > emergency_cap.max(1) {
            return Err(PslqError::from(IterateError::BudgetExceeded {
                budget,
                multiplier: config.budget_multiplier,
            }));
        }

        let pivot = iterate::one_round(&mut h, &mut y, &mut ledger, &gamma, n, prec, cancel)?;
        debug!(round = rounds, pivot, "completed PSLQ round");

        match check_round(&x, &y, &h, &ledger, &max_norm, prec, config.zero_threshold_exponent) {
            RoundVerdict::Relation {
                relation,
                residual_warning,
            } => {
                let warning = residual_warning.map(|(residual, magnitude_sum)| {
                    warn!(
                        round = rounds,
                        "relation residual exceeds tolerance; inputs may not carry full precision"
                    );
                    PslqWarning::LargeResidual {
                        residual,
                        magnitude_sum,
                    }
                });
                return Ok(PslqReport {
                    outcome: PslqOutcome::Relation(relation),
                    rounds,
                    warning,
                });
            }
            RoundVerdict::NoRelation { norm_bound } => {
                return Ok(PslqReport {
                    outcome: PslqOutcome::NoRelation {
                        reached_norm_bound: norm_bound,
                    },
                    rounds,
                    warning: None,
                });
            }
            RoundVerdict::Continue { norm_bound } => {
                if let Some(prev) = &previous_bound {
                    if norm_bound < *prev {
                        warn!(
                            round = rounds,
                            "norm bound regressed round-over-round; continuing but this \
                             indicates numerical trouble"
                        );
                    }
                }
                previous_bound = Some(norm_bound);
            }
        }
    }
}

/// Recover a full integer vector (including zero coefficients) from a sparse
/// relation as returned by [`pslq`], aligned against the original input
/// order. Convenience helper for callers (e.g. a dictionary front-end) that
/// want a dense coefficient vector rather than `(coeff, value)` pairs.
pub fn dense_coefficients(x: &[Real], relation: &[(Int, Real)], prec: u32) -> Vec<Int> {
    let mut out = vec![rug::Integer::from(0); x.len()];
    for (coeff, value) in relation {
        if let Some(idx) = x.iter().position(|xi| {
            (xi.clone() - value).abs() < Float::with_val(prec, 1e-30)
        }) {
            out[idx] = coeff.clone();
        }
    }
    out
}

/// Residual `sum r_j x_j` for an arbitrary candidate relation, useful for
/// callers that want to re-validate a relation returned from a prior run.
pub fn residual(x: &[Real], r: &[Int], prec: u32) -> Real {
    let mut acc = Float::with_val(prec, 0);
    for (ri, xi) in r.iter().zip(x.iter()) {
        acc += int_to_real(ri, prec) * xi;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(prec: u32, v: f64) -> Real {
        Float::with_val(prec, v)
    }

    #[test]
    fn two_element_ratio_returns_expected_relation() {
        let prec = 256;
        // x = (2, 3): relation should be (3, -2) or (-3, 2) up to sign.
        let x = vec![r(prec, 2.0), r(prec, 3.0)];
        let config = PslqConfig { precision_bits: prec, ..Default::default() };
        let report = pslq_with_config(x.clone(), r(prec, 1e6), default_gamma(prec), &config, None)
            .expect("pslq should run to completion");
        match report.outcome {
            PslqOutcome::Relation(relation) => {
                assert_eq!(relation.len(), 2);
                let coeffs: Vec<i64> = relation.iter().map(|(c, _)| c.to_i64().unwrap()).collect();
                let product_ok = coeffs[0] * 2 + coeffs[1] * 3 == 0;
                assert!(product_ok, "relation {coeffs:?} does not annihilate (2, 3)");
            }
            PslqOutcome::NoRelation { .. } => panic!("expected a relation for (2, 3)"),
        }
    }

    #[test]
    fn max_norm_below_minimal_relation_finds_nothing() {
        let prec = 256;
        let x = vec![r(prec, 2.0), r(prec, 3.0)];
        let config = PslqConfig { precision_bits: prec, ..Default::default() };
        // The minimal relation for (2,3) has norm sqrt(13) ~ 3.6; set the
        // ceiling below that.
        let report = pslq_with_config(x, r(prec, 1.5), default_gamma(prec), &config, None).unwrap();
        match report.outcome {
            PslqOutcome::NoRelation { .. } => {}
            PslqOutcome::Relation(r) => panic!("expected no relation, got {r:?}"),
        }
    }

    #[test]
    fn cancellation_propagates_as_error() {
        let prec = 256;
        let x = vec![r(prec, 2.0), r(prec, 3.0), r(prec, 5.0)];
        let config = PslqConfig { precision_bits: prec, ..Default::default() };
        let cancel = || true;
        let err = pslq_with_config(x, r(prec, 1e6), default_gamma(prec), &config, Some(&cancel))
            .unwrap_err();
        assert!(matches!(err, PslqError::Iterate(IterateError::Cancelled)));
    }

    #[test]
    fn log_relation_ln2_ln3_ln6() {
        let prec = 512;
        let ln2 = Float::with_val(prec, 2).ln();
        let ln3 = Float::with_val(prec, 3).ln();
        let ln6 = Float::with_val(prec, 6).ln();
        let x = vec![ln2, ln3, ln6];
        let config = PslqConfig { precision_bits: prec, ..Default::default() };
        let report = pslq_with_config(x, r(prec, 1e8), default_gamma(prec), &config, None).unwrap();
        match report.outcome {
            PslqOutcome::Relation(relation) => {
                assert_eq!(relation.len(), 3);
            }
            PslqOutcome::NoRelation { .. } => panic!("expected the classic log relation"),
        }
    }
}

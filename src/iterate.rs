//! One PSLQ round: pivot selection, row exchange, corner removal, partial
//! re-reduction
//!
//! A round never recomputes the whole reduction, only the sub-diagonal
//! entries that the swap could have disturbed, from the swapped-in row down.

use rug::Float;

use crate::builder::HMatrix;
use crate::error::IterateError;
use crate::ledger::IntegerLedger;
use crate::numeric::Real;
use crate::reduce::reduction_step;

/// Select the pivot row `m` maximising `gamma^{m+1} * |H[m][m]|`.
///
/// Ties broken by lowest index, which keeps the iteration deterministic
/// across implementations (see the design notes on pivot tie-breaking).
pub fn select_pivot(h: &HMatrix, gamma: &Real, n: usize) -> usize {
    let mut best_m = 0usize;
    let mut best_weight: Option<Real> = None;
    let mut gamma_pow = gamma.clone();
    for m in 0..n - 1 {
        let weight = gamma_pow.clone() * h[m][m].clone().abs();
        let take = match &best_weight {
            None => true,
            Some(b) => weight > *b,
        };
        if take {
            best_weight = Some(weight);
            best_m = m;
        }
        gamma_pow *= gamma;
    }
    best_m
}

/// Run one full PSLQ round in place, returning the pivot index used.
///
/// `cancel`, if present, is polled once per round between pivot selection and
/// the row swap; a `true` result aborts the round with
/// [`IterateError::Cancelled`] before any mutation past the pivot choice.
pub fn one_round(
    h: &mut HMatrix,
    y: &mut [Real],
    ledger: &mut IntegerLedger,
    gamma: &Real,
    n: usize,
    prec: u32,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<usize, IterateError> {
    let m = select_pivot(h, gamma, n);

    if let Some(check) = cancel {
        if check() {
            return Err(IterateError::Cancelled);
        }
    }

    y.swap(m, m + 1);
    h.swap(m, m + 1);
    ledger.swap_rows(m);

    if n >= 3 && m <= n - 3 {
        remove_corner(h, m, n, prec);
    }

    for i in (m + 1)..n {
        let upper = (i - 1).min(m + 1);
        for j in (0..=upper).rev() {
            reduction_step(h, y, ledger, i, j, prec)?;
        }
    }

    Ok(m)
}

/// Givens-style rotation zeroing the `(m, m+1)` corner entry created by the
/// row swap, applied to rows `m..n` of columns `m`, `m+1`.
fn remove_corner(h: &mut HMatrix, m: usize, n: usize, prec: u32) {
    let hmm = h[m][m].clone();
    let hmm1 = h[m][m + 1].clone();
    let t0 = (hmm.clone() * &hmm + hmm1.clone() * &hmm1).sqrt();
    if t0 == Float::with_val(prec, 0) {
        return;
    }
    let t1 = hmm / &t0;
    let t2 = hmm1 / &t0;

    for i in m..n {
        let a = h[i][m].clone();
        let b = h[i][m + 1].clone();
        h[i][m] = t1.clone() * &a + t2.clone() * &b;
        h[i][m + 1] = -t2.clone() * &a + t1.clone() * &b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;

    fn setup(prec: u32, vals: &[f64]) -> (Vec<Real>, HMatrix, IntegerLedger) {
        let x: Vec<Real> = vals.iter().map(|v| Float::with_val(prec, *v)).collect();
        let (y, h) = builder::build(&x, prec).unwrap();
        let n = x.len();
        let ledger = IntegerLedger::identity(n, None);
        (y, h, ledger)
    }

    #[test]
    fn one_round_preserves_trapezoidal_shape() {
        let prec = 256;
        let gamma = Float::with_val(prec, 2) / Float::with_val(prec, 3).sqrt() + Float::with_val(prec, 0.01);
        let (mut y, mut h, mut ledger) = setup(prec, &[1.0, 2.0, 3.5, 7.25, 11.0]);
        let n = 5;
        one_round(&mut h, &mut y, &mut ledger, &gamma, n, prec, None).unwrap();
        for i in 0..n {
            for j in 0..n - 1 {
                if j > i {
                    assert_eq!(h[i][j], Float::with_val(prec, 0));
                }
            }
        }
    }

    #[test]
    fn one_round_preserves_ab_identity() {
        let prec = 256;
        let gamma = Float::with_val(prec, 2) / Float::with_val(prec, 3).sqrt() + Float::with_val(prec, 0.01);
        let (mut y, mut h, mut ledger) = setup(prec, &[1.0, 2.0, 3.5, 7.25]);
        let n = 4;
        one_round(&mut h, &mut y, &mut ledger, &gamma, n, prec, None).unwrap();
        let prod = ledger.product();
        for i in 0..n {
            for j in 0..n {
                let expect = if i == j { 1 } else { 0 };
                assert_eq!(prod[i][j], rug::Integer::from(expect));
            }
        }
    }

    #[test]
    fn cancellation_is_observed_before_mutation() {
        let prec = 256;
        let gamma = Float::with_val(prec, 2) / Float::with_val(prec, 3).sqrt() + Float::with_val(prec, 0.01);
        let (mut y, mut h, mut ledger) = setup(prec, &[1.0, 2.0, 3.5]);
        let cancel = || true;
        let err = one_round(&mut h, &mut y, &mut ledger, &gamma, 3, prec, Some(&cancel)).unwrap_err();
        assert!(matches!(err, IterateError::Cancelled));
    }
}

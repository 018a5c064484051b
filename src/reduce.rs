//! Hermite size reduction
//!
//! The same [`reduction_step`] helper is reused by [`crate::iterate`]'s
//! partial re-reduction after a row swap. The whole point of factoring it
//! out is that both call sites must derive and apply the identical rounded
//! integer `t` to `H`, `y`, and the ledger in the same step.

use crate::builder::HMatrix;
use crate::error::LedgerError;
use crate::ledger::IntegerLedger;
use crate::numeric::{int_to_real, round_ties_away, Real};

/// Apply one Hermite reduction step at `(i, j)`, updating `H`, `y`, and the
/// ledger in lockstep. A no-op if the rounded quotient is zero.
pub fn reduction_step(
    h: &mut HMatrix,
    y: &mut [Real],
    ledger: &mut IntegerLedger,
    i: usize,
    j: usize,
    prec: u32,
) -> Result<(), LedgerError> {
    let quotient = h[i][j].clone() / &h[j][j];
    let t = round_ties_away(&quotient);
    if t == rug::Integer::from(0) {
        return Ok(());
    }

    let t_real = int_to_real(&t, prec);
    for k in 0..=j {
        let delta = t_real.clone() * &h[j][k];
        h[i][k] -= delta;
    }
    ledger.reduce_row(i, j, &t)?;
    let delta_y = t_real * &y[i];
    y[j] += delta_y;
    Ok(())
}

/// Full Hermite reduction pass: for `i` from `1` to `n-1`, for `j` from
/// `i-1` down to `0`.
pub fn full_reduce(
    h: &mut HMatrix,
    y: &mut [Real],
    ledger: &mut IntegerLedger,
    n: usize,
    prec: u32,
) -> Result<(), LedgerError> {
    for i in 1..n {
        for j in (0..i).rev() {
            reduction_step(h, y, ledger, i, j, prec)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use rug::Float;

    #[test]
    fn full_reduce_bounds_subdiagonal_entries() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5, 7.25]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (mut y, mut h) = builder::build(&x, prec).unwrap();
        let n = x.len();
        let mut ledger = IntegerLedger::identity(n, None);
        full_reduce(&mut h, &mut y, &mut ledger, n, prec).unwrap();

        for i in 1..n {
            for j in 0..i {
                let bound = h[j][j].clone().abs() / Float::with_val(prec, 2);
                assert!(
                    h[i][j].clone().abs() <= bound * Float::with_val(prec, 1.0000001),
                    "H[{i}][{j}] must satisfy the Hermite bound after reduction"
                );
            }
        }
    }

    #[test]
    fn full_reduce_preserves_ab_identity() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5, 7.25]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (mut y, mut h) = builder::build(&x, prec).unwrap();
        let n = x.len();
        let mut ledger = IntegerLedger::identity(n, None);
        full_reduce(&mut h, &mut y, &mut ledger, n, prec).unwrap();
        let prod = ledger.product();
        for i in 0..n {
            for j in 0..n {
                let expect = if i == j { 1 } else { 0 };
                assert_eq!(prod[i][j], rug::Integer::from(expect));
            }
        }
    }
}

//! Construction of the initial normalised vector `y` and the lower
//! trapezoidal matrix `H`
//!
//! The post-construction checks here guard against bugs in this module, not
//! caller mistakes. A failure is reported as
//! [`BuilderError::InvariantViolated`] and should never be reachable from
//! validated input.

use rug::Float;

use crate::error::BuilderError;
use crate::numeric::{epsilon, ulp_distance, Real};

/// Dense `n x (n-1)` matrix, row-major. Entries with `j > i` are literal
/// zeros rather than omitted: the row-exchange step in
/// [`crate::iterate`] transiently needs a slot one column past a row's
/// trapezoidal boundary to hold the "corner" entry before it is rotated away.
pub type HMatrix = Vec<Vec<Real>>;

/// Build the initial `(y, H)` pair from a validated input vector `x`.
pub fn build(x: &[Real], prec: u32) -> Result<(Vec<Real>, HMatrix), BuilderError> {
    let n = x.len();
    debug_assert!(n >= 2, "guard must reject shorter input before this is called");

    // s2[i] = sum_{k>=i} x_k^2, with s2[n] = 0.
    let mut s2 = vec![Float::with_val(prec, 0); n + 1];
    for i in (0..n).rev() {
        s2[i] = s2[i + 1].clone() + x[i].clone() * &x[i];
    }

    let norm = s2[0].clone().sqrt();
    let y: Vec<Real> = x.iter().map(|xi| xi.clone() / &norm).collect();

    let mut h: HMatrix = vec![vec![Float::with_val(prec, 0); n - 1]; n];
    for i in 0..n - 1 {
        h[i][i] = (s2[i + 1].clone() / &s2[i]).sqrt();
    }
    for i in 0..n {
        let upper = if i == n - 1 { n - 1 } else { i };
        for j in 0..upper {
            h[i][j] = -(x[i].clone() * &x[j]) / (s2[j].clone() * &s2[j + 1]).sqrt();
        }
    }

    check_invariants(&y, &h, n, prec)?;
    Ok((y, h))
}

/// Re-run the algebraic self-checks on an existing `(y, H)` pair.
///
/// Called once after construction; exposed separately so property tests can
/// re-assert the invariants after every iteration round without duplicating
/// the tolerance arithmetic.
pub fn check_invariants(y: &[Real], h: &HMatrix, n: usize, prec: u32) -> Result<(), BuilderError> {
    let eps = epsilon(prec);
    let sqrt_eps = eps.clone().sqrt();

    let mut frob_sq = Float::with_val(prec, 0);
    for row in h {
        for v in row {
            frob_sq += v.clone() * v;
        }
    }
    let target = Float::with_val(prec, n as u32 - 1);
    if (frob_sq - &target).abs() > sqrt_eps.clone() * &target {
        return Err(BuilderError::InvariantViolated(format!(
            "||H||_F^2 deviates from n-1={} beyond tolerance",
            n - 1
        )));
    }

    for j in 0..n - 1 {
        let mut col_dot = Float::with_val(prec, 0);
        for (i, yi) in y.iter().enumerate() {
            if j <= i {
                col_dot += yi.clone() * &h[i][j];
            }
        }
        let scaled = col_dot.abs() / Float::with_val(prec, n as u32 - 1);
        if scaled > sqrt_eps {
            return Err(BuilderError::InvariantViolated(format!(
                "y.H column {j} deviates from zero beyond tolerance"
            )));
        }
    }

    let floor = eps.clone() * &eps;
    for (i, yi) in y.iter().enumerate() {
        if yi.clone().abs() < floor {
            return Err(BuilderError::InvariantViolated(format!(
                "y[{i}] underflowed to the precision floor"
            )));
        }
    }

    for i in 1..y.len() {
        if ulp_distance(&y[i - 1], &y[i], prec) <= Float::with_val(prec, 2) {
            return Err(BuilderError::InvariantViolated(format!(
                "y[{}] and y[{}] are within 2 ULPs of each other",
                i - 1,
                i
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_passes_self_checks() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5, 7.25]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (y, h) = build(&x, prec).expect("construction should satisfy its own invariants");
        assert_eq!(y.len(), 4);
        assert_eq!(h.len(), 4);
        assert_eq!(h[0].len(), 3);
    }

    #[test]
    fn h_is_lower_trapezoidal() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0, 3.5, 7.25]
            .iter()
            .map(|v| Float::with_val(prec, *v))
            .collect();
        let (_, h) = build(&x, prec).unwrap();
        let n = x.len();
        for i in 0..n {
            for j in 0..n - 1 {
                if j > i {
                    assert_eq!(h[i][j], Float::with_val(prec, 0), "H[{i}][{j}] must be zero");
                }
            }
        }
    }

    #[test]
    fn two_element_case_is_exact() {
        let prec = 256;
        let x: Vec<Real> = [1.0, 2.0].iter().map(|v| Float::with_val(prec, *v)).collect();
        let (y, h) = build(&x, prec).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].len(), 1);
        // y must be unit norm.
        let mut norm_sq = Float::with_val(prec, 0);
        for v in &y {
            norm_sq += v.clone() * v;
        }
        assert!((norm_sq - Float::with_val(prec, 1)).abs() < epsilon(prec).sqrt());
    }
}

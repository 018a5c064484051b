//! Integer bookkeeping matrices `A`/`B`
//!
//! `A` and `B` are dense `n x n` arbitrary-precision integer matrices held in
//! lockstep, `A * B = I` at every point a round completes. Columns of `B` are
//! the running candidate relations.

use rug::Integer;

use crate::error::LedgerError;
use crate::numeric::Int;

/// The integer ledger `(A, B)`.
#[derive(Debug, Clone)]
pub struct IntegerLedger {
    a: Vec<Vec<Int>>,
    b: Vec<Vec<Int>>,
    /// Optional cap on the bit-length of any single entry. `None` (the
    /// default) means unbounded, matching `rug::Integer`'s native behavior;
    /// set by [`crate::orchestrator::PslqConfig::max_ledger_bits`] when a
    /// caller wants the `IntegerOverflow` path exercised or enforced.
    max_bits: Option<u32>,
}

impl IntegerLedger {
    /// Construct `A = B = I_n`.
    pub fn identity(n: usize, max_bits: Option<u32>) -> Self {
        let mut a = vec![vec![Integer::from(0); n]; n];
        let mut b = vec![vec![Integer::from(0); n]; n];
        for i in 0..n {
            a[i][i] = Integer::from(1);
            b[i][i] = Integer::from(1);
        }
        Self { a, b, max_bits }
    }

    /// `A[i,:] -= t * A[j,:]`, `B[:,j] += t * B[:,i]`.
    ///
    /// Preserves `A*B = I` for any integer `t`: this is the elementary row
    /// operation paired with its inverse column operation.
    pub fn reduce_row(&mut self, i: usize, j: usize, t: &Int) -> Result<(), LedgerError> {
        if t.cmp0() == std::cmp::Ordering::Equal {
            return Ok(());
        }
        let n = self.a.len();
        for k in 0..n {
            let delta = t.clone() * &self.a[j][k];
            self.a[i][k] -= delta;
        }
        for k in 0..n {
            let delta = t.clone() * &self.b[k][i];
            self.b[k][j] += delta;
        }
        self.check_bounds()
    }

    /// Swap rows `m`/`m+1` of `A` and columns `m`/`m+1` of `B`.
    pub fn swap_rows(&mut self, m: usize) {
        self.a.swap(m, m + 1);
        let n = self.b.len();
        for row in self.b.iter_mut().take(n) {
            row.swap(m, m + 1);
        }
    }

    /// Clone column `j` of `B`, a candidate integer relation once `y_j`
    /// becomes (near-)zero.
    pub fn b_column(&self, j: usize) -> Vec<Int> {
        self.b.iter().map(|row| row[j].clone()).collect()
    }

    /// `A * B`, recomputed from scratch. Used only by invariant tests, never
    /// on the hot path.
    #[cfg(test)]
    pub fn product(&self) -> Vec<Vec<Int>> {
        let n = self.a.len();
        let mut out = vec![vec![Integer::from(0); n]; n];
        for i in 0..n {
            for j in 0..n {
                let mut acc = Integer::from(0);
                for k in 0..n {
                    acc += self.a[i][k].clone() * &self.b[k][j];
                }
                out[i][j] = acc;
            }
        }
        out
    }

    fn check_bounds(&self) -> Result<(), LedgerError> {
        let Some(limit) = self.max_bits else {
            return Ok(());
        };
        for row in self.a.iter().chain(self.b.iter()) {
            for v in row {
                if v.significant_bits() > limit {
                    return Err(LedgerError::IntegerOverflow { limit_bits: limit });
                }
            }
        }
        Ok(())
    }
}

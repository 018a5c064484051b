//! Numeric backend primitives
//!
//! `Real` and `Int` are fixed to concrete arbitrary-precision types rather than
//! left fully generic: the whitepaper's core requires only a small surface
//! (add/sub/mul/div, `sqrt`, `abs`, round-to-nearest, and a relative precision
//! `epsilon`), and every module in this crate reaches that surface through the
//! handful of free functions here instead of through an unused type parameter.
//! This mirrors the crate-root convention of fixing a single concrete scalar
//! (rather than threading a field trait through every call site) while keeping
//! the call sites free of any particular curve or ring's idiosyncrasies.

#![allow(missing_docs)]

use rug::Float;

/// Arbitrary-precision real, backed by MPFR via `rug`.
pub type Real = rug::Float;

/// Arbitrary-precision signed integer, backed by GMP via `rug`.
pub type Int = rug::Integer;

/// `2/sqrt(3)`, the strict lower bound a caller-supplied `gamma` must clear.
#[inline]
pub fn two_over_sqrt3(prec: u32) -> Real {
    Float::with_val(prec, 2) / Float::with_val(prec, 3).sqrt()
}

/// Relative machine precision `ε` of a `Real` held at `prec` bits of mantissa.
///
/// For a `prec`-bit significand, the gap between 1 and the next representable
/// value is `2^{1-prec}`; half of that is the usual definition of unit
/// round-off, which is what every `√ε`/`16·ε` tolerance in this crate assumes.
#[inline]
pub fn epsilon(prec: u32) -> Real {
    Float::with_val(prec, 1u32) >> (prec - 1)
}

/// Round `x` to the nearest integer, ties away from zero.
///
/// This is the single place the crate converts a `Real` to an `Int`. Every
/// caller that needs a rounded integer, the reducer and the partial
/// re-reduction inside one iteration round, must go through this function so
/// that the identical rounded value is used on both the `H`/`y` side and the
/// integer ledger side (see the Hermite reduction design notes).
pub fn round_ties_away(x: &Real) -> Int {
    x.clone().round().to_integer().unwrap_or_else(|| Int::from(0))
}

/// Convert a rounded integer `t` back to a `Real` at the given precision, for
/// use in the lockstep `H`/`y` update that accompanies an `IntegerLedger`
/// operation.
#[inline]
pub fn int_to_real(t: &Int, prec: u32) -> Real {
    Float::with_val(prec, t)
}

/// Euclidean norm `‖v‖₂` of a slice of reals, at the given precision.
pub fn norm2(v: &[Real], prec: u32) -> Real {
    let mut acc = Float::with_val(prec, 0);
    for vi in v {
        acc += vi.clone() * vi;
    }
    acc.sqrt()
}

/// Distance between `a` and `b`, measured in ULPs of precision `prec`,
/// relative to the larger of the two magnitudes.
///
/// Two non-equal caller inputs that land within `2` ULPs of each other are
/// numerically indistinguishable at this precision: any relation PSLQ could
/// report between them would really be round-off, not an algebraic fact.
pub fn ulp_distance(a: &Real, b: &Real, prec: u32) -> Real {
    let diff = (a.clone() - b.clone()).abs();
    let scale = if a.clone().abs() > b.clone().abs() {
        a.clone().abs()
    } else {
        b.clone().abs()
    };
    if scale == Float::with_val(prec, 0) {
        return diff;
    }
    diff / (scale * epsilon(prec))
}

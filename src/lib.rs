//! Crate root: public surface and module wiring for the PSLQ integer-relation
//! detector.
//!
//! This module is the **single canonical entry-point** for downstream users
//! of the library. It centralizes the real/integer type aliases and
//! re-exports the orchestrator's public surface.
//!
//! ## Invariants (algorithm-aligned)
//!
//! - **Numeric backend.** `Real` is `rug::Float` (MPFR-backed arbitrary
//!   precision) and `Int` is `rug::Integer` (GMP-backed arbitrary precision).
//!   Precision is a runtime parameter (`PslqConfig::precision_bits`), not a
//!   type parameter; see [`numeric`] for why.
//! - **Input shape.** `x` must be sorted strictly increasing, every entry
//!   strictly positive, length at least 2. [`guard::validate`] enforces this
//!   before any PSLQ state is built.
//! - **Coupled state.** The integer ledger `(A, B)` and the geometric state
//!   `(H, y)` are updated by the *same* rounded integer on every reduction
//!   step; see [`reduce::reduction_step`]. Rounding is never recomputed
//!   independently on the two sides.
//! - **Single precision.** This is single-level PSLQ: one precision for the
//!   whole run, chosen by the caller. No reduced-precision inner loop.
//!
//! These invariants are enforced by design across the submodules. If any is
//! violated at runtime, the failure mode is a **precise error** (never a
//! panic in non-test code).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

/// Input validation: sortedness, positivity, γ/τ range, achievable precision.
pub mod guard;
/// Construction of the initial normalised vector `y` and lower-trapezoidal `H`.
pub mod builder;
/// Integer bookkeeping matrices `A`/`B` with the `A*B = I` invariant.
pub mod ledger;
/// Hermite size reduction, shared between initial reduction and per-round reduction.
pub mod reduce;
/// One PSLQ round: pivot selection, row exchange, corner removal.
pub mod iterate;
/// Post-round relation detection, residual validation, norm bound tracking.
pub mod terminate;
/// Public entry point tying the above into `pslq`/`pslq_with_config`.
pub mod orchestrator;
/// Error taxonomy, one `thiserror` enum per concern composed into [`PslqError`].
pub mod error;
/// Numeric backend primitives shared by every module above.
pub mod numeric;

/// Arbitrary-precision real, backed by MPFR via `rug`.
pub use numeric::Real;

/// Arbitrary-precision signed integer, backed by GMP via `rug`.
pub use numeric::Int;

/// Crate-wide error type. See [`error::PslqError`] for the full taxonomy.
pub use error::PslqError;

pub use orchestrator::{
    default_gamma, dense_coefficients, iteration_budget, pslq, pslq_with_config, residual,
    PslqConfig, PslqOutcome, PslqReport, PslqWarning,
};

//! Error taxonomy
//!
//! One `thiserror` enum per concern, composed into [`PslqError`] at the crate
//! root via `#[from]`. Downstream code matches on the concern-specific enum
//! when it cares about the distinction (e.g. the CLI prints a different exit
//! message for a malformed input than for an internal invariant failure); code
//! that just wants `?` to work gets a single top-level type.

use thiserror::Error;

/// Errors raised by [`crate::guard`] before any iteration state is built.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Input vector shorter than the minimum length the algorithm supports.
    #[error("input vector must have at least 2 elements (got {0})")]
    InputTooShort(usize),
    /// Input is not strictly increasing.
    #[error("input is not strictly increasing: x[{0}] >= x[{1}]")]
    InputNotSorted(usize, usize),
    /// An input entry is zero or negative.
    #[error("input element at index {0} must be strictly positive")]
    InputNonPositive(usize),
    /// Two distinct entries are numerically indistinguishable at this precision.
    #[error(
        "inputs at indices {i} and {j} are only {ulps:.3} ULPs apart at {prec}-bit precision \
         (minimum separation is 2 ULPs)"
    )]
    InputIndistinguishable {
        /// Index of the first of the offending pair.
        i: usize,
        /// Index of the second of the offending pair.
        j: usize,
        /// Observed ULP distance.
        ulps: f64,
        /// Precision, in bits, the distance was measured at.
        prec: u32,
    },
    /// `gamma` did not satisfy `gamma > 2/sqrt(3)`.
    #[error("gamma must be strictly greater than 2/sqrt(3) (got {0})")]
    GammaOutOfRange(f64),
    /// The derived `tau` did not land in the open interval `(1, 2)`.
    #[error("derived tau = {0} must lie strictly in (1, 2); check gamma")]
    TauOutOfRange(f64),
    /// `max_norm` exceeds what is distinguishable from round-off at the
    /// caller's chosen precision.
    #[error(
        "max_norm is too large for {prec}-bit precision; the largest permissible \
         max_norm here is approximately {max_permissible}"
    )]
    PrecisionInsufficient {
        /// Recommended upper bound on `max_norm` at the current precision.
        max_permissible: f64,
        /// Precision, in bits, the bound was computed at.
        prec: u32,
    },
}

/// Errors raised while constructing the initial `y`/`H` state in
/// [`crate::builder`].
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A post-construction algebraic invariant failed; this indicates a bug
    /// in the construction, not a caller error.
    #[error("internal invariant violated while building H: {0}")]
    InvariantViolated(String),
}

/// Errors raised by [`crate::ledger`]'s integer bookkeeping.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A ledger entry exceeded the representable range.
    ///
    /// Unreachable with the default `rug::Integer`-backed ledger (arbitrary
    /// precision, no overflow), but reachable when
    /// [`crate::orchestrator::PslqConfig::max_ledger_bits`] caps entry size.
    #[error("integer ledger entry at row/col would exceed {limit_bits}-bit cap")]
    IntegerOverflow {
        /// The configured cap that was exceeded.
        limit_bits: u32,
    },
}

/// Errors raised while running [`crate::iterate`]'s per-round logic.
#[derive(Debug, Error)]
pub enum IterateError {
    /// A ledger operation during this round failed; see [`LedgerError`].
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The caller's cancellation signal fired.
    #[error("PSLQ iteration cancelled by caller")]
    Cancelled,
    /// The iteration ran far past its advertised budget without converging.
    #[error(
        "PSLQ exceeded {multiplier}x its advertised iteration budget ({budget} rounds) \
         without terminating; this indicates a numerical bug, not slow convergence"
    )]
    BudgetExceeded {
        /// The advertised iteration budget.
        budget: usize,
        /// How many multiples of the budget were allowed before giving up.
        multiplier: usize,
    },
}

/// The crate's single top-level error type.
///
/// Every concern-specific enum above composes into this one via `#[from]`, so
/// `?` works across module boundaries without manual mapping.
#[derive(Debug, Error)]
pub enum PslqError {
    /// See [`GuardError`].
    #[error(transparent)]
    Guard(#[from] GuardError),
    /// See [`BuilderError`].
    #[error(transparent)]
    Builder(#[from] BuilderError),
    /// See [`LedgerError`].
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// See [`IterateError`].
    #[error(transparent)]
    Iterate(#[from] IterateError),
}

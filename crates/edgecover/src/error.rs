//! Error type shared by parsing, solving, and verification.

use thiserror::Error;

/// Failures surfaced by the library.
///
/// Numerical near-ties are never errors; they are resolved by the
/// `eps_tight` tolerance of [`crate::SolverCfg`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EdgeCoverError {
    /// Unparsable or inconsistent instance/solution text.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },
    /// The solver reached a state that a correct run never produces.
    #[error("internal invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl EdgeCoverError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EdgeCoverError>;

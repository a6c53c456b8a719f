use std::fmt::Debug;

use thiserror::Error;

/// Marker carried by every failed transaction's rendered error.
pub const TRANSACTION_FAILED: &str = "transaction failed";

/// Error from committing a transaction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommitError<E: Debug> {
    /// A step's work function does not return a failure indicator.
    ///
    /// Detected before any step runs, so no work has been executed.
    #[error("step {step} does not return a failure indicator")]
    MalformedStep {
        /// Index of the first malformed step.
        step: usize,
    },

    /// A step's work returned a failure and the rollback has been run.
    #[error("transaction failed\ntask returned an error: {source}")]
    TransactionFailed {
        /// Index of the step whose work failed.
        step: usize,
        /// The failure returned by the step.
        #[source]
        source: E,
    },
}

impl<E: Debug> CommitError<E> {
    /// Returns `true` if a step failed at run time.
    #[must_use]
    pub fn is_transaction_failed(&self) -> bool {
        matches!(self, Self::TransactionFailed { .. })
    }

    /// Index of the step whose work failed, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            Self::TransactionFailed { step, .. } => Some(*step),
            Self::MalformedStep { .. } => None,
        }
    }

    /// Consume the error and return the step's original failure.
    #[must_use]
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::TransactionFailed { source, .. } => Some(source),
            Self::MalformedStep { .. } => None,
        }
    }
}

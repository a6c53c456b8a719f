use std::fmt::Debug;

use crate::error::CommitError;
use crate::step::Step;

/// Check that every step's work returns a failure indicator.
///
/// This is the pre-flight pass of [`commit`](crate::commit). It only reads the
/// shape recorded on each step and never calls any work function.
///
/// # Errors
///
/// Returns `CommitError::MalformedStep` naming the first step whose work has
/// no failure indicator.
pub fn validate<E: Debug>(steps: &[Step<'_, E>]) -> Result<(), CommitError<E>> {
    match first_malformed(steps) {
        Some(step) => Err(CommitError::MalformedStep { step }),
        None => Ok(()),
    }
}

pub(crate) fn first_malformed<E>(steps: &[Step<'_, E>]) -> Option<usize> {
    steps.iter().position(|step| !step.has_failure_indicator())
}

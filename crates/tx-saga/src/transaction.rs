use std::fmt::Debug;

use tracing::{debug, warn};

use crate::audit::AuditLog;
use crate::error::CommitError;
use crate::step::{Compensation, Step};
use crate::validate::{first_malformed, validate};

/// An ordered list of steps committed together.
///
/// Holds no execution state: every commit is an independent run over the
/// same steps.
#[derive(Debug)]
pub struct Transaction<'a, E> {
    steps: Vec<Step<'a, E>>,
}

impl<'a, E> Transaction<'a, E> {
    /// Create an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step after the current last step.
    #[must_use]
    pub fn step(mut self, step: Step<'a, E>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: Step<'a, E>) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step<'a, E>] {
        &self.steps
    }
}

impl<E: Debug> Transaction<'_, E> {
    /// Run the transaction. See [`commit`].
    ///
    /// # Errors
    ///
    /// Returns `CommitError::MalformedStep` if a step has no failure indicator,
    /// or `CommitError::TransactionFailed` if a step's work fails.
    pub fn commit(&self) -> Result<(), CommitError<E>> {
        commit(&self.steps)
    }

    /// Run the transaction and return an audit log. See [`commit_with_audit`].
    #[must_use]
    pub fn commit_with_audit(&self) -> (Result<(), CommitError<E>>, AuditLog) {
        commit_with_audit(&self.steps)
    }

    /// Check every step without running anything. See [`validate`].
    ///
    /// # Errors
    ///
    /// Returns `CommitError::MalformedStep` for the first malformed step.
    pub fn validate(&self) -> Result<(), CommitError<E>> {
        validate(&self.steps)
    }
}

impl<E> Default for Transaction<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E> FromIterator<Step<'a, E>> for Transaction<'a, E> {
    fn from_iter<I: IntoIterator<Item = Step<'a, E>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a, E> Extend<Step<'a, E>> for Transaction<'a, E> {
    fn extend<I: IntoIterator<Item = Step<'a, E>>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

/// Run the steps in order, rolling back on the first failure.
///
/// Every step is validated before any work runs. The work functions are then
/// called one by one. When one returns a failure, no further step runs and
/// the compensations of all steps up to and including the failing one are
/// called in reverse order: the failing step's last compensation first, the
/// first step's first compensation last. Failures reported by compensations
/// are logged and otherwise ignored.
///
/// # Errors
///
/// Returns `CommitError::MalformedStep` if a step's work has no failure
/// indicator; nothing has run in that case.
/// Returns `CommitError::TransactionFailed` carrying the step's failure if a
/// step's work fails; the rollback has completed by the time it is returned.
pub fn commit<E: Debug>(steps: &[Step<'_, E>]) -> Result<(), CommitError<E>> {
    let (result, _audit_log) = run(steps);
    result
}

/// Run the steps like [`commit`] and return both the result and an audit log.
///
/// The audit log records every work and compensation invocation.
#[must_use]
pub fn commit_with_audit<E: Debug>(
    steps: &[Step<'_, E>],
) -> (Result<(), CommitError<E>>, AuditLog) {
    run(steps)
}

fn run<E: Debug>(steps: &[Step<'_, E>]) -> (Result<(), CommitError<E>>, AuditLog) {
    let mut audit_log = AuditLog::new();

    if let Some(step) = first_malformed(steps) {
        warn!(
            step,
            name = steps[step].name().unwrap_or_default(),
            "rejecting transaction: step work has no failure indicator"
        );
        return (Err(CommitError::MalformedStep { step }), audit_log);
    }

    for (index, step) in steps.iter().enumerate() {
        let name = step.name().unwrap_or_default();
        audit_log.record_start(index, step.name());
        debug!(step = index, name, "running step");

        let Some(error) = step.run() else {
            audit_log.record_success();
            continue;
        };

        audit_log.record_failure();
        debug!(step = index, name, ?error, "step failed, rolling back");
        roll_back(&steps[..=index], &mut audit_log);

        return (
            Err(CommitError::TransactionFailed {
                step: index,
                source: error,
            }),
            audit_log,
        );
    }

    debug!(steps = steps.len(), "transaction committed");
    (Ok(()), audit_log)
}

/// Run the compensations of `steps` last to first.
fn roll_back<E>(steps: &[Step<'_, E>], audit_log: &mut AuditLog) {
    let pending: Vec<(usize, usize, &Compensation<'_>)> = steps
        .iter()
        .enumerate()
        .flat_map(|(index, step)| {
            step.compensations()
                .iter()
                .enumerate()
                .map(move |(position, compensation)| (index, position, compensation))
        })
        .collect();

    debug!(compensations = pending.len(), "running compensations");

    for (step, position, compensation) in pending.into_iter().rev() {
        match compensation() {
            None => audit_log.record_compensated(step, position),
            Some(message) => {
                warn!(step, position, error = %message, "compensation failed, continuing rollback");
                audit_log.record_compensation_failed(step, position, message);
            }
        }
    }
}

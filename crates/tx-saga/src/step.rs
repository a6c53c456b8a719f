use std::fmt;

use crate::output::{CompensationOutput, WorkOutput};

type Work<'a, E> = Box<dyn Fn() -> Option<E> + 'a>;
pub(crate) type Compensation<'a> = Box<dyn Fn() -> Option<String> + 'a>;

/// One unit of work in a transaction, with the actions that undo it.
///
/// The work function's return type decides whether the step is well formed:
/// it must be a failure indicator such as `Result<T, E>` or `Option<E>` (see
/// [`WorkOutput`]). Compensations run in reverse declaration order during a
/// rollback and may return `()` or a `Result` whose error is only logged.
///
/// Steps are never mutated by the runner, so the same steps can be committed
/// any number of times.
pub struct Step<'a, E> {
    name: Option<&'static str>,
    work: Work<'a, E>,
    has_failure_indicator: bool,
    compensations: Vec<Compensation<'a>>,
}

impl<'a, E> Step<'a, E> {
    /// Create a step from its work function.
    #[must_use]
    pub fn new<F, R>(work: F) -> Self
    where
        F: Fn() -> R + 'a,
        R: WorkOutput<E>,
    {
        Self {
            name: None,
            work: Box::new(move || work().into_failure()),
            has_failure_indicator: R::HAS_FAILURE_INDICATOR,
            compensations: Vec::new(),
        }
    }

    /// Attach a human-readable name used in logs and the audit log.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Append a compensation to run if this or a later step fails.
    #[must_use]
    pub fn compensate_with<F, R>(mut self, compensation: F) -> Self
    where
        F: Fn() -> R + 'a,
        R: CompensationOutput,
    {
        self.compensations
            .push(Box::new(move || compensation().into_failure_message()));
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Whether the work function returns a failure indicator.
    #[must_use]
    pub fn has_failure_indicator(&self) -> bool {
        self.has_failure_indicator
    }

    #[must_use]
    pub fn compensation_count(&self) -> usize {
        self.compensations.len()
    }

    pub(crate) fn run(&self) -> Option<E> {
        (self.work)()
    }

    pub(crate) fn compensations(&self) -> &[Compensation<'a>] {
        &self.compensations
    }
}

impl<E> fmt::Debug for Step<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("has_failure_indicator", &self.has_failure_indicator)
            .field("compensations", &self.compensations.len())
            .finish_non_exhaustive()
    }
}

use std::time::Instant;

/// Status of a step's work in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Work has been invoked and has not returned yet.
    Running,
    /// Work returned without a failure.
    Executed,
    /// Work returned a failure.
    Failed,
}

/// Status of a single compensation in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompensationStatus {
    /// Compensation returned without a failure.
    Completed,
    /// Compensation reported a failure, which was ignored.
    Failed,
}

/// Record of one step's work invocation.
#[derive(Debug)]
pub struct StepRecord {
    /// Index of the step in the transaction.
    pub index: usize,
    /// Name of the step, if one was given.
    pub name: Option<&'static str>,
    /// Current status.
    pub status: StepStatus,
    /// When the work was invoked.
    pub started_at: Instant,
    /// When the work returned.
    pub completed_at: Option<Instant>,
}

/// Record of one compensation invocation.
#[derive(Debug)]
pub struct CompensationRecord {
    /// Index of the step the compensation belongs to.
    pub step: usize,
    /// Position of the compensation within its step.
    pub position: usize,
    /// Outcome of the compensation.
    pub status: CompensationStatus,
    /// The rendered failure, for failed compensations.
    pub message: Option<String>,
    /// When the compensation returned.
    pub at: Instant,
}

/// Audit log of a single commit.
///
/// Step records appear in execution order and compensation records in
/// invocation order, so the log reflects exactly what was called.
#[derive(Debug, Default)]
pub struct AuditLog {
    steps: Vec<StepRecord>,
    compensations: Vec<CompensationRecord>,
}

impl AuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step's work being invoked.
    pub(crate) fn record_start(&mut self, index: usize, name: Option<&'static str>) {
        self.steps.push(StepRecord {
            index,
            name,
            status: StepStatus::Running,
            started_at: Instant::now(),
            completed_at: None,
        });
    }

    /// Mark the last step as executed.
    pub(crate) fn record_success(&mut self) {
        self.complete_last(StepStatus::Executed);
    }

    /// Mark the last step as failed.
    pub(crate) fn record_failure(&mut self) {
        self.complete_last(StepStatus::Failed);
    }

    fn complete_last(&mut self, status: StepStatus) {
        if let Some(record) = self.steps.last_mut() {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_compensated(&mut self, step: usize, position: usize) {
        self.compensations.push(CompensationRecord {
            step,
            position,
            status: CompensationStatus::Completed,
            message: None,
            at: Instant::now(),
        });
    }

    pub(crate) fn record_compensation_failed(
        &mut self,
        step: usize,
        position: usize,
        message: String,
    ) {
        self.compensations.push(CompensationRecord {
            step,
            position,
            status: CompensationStatus::Failed,
            message: Some(message),
            at: Instant::now(),
        });
    }

    /// Get the step records in execution order.
    #[must_use]
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Get the compensation records in invocation order.
    #[must_use]
    pub fn compensations(&self) -> &[CompensationRecord] {
        &self.compensations
    }

    /// Returns `true` if any compensation reported a failure.
    #[must_use]
    pub fn has_compensation_failures(&self) -> bool {
        self.compensations
            .iter()
            .any(|record| record.status == CompensationStatus::Failed)
    }

    /// Get a summary of the commit for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.steps {
            let status = match record.status {
                StepStatus::Running => "…",
                StepStatus::Executed => "✓",
                StepStatus::Failed => "✗",
            };
            lines.push(format!("{status} {}", label(record.index, record.name)));
        }
        for record in &self.compensations {
            let step = self
                .steps
                .iter()
                .find(|s| s.index == record.step)
                .map_or_else(|| format!("step {}", record.step), |s| label(s.index, s.name));
            match (&record.status, &record.message) {
                (CompensationStatus::Failed, Some(message)) => {
                    lines.push(format!("⚠ {step} compensation {}: {message}", record.position));
                }
                _ => lines.push(format!("↩ {step} compensation {}", record.position)),
            }
        }
        lines.join("\n")
    }
}

fn label(index: usize, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{name} (step {index})"),
        None => format!("step {index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_audit_log_is_empty() {
        let log = AuditLog::new();
        assert!(log.steps().is_empty());
        assert!(log.compensations().is_empty());
        assert!(!log.has_compensation_failures());
    }

    #[test]
    fn record_start_adds_running_step() {
        let mut log = AuditLog::new();
        log.record_start(0, Some("reserve"));

        assert_eq!(log.steps().len(), 1);
        assert_eq!(log.steps()[0].name, Some("reserve"));
        assert_eq!(log.steps()[0].status, StepStatus::Running);
        assert!(log.steps()[0].completed_at.is_none());
    }

    #[test]
    fn record_success_and_failure_update_last_step() {
        let mut log = AuditLog::new();
        log.record_start(0, None);
        log.record_success();
        log.record_start(1, None);
        log.record_failure();

        assert_eq!(log.steps()[0].status, StepStatus::Executed);
        assert_eq!(log.steps()[1].status, StepStatus::Failed);
        assert!(log.steps().iter().all(|r| r.completed_at.is_some()));
    }

    #[test]
    fn compensation_records_keep_invocation_order() {
        let mut log = AuditLog::new();
        log.record_compensated(1, 0);
        log.record_compensation_failed(0, 1, "locked".to_string());
        log.record_compensated(0, 0);

        let order: Vec<(usize, usize)> = log
            .compensations()
            .iter()
            .map(|r| (r.step, r.position))
            .collect();
        assert_eq!(order, vec![(1, 0), (0, 1), (0, 0)]);
        assert!(log.has_compensation_failures());
        assert_eq!(log.compensations()[1].message.as_deref(), Some("locked"));
    }

    #[test]
    fn summary_formats_steps_and_compensations() {
        let mut log = AuditLog::new();
        log.record_start(0, Some("reserve"));
        log.record_success();
        log.record_start(1, None);
        log.record_failure();
        log.record_compensated(1, 0);
        log.record_compensation_failed(0, 0, "already shipped".to_string());

        let summary = log.summary();
        assert_eq!(
            summary,
            "✓ reserve (step 0)\n\
             ✗ step 1\n\
             ↩ step 1 compensation 0\n\
             ⚠ reserve (step 0) compensation 0: already shipped"
        );
    }
}

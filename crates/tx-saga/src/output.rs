use std::fmt::Display;

/// Return shape of a step's work function.
///
/// A well-formed work function returns a failure indicator: a value that is
/// empty when the work succeeded and carries the failure otherwise. Both
/// `Result<T, E>` (the success value is discarded) and `Option<E>` qualify.
///
/// `()` is accepted so a step can be assembled from a plain action, but it
/// has no failure indicator and such a step rejects the whole transaction
/// before anything runs.
pub trait WorkOutput<E> {
    /// Whether this shape carries a failure indicator.
    const HAS_FAILURE_INDICATOR: bool;

    /// Extract the failure, if the work reported one.
    fn into_failure(self) -> Option<E>;
}

impl<T, E> WorkOutput<E> for Result<T, E> {
    const HAS_FAILURE_INDICATOR: bool = true;

    fn into_failure(self) -> Option<E> {
        self.err()
    }
}

impl<E> WorkOutput<E> for Option<E> {
    const HAS_FAILURE_INDICATOR: bool = true;

    fn into_failure(self) -> Option<E> {
        self
    }
}

impl<E> WorkOutput<E> for () {
    const HAS_FAILURE_INDICATOR: bool = false;

    fn into_failure(self) -> Option<E> {
        None
    }
}

/// Return shape of a compensation.
///
/// Compensations are best effort. A reported failure is only logged and
/// recorded in the audit log; it never changes the transaction's outcome.
pub trait CompensationOutput {
    /// Render the failure, if the compensation reported one.
    fn into_failure_message(self) -> Option<String>;
}

impl CompensationOutput for () {
    fn into_failure_message(self) -> Option<String> {
        None
    }
}

impl<T, E: Display> CompensationOutput for Result<T, E> {
    fn into_failure_message(self) -> Option<String> {
        self.err().map(|error| error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_failure_indicator<R: WorkOutput<E>, E>() -> bool {
        R::HAS_FAILURE_INDICATOR
    }

    #[test]
    fn result_reports_err_as_failure() {
        let ok: Result<i32, String> = Ok(7);
        let err: Result<i32, String> = Err("nope".to_string());

        assert!(has_failure_indicator::<Result<i32, String>, String>());
        assert_eq!(ok.into_failure(), None);
        assert_eq!(err.into_failure(), Some("nope".to_string()));
    }

    #[test]
    fn option_reports_some_as_failure() {
        assert!(has_failure_indicator::<Option<&str>, &str>());
        assert_eq!(WorkOutput::<&str>::into_failure(None::<&str>), None);
        assert_eq!(WorkOutput::<&str>::into_failure(Some("bad")), Some("bad"));
    }

    #[test]
    fn unit_has_no_failure_indicator() {
        assert!(!has_failure_indicator::<(), String>());
        assert_eq!(WorkOutput::<String>::into_failure(()), None);
    }

    #[test]
    fn compensation_failures_are_rendered() {
        let failed: Result<(), String> = Err("still locked".to_string());
        let succeeded: Result<u8, String> = Ok(1);

        assert_eq!(failed.into_failure_message(), Some("still locked".to_string()));
        assert_eq!(succeeded.into_failure_message(), None);
        assert_eq!(().into_failure_message(), None);
    }
}

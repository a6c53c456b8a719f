//! Sequential transactions with compensation on failure.
//!
//! A transaction is an ordered list of [`Step`]s. Each step has a work
//! function that reports success or failure, plus any number of
//! compensations. [`commit`] runs the work functions in order and stops at the
//! first failure; it then runs the compensations of every step up to and
//! including the failing one, most recent first, and reports the failure.
//!
//! Before anything runs, every step is checked for a work function that
//! actually returns a failure indicator. A single malformed step rejects the
//! whole transaction without side effects.

mod audit;
mod error;
mod output;
mod step;
mod transaction;
mod validate;

pub use audit::{AuditLog, CompensationRecord, CompensationStatus, StepRecord, StepStatus};
pub use error::{CommitError, TRANSACTION_FAILED};
pub use output::{CompensationOutput, WorkOutput};
pub use step::Step;
pub use transaction::{Transaction, commit, commit_with_audit};
pub use validate::validate;

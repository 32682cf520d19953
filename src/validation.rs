//! Input validation for process batches.
//!
//! Checks a batch of processes before submission. Detects:
//! - Duplicate pids (within the batch or against an existing set)
//! - Nice values outside `NICE_MIN..=NICE_MAX`
//!
//! All issues are collected; validation never stops at the first error.

use crate::models::{Pid, Process, NICE_MAX, NICE_MIN};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending process.
    pub pid: Pid,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two processes share the same pid.
    DuplicatePid,
    /// Nice value outside the accepted range.
    NiceOutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, pid: Pid, message: impl Into<String>) -> Self {
        Self {
            kind,
            pid,
            message: message.into(),
        }
    }
}

/// Validates a batch of processes.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_processes(processes: &[Process]) -> ValidationResult {
    validate_against(processes, std::iter::empty())
}

/// Validates a batch against pids that are already known.
///
/// A pid in the batch that also appears in `existing` is reported as
/// [`ValidationErrorKind::DuplicatePid`].
pub fn validate_against(
    processes: &[Process],
    existing: impl IntoIterator<Item = Pid>,
) -> ValidationResult {
    let mut errors = Vec::new();
    let known: HashSet<Pid> = existing.into_iter().collect();
    let mut seen = HashSet::new();

    for p in processes {
        if known.contains(&p.pid) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePid,
                p.pid,
                format!("Process {} is already scheduled", p.pid),
            ));
        } else if !seen.insert(p.pid) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePid,
                p.pid,
                format!("Duplicate pid: {}", p.pid),
            ));
        }

        if !p.has_valid_nice() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NiceOutOfRange,
                p.pid,
                format!(
                    "Process {} has nice {} outside {}..={}",
                    p.pid, p.nice, NICE_MIN, NICE_MAX
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

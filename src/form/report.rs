//! Outcome of restoring a form from a snapshot.

use std::fmt;

/// A snapshot entry that could not be applied to its field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFailure {
    /// Name of the field.
    pub field: String,
    /// Raw snapshot value that was rejected.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = '{}': {}", self.field, self.value, self.reason)
    }
}

/// Result of a best-effort [`FormState::restore`](super::FormState::restore).
///
/// Fields that failed keep their previous value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Fields that were assigned, in declaration order.
    pub applied: Vec<String>,
    /// Fields whose snapshot value was rejected.
    pub failures: Vec<FieldFailure>,
}

impl RestoreReport {
    /// Returns true if no field failed.
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Names of the fields that failed.
    pub fn failed_fields(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|failure| failure.field.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_succeeds() {
        assert!(RestoreReport::default().succeeded());
    }

    #[test]
    fn test_report_with_failures() {
        let report = RestoreReport {
            applied: vec!["steps".to_string()],
            failures: vec![FieldFailure::new("seed", "abc", "not an integer")],
        };
        assert!(!report.succeeded());
        assert_eq!(report.failed_fields().collect::<Vec<_>>(), vec!["seed"]);
        assert_eq!(report.failures[0].to_string(), "seed = 'abc': not an integer");
    }
}

//! Aggregated validation diagnostics.
//!
//! Validation never fails fast: every unmet requirement is recorded and the
//! full set is surfaced to the caller in one pass, so a misconfigured setup
//! can be corrected in a single edit instead of one field at a time.

use crate::error::{Error, Result};
use std::fmt;

/// A single field-scoped validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    /// Configuration field the violation is scoped to.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Human-readable description of the unmet requirement.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered collection of distinct field-scoped violations.
///
/// Violations are kept in the order they were recorded. At most one
/// violation is kept per field; recording a second violation for a field
/// that already has one is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    violations: Vec<Violation>,
}

impl Diagnostics {
    /// Creates an empty diagnostics set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation for `field` unless one is already present.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.has_field(&field) {
            return;
        }
        self.violations.push(Violation {
            field,
            message: message.into(),
        });
    }

    /// Returns true when a violation has been recorded for `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Returns true when no violations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Recorded violations, in recording order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Converts a non-empty set into [`Error::Validation`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying this set when at least one
    /// violation was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

//! Error types for ownership resolution and rendering.

use crate::fieldpath::ParseError;
use std::fmt;
use thiserror::Error;

/// AnnotateError represents a failure while resolving or rendering ownership.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// One manager's raw ownership record failed to decode. Other managers
    /// are still processed; the run as a whole is reported as failed.
    #[error("manager {manager:?}: malformed ownership data: {source}")]
    MalformedOwnershipData {
        manager: String,
        #[source]
        source: ParseError,
    },

    /// An ownership entry that does not carry a manager name.
    #[error("ownership entry {index} has no manager name")]
    MissingManager { index: usize },

    /// The ownership metadata is present but is not a list of entries.
    #[error("ownership metadata must be a list of entries, got {kind}")]
    MalformedFieldEntries { kind: &'static str },

    /// The invocation resolved to more than one resource. Fatal.
    #[error("expected exactly one resource, found {found}")]
    UnsupportedMultipleResources { found: usize },

    /// The resource is not an object and cannot be annotated.
    #[error("resource must be an object, got {kind}")]
    NotAnObject { kind: &'static str },
}

/// AnnotateErrors aggregates recoverable-but-reportable errors so a caller
/// sees every diagnostic from one pass instead of the first failure.
#[derive(Debug, Default)]
pub struct AnnotateErrors {
    errors: Vec<AnnotateError>,
}

impl AnnotateErrors {
    /// Creates a new empty collection.
    pub fn new() -> Self {
        AnnotateErrors { errors: Vec::new() }
    }

    /// Adds an error.
    pub fn add(&mut self, error: AnnotateError) {
        self.errors.push(error);
    }

    /// Returns true if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotateError> {
        self.errors.iter()
    }
}

impl IntoIterator for AnnotateErrors {
    type Item = AnnotateError;
    type IntoIter = std::vec::IntoIter<AnnotateError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for AnnotateErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for AnnotateErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnnotateError::UnsupportedMultipleResources { found: 3 };
        assert_eq!(
            format!("{}", err),
            "expected exactly one resource, found 3"
        );
    }

    #[test]
    fn test_errors_aggregate() {
        let mut errs = AnnotateErrors::new();
        assert!(errs.is_empty());

        errs.add(AnnotateError::MissingManager { index: 0 });
        errs.add(AnnotateError::UnsupportedMultipleResources { found: 2 });
        assert_eq!(errs.len(), 2);

        let text = format!("{}", errs);
        assert_eq!(text.lines().count(), 2);
    }
}

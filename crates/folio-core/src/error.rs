//! Error types for portfolio extraction.
//!
//! This module defines the error types raised while turning fragments into a
//! portfolio snapshot.

use thiserror::Error;

use crate::fragment::FragmentKind;

/// Result type for extraction operations.
pub type FolioResult<T> = Result<T, FolioError>;

/// Errors that can occur while extracting and aggregating a portfolio.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    /// An expected field label was not found in a fragment's text.
    #[error("Fragment {fragment} ({kind}): field '{field}' not found")]
    FieldMissing {
        /// Index of the fragment in the document.
        fragment: usize,
        /// Classification of the fragment.
        kind: FragmentKind,
        /// Name of the field that could not be extracted.
        field: String,
    },

    /// A field label was found but its value could not be parsed.
    #[error("Fragment {fragment} ({kind}): invalid value '{value}' for field '{field}'")]
    InvalidValue {
        /// Index of the fragment in the document.
        fragment: usize,
        /// Classification of the fragment.
        kind: FragmentKind,
        /// Name of the field.
        field: String,
        /// The raw text that failed to parse.
        value: String,
    },

    /// More than one risk metrics fragment under a policy that forbids it.
    #[error("Conflicting risk metrics in fragments {first} and {second}")]
    ConflictingRiskMetrics {
        /// Index of the first risk metrics fragment.
        first: usize,
        /// Index of the conflicting fragment.
        second: usize,
    },

    /// A period string was not in `YYYY-MM` form.
    #[error("Invalid period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),
}

impl FolioError {
    /// Create a field missing error.
    #[must_use]
    pub fn field_missing(fragment: usize, kind: FragmentKind, field: impl Into<String>) -> Self {
        Self::FieldMissing {
            fragment,
            kind,
            field: field.into(),
        }
    }

    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(
        fragment: usize,
        kind: FragmentKind,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            fragment,
            kind,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns the name of the offending field, if the error concerns one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldMissing { field, .. } | Self::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

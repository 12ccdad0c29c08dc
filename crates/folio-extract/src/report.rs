//! Extraction results with field-level provenance.

use serde::{Deserialize, Serialize};

use folio_core::{FolioError, FragmentKind, PortfolioSnapshot};

/// A field that could not be extracted from a fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// Index of the fragment in the document.
    pub fragment: usize,
    /// Classification of the fragment.
    pub kind: FragmentKind,
    /// Snapshot field name.
    pub field: String,
    /// Human-readable cause.
    pub reason: String,
}

impl FieldFailure {
    /// Build a failure record from an extraction error.
    ///
    /// Returns `None` for errors that do not concern a single field.
    #[must_use]
    pub fn from_error(err: &FolioError) -> Option<Self> {
        match err {
            FolioError::FieldMissing {
                fragment,
                kind,
                field,
            } => Some(Self {
                fragment: *fragment,
                kind: kind.clone(),
                field: field.clone(),
                reason: "not found".to_string(),
            }),
            FolioError::InvalidValue {
                fragment,
                kind,
                field,
                value,
            } => Some(Self {
                fragment: *fragment,
                kind: kind.clone(),
                field: field.clone(),
                reason: format!("invalid value '{value}'"),
            }),
            _ => None,
        }
    }
}

/// The outcome of running the pipeline over one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    /// The aggregated snapshot.
    #[serde(flatten)]
    pub snapshot: PortfolioSnapshot,

    /// Fields that could not be extracted (lenient mode only).
    pub extraction_failures: Vec<FieldFailure>,

    /// Indices of fragments with an unrecognized tag.
    pub ignored_fragments: Vec<usize>,
}

impl ExtractionReport {
    /// Returns true if every recognized field was extracted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.extraction_failures.is_empty()
    }

    /// Failures for a given snapshot field.
    pub fn failures_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldFailure> {
        self.extraction_failures
            .iter()
            .filter(move |f| f.field == field)
    }
}

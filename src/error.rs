//! Fatal construction errors.
//!
//! Every variant carries the rendered [`Diagnostic`] plus the structured
//! fields (ids, lines) a caller needs to act on it without parsing text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Diagnostic, PointId, RecordError};

/// Kind of a fatal construction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A record's fields are out of range.
    MalformedRecord,
    /// Two records share an id.
    RepeatedIdentifier,
    /// A parent chain loops, including a record being its own parent.
    CyclicParent,
    /// A parent id names no record.
    MissingParent,
    /// More than one soma root.
    MultipleSomata,
    /// A soma point hangs off a neurite point.
    InvalidTypeTransition,
    /// No soma while one is required.
    MissingSoma,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord => write!(f, "malformed-record"),
            Self::RepeatedIdentifier => write!(f, "repeated-id"),
            Self::CyclicParent => write!(f, "cyclic-parent"),
            Self::MissingParent => write!(f, "missing-parent"),
            Self::MultipleSomata => write!(f, "multiple-somata"),
            Self::InvalidTypeTransition => write!(f, "invalid-type-transition"),
            Self::MissingSoma => write!(f, "missing-soma"),
        }
    }
}

/// Error type for morphology construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MorphologyError {
    /// A record could not be turned into a point.
    #[error("{diagnostic}")]
    MalformedRecord {
        /// What was wrong with the record.
        source: RecordError,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// An id appears twice.
    #[error("{diagnostic}")]
    RepeatedIdentifier {
        /// The repeated id.
        id: PointId,
        /// Line of the first occurrence.
        first_line: usize,
        /// Line of the repeated occurrence.
        line: usize,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// A parent chain loops back on itself.
    #[error("{diagnostic}")]
    CyclicParent {
        /// Lines of the records on the cycle, in walk order.
        lines: Vec<usize>,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// A parent id refers to no record.
    #[error("{diagnostic}")]
    MissingParent {
        /// The orphaned record.
        id: PointId,
        /// The unknown parent id.
        parent_id: PointId,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// Several soma roots.
    #[error("{diagnostic}")]
    MultipleSomata {
        /// Lines of every soma root.
        lines: Vec<usize>,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// A soma point whose parent is a neurite point.
    #[error("{diagnostic}")]
    InvalidTypeTransition {
        /// The soma point.
        id: PointId,
        /// Its neurite parent.
        parent_id: PointId,
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
    /// No soma point while the options require one.
    #[error("{diagnostic}")]
    MissingSoma {
        /// Rendered diagnostic.
        diagnostic: Diagnostic,
    },
}

impl MorphologyError {
    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::RepeatedIdentifier { .. } => ErrorKind::RepeatedIdentifier,
            Self::CyclicParent { .. } => ErrorKind::CyclicParent,
            Self::MissingParent { .. } => ErrorKind::MissingParent,
            Self::MultipleSomata { .. } => ErrorKind::MultipleSomata,
            Self::InvalidTypeTransition { .. } => ErrorKind::InvalidTypeTransition,
            Self::MissingSoma { .. } => ErrorKind::MissingSoma,
        }
    }

    /// The diagnostic describing this error.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            Self::MalformedRecord { diagnostic, .. }
            | Self::RepeatedIdentifier { diagnostic, .. }
            | Self::CyclicParent { diagnostic, .. }
            | Self::MissingParent { diagnostic, .. }
            | Self::MultipleSomata { diagnostic, .. }
            | Self::InvalidTypeTransition { diagnostic, .. }
            | Self::MissingSoma { diagnostic } => diagnostic,
        }
    }

    /// Line the error is reported at.
    pub fn line(&self) -> usize {
        self.diagnostic().line()
    }
}

/// Result type for morphology construction.
pub type Result<T> = std::result::Result<T, MorphologyError>;

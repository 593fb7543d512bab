//! Diagnostic values reported while building a morphology.
//!
//! A diagnostic renders as
//!
//! ```text
//! <source>:<line>:<severity>
//! <message>
//! ```
//!
//! so editors and terminals can jump straight to the offending line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Non-fatal, construction continues.
    Warning,
    /// Fatal, construction aborts.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Location of a diagnostic in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locus {
    /// Source name (usually a path), may be empty.
    pub source: String,
    /// 1-based line.
    pub line: usize,
    /// Optional 1-based column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Locus {
    /// Create a locus for a whole line.
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column: None,
        }
    }

    /// Render `<source>:<line>:<severity>`, the header line of a diagnostic.
    pub fn link(&self, severity: Severity) -> String {
        format!("{}:{}", self, severity)
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}:{}", self.source, self.line, column),
            None => write!(f, "{}:{}", self.source, self.line),
        }
    }
}

/// A located, classified message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where the problem is.
    pub locus: Locus,
    /// How bad it is.
    pub severity: Severity,
    /// Human-readable description, may span several lines.
    pub message: String,
}

impl Diagnostic {
    /// Create a warning.
    pub fn warning(locus: Locus, message: impl Into<String>) -> Self {
        Self {
            locus,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error.
    pub fn error(locus: Locus, message: impl Into<String>) -> Self {
        Self {
            locus,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Source line of the diagnostic.
    pub fn line(&self) -> usize {
        self.locus.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.locus.link(self.severity), self.message)
    }
}

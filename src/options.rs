//! Reader configuration.

use serde::{Deserialize, Serialize};

/// Default tolerance when matching the three point soma layout.
pub const DEFAULT_SOMA_TOLERANCE: f64 = 1e-6;

/// Options for building a morphology from records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Name printed in every diagnostic locus, usually the file path.
    pub source_name: String,
    /// Fail with `MissingSoma` when the input has no soma point.
    pub require_soma: bool,
    /// Absolute tolerance for the three point soma coordinate check.
    pub soma_tolerance: f64,
}

impl ReaderOptions {
    /// Options for a named source.
    pub fn for_source(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    /// Strict options: a soma is required.
    pub fn strict() -> Self {
        Self::default().with_require_soma(true)
    }

    /// Set `require_soma`, builder style.
    pub fn with_require_soma(mut self, require_soma: bool) -> Self {
        self.require_soma = require_soma;
        self
    }

    /// Set the soma tolerance, builder style.
    pub fn with_soma_tolerance(mut self, tolerance: f64) -> Self {
        self.soma_tolerance = tolerance;
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            source_name: String::new(),
            require_soma: false,
            soma_tolerance: DEFAULT_SOMA_TOLERANCE,
        }
    }
}

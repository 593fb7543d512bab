//! Morphology reader.
//!
//! Runs the construction pipeline over a record sequence:
//!
//! ```text
//! records → TopologyForest → Soma classifier → Section segmenter → Morphology
//!                 ↓                 ↓
//!           DiagnosticSink (warnings)        MorphologyError (fatal)
//! ```
//!
//! Construction is all-or-nothing: a fatal error returns before any partial
//! forest, soma or section tree reaches the caller.

use std::sync::Arc;

use crate::classifier;
use crate::diagnostics::DiagnosticSink;
use crate::error::{MorphologyError, Result};
use crate::forest::TopologyForest;
use crate::morphology::Morphology;
use crate::options::ReaderOptions;
use crate::segmenter;
use crate::types::RawRecord;

/// Builds morphologies from record sequences.
///
/// Cheap to clone; clones share the sink.
#[derive(Debug, Clone)]
pub struct MorphologyReader {
    options: ReaderOptions,
    sink: Arc<DiagnosticSink>,
}

impl MorphologyReader {
    /// Create a reader with explicit options and sink.
    pub fn new(options: ReaderOptions, sink: Arc<DiagnosticSink>) -> Self {
        Self { options, sink }
    }

    /// Default options, warnings to stderr.
    pub fn with_defaults() -> Self {
        Self::new(ReaderOptions::default(), Arc::new(DiagnosticSink::new()))
    }

    /// Default options, warnings discarded (still recorded on the morphology).
    pub fn silent() -> Self {
        Self::new(ReaderOptions::default(), Arc::new(DiagnosticSink::silent()))
    }

    /// Build a morphology.
    pub fn read(&self, records: &[RawRecord]) -> Result<Morphology> {
        let mut reporter = self.sink.reporter(&self.options.source_name);

        let forest = TopologyForest::build(records, &mut reporter)?;
        let soma = classifier::classify(&forest, &self.options, &mut reporter);

        if self.options.require_soma && soma.is_empty() {
            let line = records.first().map_or(0, |r| r.line);
            return Err(MorphologyError::MissingSoma {
                diagnostic: reporter.error(line, "No soma found"),
            });
        }

        let tree = segmenter::segment(&forest);
        tracing::debug!(
            source = %self.options.source_name,
            sections = tree.sections.len(),
            "Morphology built"
        );
        Ok(Morphology::new(soma, tree, reporter.into_warnings()))
    }

    /// Build and validate only the topology forest.
    pub fn read_forest(&self, records: &[RawRecord]) -> Result<TopologyForest> {
        let mut reporter = self.sink.reporter(&self.options.source_name);
        TopologyForest::build(records, &mut reporter)
    }

    /// Get the options.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Get the sink.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }
}

impl Default for MorphologyReader {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Morphology {
    /// Build a morphology with default options, warnings to stderr.
    pub fn from_records(records: &[RawRecord]) -> Result<Self> {
        MorphologyReader::with_defaults().read(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::SharedBuffer;
    use crate::error::ErrorKind;
    use crate::types::SomaType;

    fn neurite_only() -> Vec<RawRecord> {
        vec![
            RawRecord::new(1, 1, 3, 0.0, 0.0, 0.0, 0.5, -1),
            RawRecord::new(2, 2, 3, 0.0, 1.0, 0.0, 0.5, 1),
        ]
    }

    #[test]
    fn test_require_soma() {
        let sink = Arc::new(DiagnosticSink::silent());
        let strict = MorphologyReader::new(ReaderOptions::strict(), Arc::clone(&sink));
        let err = strict.read(&neurite_only()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSoma);

        let named = ReaderOptions::for_source("n.swc").with_require_soma(true);
        let err = MorphologyReader::new(named, Arc::clone(&sink))
            .read(&neurite_only())
            .unwrap_err();
        assert_eq!(err.to_string(), "n.swc:1:error\nNo soma found");

        let lenient = MorphologyReader::new(ReaderOptions::default(), sink);
        let m = lenient.read(&neurite_only()).unwrap();
        assert_eq!(m.soma_type(), SomaType::SomaUndefined);
        assert_eq!(m.root_sections().len(), 1);
    }

    #[test]
    fn test_warnings_recorded_on_morphology() {
        let buffer = SharedBuffer::new();
        let sink = Arc::new(DiagnosticSink::with_writer(buffer.clone()));
        let reader = MorphologyReader::new(ReaderOptions::for_source("n.swc"), sink);

        let m = reader.read(&neurite_only()).unwrap();
        assert_eq!(m.diagnostics().len(), 1);
        assert_eq!(m.diagnostics()[0].line(), 1);
        assert!(buffer.contents().starts_with("n.swc:1:warning\n"));
    }

    #[test]
    fn test_read_forest() {
        let forest = MorphologyReader::silent().read_forest(&neurite_only()).unwrap();
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let m = MorphologyReader::silent().read(&[]).unwrap();
        assert!(m.soma().is_empty());
        assert_eq!(m.num_sections(), 0);
        assert!(m.points().is_empty());
    }
}

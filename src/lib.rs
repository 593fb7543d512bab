//! # swc-morphology
//!
//! Order-independent reconstruction and validation of neuronal morphologies
//! from SWC point records.
//!
//! The crate answers one question:
//!
//! > Given a bag of `(id, type, x, y, z, radius, parent)` records in any
//! > order, what is the tree of sections they describe, and is it sound?
//!
//! ## Architecture
//!
//! ```text
//! RawRecord[] → TopologyForest → Soma classifier → Section segmenter → Morphology
//!                     ↓
//!              DiagnosticSink (warnings) / MorphologyError (fatal)
//! ```
//!
//! ## Guarantees
//!
//! - Any permutation of the input lines yields an equal `Morphology`
//! - Malformed input is rejected as a whole; no partial morphology escapes
//! - Every diagnostic carries `<source>:<line>:<severity>`
//!
//! ## Example
//!
//! ```rust
//! use swc_morphology::{MorphologyReader, RawRecord, SomaType};
//!
//! let records = vec![
//!     RawRecord::new(1, 1, 1, 0.0, 4.0, 0.0, 3.0, -1),
//!     RawRecord::new(2, 2, 3, 0.0, 0.0, 2.0, 0.5, 1),
//!     RawRecord::new(3, 3, 3, 0.0, 0.0, 3.0, 0.5, 2),
//! ];
//! let morphology = MorphologyReader::silent().read(&records).unwrap();
//!
//! assert_eq!(morphology.soma_type(), SomaType::SomaSinglePoint);
//! assert_eq!(morphology.soma().diameters(), &[6.0]);
//! assert_eq!(morphology.root_sections()[0].points().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod diagnostics;
pub mod options;
pub mod forest;
pub mod segmenter;
pub mod morphology;
pub mod diff;
pub mod canonical;
pub mod reader;

mod classifier;

// Re-exports
pub use types::{
    Diagnostic, Locus, Point, PointId, PointRecord, RawRecord, RecordError, SectionType,
    Severity, Soma, SomaType, SWC_ROOT,
};
pub use error::{ErrorKind, MorphologyError, Result};
pub use diagnostics::{DiagnosticSink, OutputTarget, RedirectGuard, SharedBuffer};
pub use options::ReaderOptions;
pub use forest::TopologyForest;
pub use segmenter::SectionId;
pub use morphology::{IterOrder, Morphology, Section, SectionIter, Upstream};
pub use diff::Difference;
pub use reader::MorphologyReader;

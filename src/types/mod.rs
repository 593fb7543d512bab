//! Core value types for morphology reconstruction.

pub mod point;
pub mod record;
pub mod diagnostic;
pub mod soma;

pub use point::Point;
pub use record::{PointId, PointRecord, RawRecord, RecordError, SectionType, SWC_ROOT};
pub use diagnostic::{Diagnostic, Locus, Severity};
pub use soma::{Soma, SomaType};

//! Point record types.
//!
//! A [`RawRecord`] is what the tokenizer hands over: numeric fields already
//! parsed, still unchecked. A [`PointRecord`] is the validated, immutable form
//! the topology builder works on.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::Point;

/// Parent id marking a record with no parent.
pub const SWC_ROOT: i64 = -1;

/// First type code reserved for custom neurite types.
pub const CUSTOM_TYPE_START: i64 = 5;

/// Last type code accepted as a custom neurite type.
pub const CUSTOM_TYPE_END: i64 = 19;

/// Identifier of a point as written in the input.
///
/// Wraps a non-negative integer and implements `Ord` so indexes keyed by it
/// iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(u64);

impl PointId {
    /// Create a new point id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PointId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// SWC structure type of a point, and of the section it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    /// Cell body.
    Soma,
    /// Axon.
    Axon,
    /// Basal dendrite.
    BasalDendrite,
    /// Apical dendrite.
    ApicalDendrite,
    /// User-defined neurite type (codes 5 to 19).
    Custom(u8),
}

impl SectionType {
    /// Parse an SWC type code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Soma),
            2 => Some(Self::Axon),
            3 => Some(Self::BasalDendrite),
            4 => Some(Self::ApicalDendrite),
            CUSTOM_TYPE_START..=CUSTOM_TYPE_END => Some(Self::Custom(code as u8)),
            _ => None,
        }
    }

    /// Get the SWC type code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Soma => 1,
            Self::Axon => 2,
            Self::BasalDendrite => 3,
            Self::ApicalDendrite => 4,
            Self::Custom(code) => *code,
        }
    }

    /// Check if this is the soma type.
    pub fn is_soma(&self) -> bool {
        matches!(self, Self::Soma)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soma => write!(f, "soma"),
            Self::Axon => write!(f, "axon"),
            Self::BasalDendrite => write!(f, "basal_dendrite"),
            Self::ApicalDendrite => write!(f, "apical_dendrite"),
            Self::Custom(code) => write!(f, "custom_{}", code),
        }
    }
}

/// Error converting a raw record into a point record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Sample ids must be non-negative.
    #[error("Negative sample ID: {0}")]
    NegativeId(i64),
    /// Type code outside the SWC and custom ranges.
    #[error("Unsupported section type: {0}")]
    UnsupportedType(i64),
    /// Parent id below -1.
    #[error("Invalid parent ID: {0} (expected -1 or a sample ID)")]
    InvalidParent(i64),
    /// Radius is negative or not a number.
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
    /// A coordinate is NaN or infinite.
    #[error("Non-finite coordinate: ({0}, {1}, {2})")]
    NonFiniteCoordinate(f64, f64, f64),
}

/// One tokenized SWC line.
///
/// Fields are parsed but not validated. `line` is the 1-based line number in
/// the source; `text` optionally keeps the original line for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based source line.
    pub line: usize,
    /// Sample id.
    pub id: i64,
    /// SWC type code.
    #[serde(rename = "type")]
    pub type_code: i64,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Radius.
    pub radius: f64,
    /// Parent id, `-1` for none.
    pub parent_id: i64,
    /// Original line text, if the tokenizer kept it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RawRecord {
    /// Create a new raw record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        line: usize,
        id: i64,
        type_code: i64,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        parent_id: i64,
    ) -> Self {
        Self {
            line,
            id,
            type_code,
            x,
            y,
            z,
            radius,
            parent_id,
            text: None,
        }
    }

    /// Attach the original line text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A validated point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Sample id.
    pub id: PointId,
    /// Structure type.
    pub section_type: SectionType,
    /// Position.
    pub position: Point,
    /// Radius (non-negative).
    pub radius: f64,
    /// Parent id, `None` for roots.
    pub parent: Option<PointId>,
    /// 1-based source line.
    pub line: usize,
}

impl PointRecord {
    /// Diameter of the point (twice the radius).
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Check if the point belongs to the soma.
    pub fn is_soma(&self) -> bool {
        self.section_type.is_soma()
    }
}

impl TryFrom<&RawRecord> for PointRecord {
    type Error = RecordError;

    fn try_from(raw: &RawRecord) -> Result<Self, Self::Error> {
        if raw.id < 0 {
            return Err(RecordError::NegativeId(raw.id));
        }
        let section_type = SectionType::from_code(raw.type_code)
            .ok_or(RecordError::UnsupportedType(raw.type_code))?;
        let parent = match raw.parent_id {
            SWC_ROOT => None,
            p if p < 0 => return Err(RecordError::InvalidParent(p)),
            p => Some(PointId::new(p as u64)),
        };
        // NaN fails the comparison too
        if !(raw.radius >= 0.0) || raw.radius.is_infinite() {
            return Err(RecordError::InvalidRadius(raw.radius));
        }
        if !(raw.x.is_finite() && raw.y.is_finite() && raw.z.is_finite()) {
            return Err(RecordError::NonFiniteCoordinate(raw.x, raw.y, raw.z));
        }

        Ok(Self {
            id: PointId::new(raw.id as u64),
            section_type,
            position: [raw.x, raw.y, raw.z],
            radius: raw.radius,
            parent,
            line: raw.line,
        })
    }
}

//! Soma types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::point::{self, Point};

/// Classification of a soma encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SomaType {
    /// No soma, or a shape with no agreed meaning (two points).
    SomaUndefined,
    /// A single sphere.
    SomaSinglePoint,
    /// The NeuroMorpho.org three point convention.
    SomaNeuromorphoThreePointCylinders,
    /// A chain or tree of cylinders.
    SomaCylinders,
}

impl fmt::Display for SomaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SomaUndefined => write!(f, "SOMA_UNDEFINED"),
            Self::SomaSinglePoint => write!(f, "SOMA_SINGLE_POINT"),
            Self::SomaNeuromorphoThreePointCylinders => {
                write!(f, "SOMA_NEUROMORPHO_THREE_POINT_CYLINDERS")
            }
            Self::SomaCylinders => write!(f, "SOMA_CYLINDERS"),
        }
    }
}

/// The cell body: every soma point, in ascending id order, with its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Soma {
    soma_type: SomaType,
    points: Vec<Point>,
    diameters: Vec<f64>,
}

impl Soma {
    pub(crate) fn new(soma_type: SomaType, points: Vec<Point>, diameters: Vec<f64>) -> Self {
        debug_assert_eq!(points.len(), diameters.len());
        Self {
            soma_type,
            points,
            diameters,
        }
    }

    /// Soma classification.
    pub fn soma_type(&self) -> SomaType {
        self.soma_type
    }

    /// Soma point positions.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Soma point diameters.
    pub fn diameters(&self) -> &[f64] {
        &self.diameters
    }

    /// Number of soma points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the morphology has no soma.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Center of gravity of the soma points.
    pub fn center(&self) -> Option<Point> {
        point::center_of_gravity(&self.points)
    }

    /// Largest distance from the soma center to a soma point.
    pub fn max_distance(&self) -> f64 {
        point::max_distance_to_center_of_gravity(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soma_type_display() {
        assert_eq!(SomaType::SomaSinglePoint.to_string(), "SOMA_SINGLE_POINT");
        assert_eq!(
            serde_json::to_string(&SomaType::SomaNeuromorphoThreePointCylinders).unwrap(),
            "\"SOMA_NEUROMORPHO_THREE_POINT_CYLINDERS\""
        );
    }

    #[test]
    fn test_soma_geometry() {
        let soma = Soma::new(
            SomaType::SomaNeuromorphoThreePointCylinders,
            vec![[0.0, 0.0, 0.0], [0.0, -3.0, 0.0], [0.0, 3.0, 0.0]],
            vec![6.0, 6.0, 6.0],
        );
        assert_eq!(soma.len(), 3);
        assert_eq!(soma.center(), Some([0.0, 0.0, 0.0]));
        assert_eq!(soma.max_distance(), 3.0);
    }

    #[test]
    fn test_empty_soma() {
        let soma = Soma::new(SomaType::SomaUndefined, vec![], vec![]);
        assert!(soma.is_empty());
        assert_eq!(soma.center(), None);
    }
}

//! Section segmentation.
//!
//! Contracts maximal unbranched same-type point chains into sections.
//!
//! ## Boundaries
//!
//! A section ends at
//! - a leaf,
//! - a branch point (two or more children), which is its last sample,
//! - a point whose only child has another type.
//!
//! Every non-root section starts with its parent's last sample repeated, so
//! consecutive sections share a joint. Root sections start at the first
//! neurite point; the soma point is not repeated.
//!
//! Ids are assigned in depth-first preorder over the root sections.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::forest::TopologyForest;
use crate::types::{Point, PointId, SectionType};

/// Index of a section in its morphology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(usize);

impl SectionId {
    /// Create a section id.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the section arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored section.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionData {
    pub(crate) section_type: SectionType,
    pub(crate) points: Vec<Point>,
    pub(crate) diameters: Vec<f64>,
    pub(crate) parent: Option<SectionId>,
    pub(crate) children: Vec<SectionId>,
}

/// Section arena plus root order.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectionTree {
    pub(crate) sections: Vec<SectionData>,
    pub(crate) roots: Vec<SectionId>,
}

/// A section waiting to be built.
struct Pending {
    start: PointId,
    parent: Option<SectionId>,
    joint: Option<(Point, f64)>,
}

/// Build the section tree of a validated forest.
pub(crate) fn segment(forest: &TopologyForest) -> SectionTree {
    let mut tree = SectionTree::default();

    let mut stack: Vec<Pending> = forest
        .neurite_roots()
        .into_iter()
        .rev()
        .map(|start| Pending {
            start,
            parent: None,
            joint: None,
        })
        .collect();

    while let Some(pending) = stack.pop() {
        let Some(first) = forest.get(pending.start) else {
            continue;
        };
        let id = SectionId::new(tree.sections.len());
        let section_type = first.section_type;

        let mut points: Vec<Point> = Vec::new();
        let mut diameters: Vec<f64> = Vec::new();
        if let Some((point, diameter)) = pending.joint {
            points.push(point);
            diameters.push(diameter);
        }

        let mut current = first;
        loop {
            points.push(current.position);
            diameters.push(current.diameter());

            let next = match forest.children(current.id) {
                [only] => forest.get(*only).filter(|p| p.section_type == section_type),
                _ => None,
            };
            match next {
                Some(point) => current = point,
                None => break,
            }
        }

        let joint = (current.position, current.diameter());
        for child in forest.children(current.id).iter().rev() {
            stack.push(Pending {
                start: *child,
                parent: Some(id),
                joint: Some(joint),
            });
        }

        match pending.parent {
            Some(parent) => tree.sections[parent.index()].children.push(id),
            None => tree.roots.push(id),
        }
        tree.sections.push(SectionData {
            section_type,
            points,
            diameters,
            parent: pending.parent,
            children: Vec::new(),
        });
    }

    tracing::debug!(
        sections = tree.sections.len(),
        roots = tree.roots.len(),
        "Sections built"
    );
    tree
}

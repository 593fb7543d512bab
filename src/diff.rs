//! Structural comparison of morphologies.

use std::fmt;

use crate::morphology::Morphology;
use crate::segmenter::SectionId;

/// First structural difference between two morphologies.
///
/// Section ids refer to the left and right morphology respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Soma points differ.
    SomaPoints,
    /// Soma diameters differ.
    SomaDiameters,
    /// Different number of root sections.
    RootCount {
        /// Left count.
        left: usize,
        /// Right count.
        right: usize,
    },
    /// Points of matching sections differ.
    SectionPoints {
        /// Left section.
        left: SectionId,
        /// Right section.
        right: SectionId,
    },
    /// Diameters of matching sections differ.
    SectionDiameters {
        /// Left section.
        left: SectionId,
        /// Right section.
        right: SectionId,
    },
    /// Matching sections have a different number of children.
    ChildCount {
        /// Left section.
        left: SectionId,
        /// Right section.
        right: SectionId,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SomaPoints => write!(f, "Soma points differ"),
            Self::SomaDiameters => write!(f, "Soma diameters differ"),
            Self::RootCount { left, right } => {
                write!(f, "Different number of root sections: {} vs {}", left, right)
            }
            Self::SectionPoints { left, right } => {
                write!(f, "Points of section {} and section {} differ", left, right)
            }
            Self::SectionDiameters { left, right } => {
                write!(f, "Diameters of section {} and section {} differ", left, right)
            }
            Self::ChildCount { left, right } => write!(
                f,
                "Section {} and section {} have a different number of children",
                left, right
            ),
        }
    }
}

/// Compare soma, roots and every section pair, stopping at the first mismatch.
pub(crate) fn first_difference(left: &Morphology, right: &Morphology) -> Option<Difference> {
    if left.soma().points() != right.soma().points() {
        return Some(Difference::SomaPoints);
    }
    if left.soma().diameters() != right.soma().diameters() {
        return Some(Difference::SomaDiameters);
    }

    let (l_roots, r_roots) = (left.root_ids(), right.root_ids());
    if l_roots.len() != r_roots.len() {
        return Some(Difference::RootCount {
            left: l_roots.len(),
            right: r_roots.len(),
        });
    }

    l_roots
        .iter()
        .zip(r_roots.iter())
        .find_map(|(l, r)| subtree_difference(left, *l, right, *r))
}

/// Compare two subtrees pairwise, depth-first.
pub(crate) fn subtree_difference(
    left: &Morphology,
    l_start: SectionId,
    right: &Morphology,
    r_start: SectionId,
) -> Option<Difference> {
    let mut stack: Vec<(SectionId, SectionId)> = vec![(l_start, r_start)];

    while let Some((l, r)) = stack.pop() {
        let (ls, rs) = (left.data(l), right.data(r));
        if ls.points != rs.points {
            return Some(Difference::SectionPoints { left: l, right: r });
        }
        if ls.diameters != rs.diameters {
            return Some(Difference::SectionDiameters { left: l, right: r });
        }
        if ls.children.len() != rs.children.len() {
            return Some(Difference::ChildCount { left: l, right: r });
        }
        stack.extend(
            ls.children
                .iter()
                .zip(rs.children.iter())
                .rev()
                .map(|(a, b)| (*a, *b)),
        );
    }

    tracing::trace!(left = %l_start, right = %r_start, "Subtrees match");
    None
}

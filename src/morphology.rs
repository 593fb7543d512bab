//! Morphology facade.
//!
//! A [`Morphology`] owns the soma, the section arena and the warnings raised
//! while building it. It is immutable; [`Section`] is a cheap borrowed view
//! into the arena.
//!
//! ## Equality
//!
//! Two morphologies are equal when their soma points and diameters are equal
//! and their section trees match recursively on points, diameters and child
//! order. Section ids, section types and the input's point ids are not
//! compared.

use std::collections::VecDeque;
use std::fmt;

use crate::diff::{self, Difference};
use crate::segmenter::{SectionData, SectionId, SectionTree};
use crate::types::{Diagnostic, Point, SectionType, Soma, SomaType};

/// Traversal order for section iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterOrder {
    /// Preorder: a section, then its subtrees left to right.
    #[default]
    DepthFirst,
    /// Level by level.
    BreadthFirst,
}

/// A reconstructed neuronal morphology.
#[derive(Debug, Clone)]
pub struct Morphology {
    soma: Soma,
    sections: Vec<SectionData>,
    roots: Vec<SectionId>,
    diagnostics: Vec<Diagnostic>,
}

impl Morphology {
    pub(crate) fn new(soma: Soma, tree: SectionTree, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            soma,
            sections: tree.sections,
            roots: tree.roots,
            diagnostics,
        }
    }

    /// The soma.
    pub fn soma(&self) -> &Soma {
        &self.soma
    }

    /// Soma classification.
    pub fn soma_type(&self) -> SomaType {
        self.soma.soma_type()
    }

    /// Root sections in order.
    pub fn root_sections(&self) -> Vec<Section<'_>> {
        self.roots.iter().map(|id| self.view(*id)).collect()
    }

    /// Look up a section by id.
    pub fn section(&self, id: SectionId) -> Option<Section<'_>> {
        (id.index() < self.sections.len()).then(|| self.view(id))
    }

    /// All sections in id order.
    pub fn sections(&self) -> impl Iterator<Item = Section<'_>> + '_ {
        (0..self.sections.len()).map(move |i| self.view(SectionId::new(i)))
    }

    /// Number of sections.
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Soma points followed by every section's points, in section id order.
    pub fn points(&self) -> Vec<Point> {
        let mut points = self.soma.points().to_vec();
        for section in &self.sections {
            points.extend_from_slice(&section.points);
        }
        points
    }

    /// Diameters aligned with [`Morphology::points`].
    pub fn diameters(&self) -> Vec<f64> {
        let mut diameters = self.soma.diameters().to_vec();
        for section in &self.sections {
            diameters.extend_from_slice(&section.diameters);
        }
        diameters
    }

    /// Type of every section, in id order.
    pub fn section_types(&self) -> Vec<SectionType> {
        self.sections.iter().map(|s| s.section_type).collect()
    }

    /// Depth-first iteration over all sections.
    pub fn iter(&self) -> SectionIter<'_> {
        self.iter_with(IterOrder::DepthFirst)
    }

    /// Iterate over all sections in the given order.
    pub fn iter_with(&self, order: IterOrder) -> SectionIter<'_> {
        SectionIter::new(self, self.roots.iter().copied(), order)
    }

    /// Warnings raised while building this morphology.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// First structural difference with `other`, if any.
    pub fn diff(&self, other: &Morphology) -> Option<Difference> {
        diff::first_difference(self, other)
    }

    /// Hex fingerprint of the compared structure.
    ///
    /// Equal morphologies have equal fingerprints.
    pub fn fingerprint(&self) -> String {
        crate::canonical::morphology_fingerprint(self)
    }

    pub(crate) fn data(&self, id: SectionId) -> &SectionData {
        &self.sections[id.index()]
    }

    pub(crate) fn root_ids(&self) -> &[SectionId] {
        &self.roots
    }

    fn view(&self, id: SectionId) -> Section<'_> {
        Section {
            morphology: self,
            id,
        }
    }
}

impl PartialEq for Morphology {
    fn eq(&self, other: &Self) -> bool {
        self.diff(other).is_none()
    }
}

/// Borrowed view of one section.
#[derive(Clone, Copy)]
pub struct Section<'a> {
    morphology: &'a Morphology,
    id: SectionId,
}

impl<'a> Section<'a> {
    /// Section id.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Structure type.
    pub fn section_type(&self) -> SectionType {
        self.data().section_type
    }

    /// Point positions.
    pub fn points(&self) -> &'a [Point] {
        &self.data().points
    }

    /// Diameters, aligned with the points.
    pub fn diameters(&self) -> &'a [f64] {
        &self.data().diameters
    }

    /// Parent section, `None` for root sections.
    pub fn parent(&self) -> Option<Section<'a>> {
        self.data().parent.map(|id| self.morphology.view(id))
    }

    /// Child sections in order.
    pub fn children(&self) -> Vec<Section<'a>> {
        self.data()
            .children
            .iter()
            .map(|id| self.morphology.view(*id))
            .collect()
    }

    /// Check if this is a root section.
    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// Iterate over this section and its subtree.
    pub fn iter(&self, order: IterOrder) -> SectionIter<'a> {
        SectionIter::new(self.morphology, std::iter::once(self.id), order)
    }

    /// Walk from this section up to its root section.
    pub fn upstream(&self) -> Upstream<'a> {
        Upstream {
            morphology: self.morphology,
            next: Some(self.id),
        }
    }

    fn data(&self) -> &'a SectionData {
        self.morphology.data(self.id)
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("section_type", &self.section_type())
            .field("points", &self.points())
            .finish()
    }
}

impl PartialEq for Section<'_> {
    /// Structural equality of the subtrees rooted here.
    fn eq(&self, other: &Self) -> bool {
        diff::subtree_difference(
            self.morphology,
            self.id,
            other.morphology,
            other.id,
        )
        .is_none()
    }
}

/// Lazy section iterator, see [`IterOrder`].
///
/// Calling `iter` again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct SectionIter<'a> {
    morphology: &'a Morphology,
    order: IterOrder,
    frontier: VecDeque<SectionId>,
}

impl<'a> SectionIter<'a> {
    fn new(
        morphology: &'a Morphology,
        starts: impl Iterator<Item = SectionId>,
        order: IterOrder,
    ) -> Self {
        Self {
            morphology,
            order,
            frontier: starts.collect(),
        }
    }
}

impl<'a> Iterator for SectionIter<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.frontier.pop_front()?;
        let children = &self.morphology.data(id).children;
        match self.order {
            IterOrder::DepthFirst => {
                for child in children.iter().rev() {
                    self.frontier.push_front(*child);
                }
            }
            IterOrder::BreadthFirst => self.frontier.extend(children.iter().copied()),
        }
        Some(self.morphology.view(id))
    }
}

/// Iterator from a section up to its root.
#[derive(Debug, Clone)]
pub struct Upstream<'a> {
    morphology: &'a Morphology,
    next: Option<SectionId>,
}

impl<'a> Iterator for Upstream<'a> {
    type Item = Section<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.morphology.data(id).parent;
        Some(self.morphology.view(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::MorphologyReader;
    use crate::types::RawRecord;

    // soma 1; dendrite 2 -> 3 branching into 4, 5; axon 6 -> 7 branching into 8, 9
    fn simple() -> Morphology {
        let rows: [(i64, i64, f64, f64, f64, i64); 9] = [
            (1, 1, 0.0, 0.0, 1.0, -1),
            (2, 3, 0.0, 0.0, 1.0, 1),
            (3, 3, 0.0, 5.0, 1.0, 2),
            (4, 3, -5.0, 5.0, 0.0, 3),
            (5, 3, 6.0, 5.0, 0.0, 3),
            (6, 2, 0.0, 0.0, 1.0, 1),
            (7, 2, 0.0, -4.0, 1.0, 6),
            (8, 2, 6.0, -4.0, 0.0, 7),
            (9, 2, -5.0, -4.0, 0.0, 7),
        ];
        let records: Vec<RawRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, &(id, t, x, y, r, p))| RawRecord::new(i + 1, id, t, x, y, 0.0, r, p))
            .collect();
        MorphologyReader::silent().read(&records).unwrap()
    }

    #[test]
    fn test_root_sections() {
        let m = simple();
        let roots = m.root_sections();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].id(), SectionId::new(0));
        assert_eq!(roots[1].id(), SectionId::new(3));
        assert!(roots[0].is_root());
        assert_eq!(roots[0].section_type(), SectionType::BasalDendrite);
        assert_eq!(roots[1].section_type(), SectionType::Axon);
    }

    #[test]
    fn test_children_and_parent() {
        let m = simple();
        let root = m.root_sections()[0];
        let children = root.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id(), SectionId::new(1));
        assert_eq!(children[1].id(), SectionId::new(2));
        assert_eq!(children[0].parent().map(|p| p.id()), Some(root.id()));
        assert_eq!(children[0].diameters(), &[2.0, 0.0]);
    }

    #[test]
    fn test_iteration_orders() {
        let m = simple();
        let dfs: Vec<usize> = m.iter().map(|s| s.id().index()).collect();
        assert_eq!(dfs, vec![0, 1, 2, 3, 4, 5]);

        let bfs: Vec<usize> = m
            .iter_with(IterOrder::BreadthFirst)
            .map(|s| s.id().index())
            .collect();
        assert_eq!(bfs, vec![0, 3, 1, 2, 4, 5]);

        // restartable
        assert_eq!(m.iter().count(), m.iter().count());
    }

    #[test]
    fn test_subtree_and_upstream() {
        let m = simple();
        let axon = m.root_sections()[1];
        let subtree: Vec<usize> = axon.iter(IterOrder::DepthFirst).map(|s| s.id().index()).collect();
        assert_eq!(subtree, vec![3, 4, 5]);

        let leaf = m.section(SectionId::new(5)).unwrap();
        let up: Vec<usize> = leaf.upstream().map(|s| s.id().index()).collect();
        assert_eq!(up, vec![5, 3]);
        assert!(m.section(SectionId::new(6)).is_none());
    }

    #[test]
    fn test_flattened_points() {
        let m = simple();
        let total: usize = m.soma().len() + m.sections().map(|s| s.points().len()).sum::<usize>();
        assert_eq!(m.points().len(), total);
        assert_eq!(m.diameters().len(), total);
        assert_eq!(m.points()[0], [0.0, 0.0, 0.0]);
        assert_eq!(m.section_types().len(), m.num_sections());
    }

    #[test]
    fn test_equality_is_structural() {
        let a = simple();
        let b = simple();
        assert!(!std::ptr::eq(&a, &b));
        assert_eq!(a, b);
        assert_eq!(a.root_sections()[1], b.root_sections()[1]);
        assert_ne!(a.root_sections()[0], b.root_sections()[1]);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}

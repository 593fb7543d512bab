//! Topology graph builder.
//!
//! Turns a flat record sequence into a validated forest of points.
//!
//! ## Algorithm
//!
//! 1. Index every record by id (repeated ids are fatal)
//! 2. Resolve parent links against the complete index (self-parent and
//!    unknown parents are fatal)
//! 3. Walk every parent chain once to find cycles
//! 4. Classify roots: one soma root at most, neurite roots warn
//! 5. Reject soma points hanging off neurite points
//!
//! The index is ordered by id and links are inserted while walking it, so
//! the forest does not depend on the order of the input lines. Line numbers
//! only feed diagnostics.
//!
//! Children keep insertion order, and insertion happens during the id-ordered
//! walk, so insertion order is ascending id order.

use std::collections::{BTreeMap, HashSet};

use crate::diagnostics::Reporter;
use crate::error::{MorphologyError, Result};
use crate::types::{PointId, PointRecord, RawRecord, Severity};

const DISCONNECTED_NEURITE: &str = "Found a disconnected neurite.\n\
Neurites are not supposed to have parentId: -1\n\
(although this is normal if this neuron has no soma)";

/// A validated forest of points.
///
/// Equality compares ids, types, positions, radii and links; source lines
/// are ignored, so permuted inputs compare equal.
#[derive(Debug, Clone)]
pub struct TopologyForest {
    points: BTreeMap<PointId, PointRecord>,
    children: BTreeMap<PointId, Vec<PointId>>,
    roots: Vec<PointId>,
}

impl TopologyForest {
    /// Build and validate a forest. Warnings go to `reporter`.
    pub(crate) fn build(records: &[RawRecord], reporter: &mut Reporter<'_>) -> Result<Self> {
        let points = index_records(records, reporter)?;
        let (children, roots) = resolve_links(&points, reporter)?;
        let forest = Self {
            points,
            children,
            roots,
        };

        forest.check_cycles(reporter)?;
        forest.check_roots(reporter)?;
        forest.check_type_transitions(reporter)?;

        tracing::debug!(
            points = forest.points.len(),
            roots = forest.roots.len(),
            "Topology forest validated"
        );
        Ok(forest)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the forest has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a point.
    pub fn get(&self, id: PointId) -> Option<&PointRecord> {
        self.points.get(&id)
    }

    /// Children of a point in insertion order, which is ascending id order.
    pub fn children(&self, id: PointId) -> &[PointId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parent of a point.
    pub fn parent(&self, id: PointId) -> Option<PointId> {
        self.points.get(&id).and_then(|p| p.parent)
    }

    /// Points without a parent, ascending id order.
    pub fn roots(&self) -> &[PointId] {
        &self.roots
    }

    /// All points, ascending id order.
    pub fn points(&self) -> impl Iterator<Item = &PointRecord> {
        self.points.values()
    }

    /// Soma points, ascending id order.
    pub fn soma_points(&self) -> impl Iterator<Item = &PointRecord> {
        self.points.values().filter(|p| p.is_soma())
    }

    /// Neurite points whose parent is a soma point or missing.
    ///
    /// Each one starts a root section. Ascending id order.
    pub fn neurite_roots(&self) -> Vec<PointId> {
        self.points
            .values()
            .filter(|p| !p.is_soma())
            .filter(|p| match p.parent {
                None => true,
                Some(parent) => self.points.get(&parent).is_some_and(|pp| pp.is_soma()),
            })
            .map(|p| p.id)
            .collect()
    }

    fn check_cycles(&self, reporter: &Reporter<'_>) -> Result<()> {
        let mut done: HashSet<PointId> = HashSet::with_capacity(self.points.len());

        for &start in self.points.keys() {
            if done.contains(&start) {
                continue;
            }

            let mut path: Vec<PointId> = Vec::new();
            let mut on_path: HashSet<PointId> = HashSet::new();
            let mut current = Some(start);

            while let Some(id) = current {
                if done.contains(&id) {
                    break;
                }
                if !on_path.insert(id) {
                    let from = path.iter().position(|p| *p == id).unwrap_or(0);
                    return Err(self.cycle_error(&path[from..], reporter));
                }
                path.push(id);
                current = self.parent(id);
            }

            done.extend(path);
        }
        Ok(())
    }

    fn cycle_error(&self, cycle: &[PointId], reporter: &Reporter<'_>) -> MorphologyError {
        let lines: Vec<usize> = cycle
            .iter()
            .filter_map(|id| self.points.get(id))
            .map(|p| p.line)
            .collect();
        let links: Vec<String> = lines
            .iter()
            .map(|&line| reporter.link(line, Severity::Error))
            .collect();
        let first_line = lines.first().copied().unwrap_or_default();
        let message = format!(
            "Found a cycle in the parent chain:\n{}",
            links.join("\n")
        );

        MorphologyError::CyclicParent {
            diagnostic: reporter.error(first_line, message),
            lines,
        }
    }

    fn check_roots(&self, reporter: &mut Reporter<'_>) -> Result<()> {
        let mut soma_lines: Vec<usize> = Vec::new();
        let mut neurite_lines: Vec<usize> = Vec::new();

        for id in &self.roots {
            if let Some(point) = self.points.get(id) {
                if point.is_soma() {
                    soma_lines.push(point.line);
                } else {
                    neurite_lines.push(point.line);
                }
            }
        }

        if soma_lines.len() > 1 {
            soma_lines.sort_unstable();
            let links: Vec<String> = soma_lines
                .iter()
                .map(|&line| format!("{}\n", reporter.link(line, Severity::Error)))
                .collect();
            let message = format!("Multiple somata found: \n\n{}", links.join("\n\n"));
            return Err(MorphologyError::MultipleSomata {
                diagnostic: reporter.error(soma_lines[0], message),
                lines: soma_lines,
            });
        }

        neurite_lines.sort_unstable();
        for line in neurite_lines {
            reporter.warn(line, DISCONNECTED_NEURITE);
        }
        Ok(())
    }

    fn check_type_transitions(&self, reporter: &Reporter<'_>) -> Result<()> {
        for point in self.soma_points() {
            let Some(parent_id) = point.parent else {
                continue;
            };
            let parent_is_soma = self.points.get(&parent_id).is_some_and(|p| p.is_soma());
            if !parent_is_soma {
                return Err(MorphologyError::InvalidTypeTransition {
                    id: point.id,
                    parent_id,
                    diagnostic: reporter
                        .error(point.line, "Found a soma point with a neurite as parent"),
                });
            }
        }
        Ok(())
    }
}

impl PartialEq for TopologyForest {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
            && self.children == other.children
            && self.points.len() == other.points.len()
            && self.points.values().zip(other.points.values()).all(|(a, b)| {
                a.id == b.id
                    && a.section_type == b.section_type
                    && a.position == b.position
                    && a.radius == b.radius
                    && a.parent == b.parent
            })
    }
}

/// Convert and index records by id.
fn index_records(
    records: &[RawRecord],
    reporter: &Reporter<'_>,
) -> Result<BTreeMap<PointId, PointRecord>> {
    let mut points: BTreeMap<PointId, PointRecord> = BTreeMap::new();

    for raw in records {
        let point = PointRecord::try_from(raw).map_err(|source| {
            let message = match &raw.text {
                Some(text) => format!("{}\n{}", source, text.trim()),
                None => source.to_string(),
            };
            MorphologyError::MalformedRecord {
                diagnostic: reporter.error(raw.line, message),
                source,
            }
        })?;

        if let Some(first) = points.get(&point.id) {
            let message = format!(
                "Repeated ID: {}\nID already appears here: \n{}",
                point.id,
                reporter.link(point.line, Severity::Warning)
            );
            return Err(MorphologyError::RepeatedIdentifier {
                id: point.id,
                first_line: first.line,
                line: point.line,
                diagnostic: reporter.error(first.line, message),
            });
        }
        points.insert(point.id, point);
    }

    tracing::debug!(records = points.len(), "Records indexed");
    Ok(points)
}

/// Resolve parent ids into children lists and roots.
fn resolve_links(
    points: &BTreeMap<PointId, PointRecord>,
    reporter: &Reporter<'_>,
) -> Result<(BTreeMap<PointId, Vec<PointId>>, Vec<PointId>)> {
    let mut children: BTreeMap<PointId, Vec<PointId>> = BTreeMap::new();
    let mut roots: Vec<PointId> = Vec::new();

    for point in points.values() {
        match point.parent {
            None => roots.push(point.id),
            Some(parent) if parent == point.id => {
                return Err(MorphologyError::CyclicParent {
                    lines: vec![point.line],
                    diagnostic: reporter.error(point.line, "Parent ID can not be itself"),
                });
            }
            Some(parent) if !points.contains_key(&parent) => {
                let message = format!(
                    "Sample id: {} refers to non-existent parent ID: {}",
                    point.id, parent
                );
                return Err(MorphologyError::MissingParent {
                    id: point.id,
                    parent_id: parent,
                    diagnostic: reporter.error(point.line, message),
                });
            }
            Some(parent) => children.entry(parent).or_default().push(point.id),
        }
    }

    Ok((children, roots))
}

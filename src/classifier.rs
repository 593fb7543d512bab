//! Soma classification.
//!
//! Assigns a [`SomaType`] from the soma subgraph of a validated forest.
//!
//! | Soma points | Shape | Type |
//! |-------------|-------|------|
//! | 0 | - | `SOMA_UNDEFINED` (no soma) |
//! | 1 | - | `SOMA_SINGLE_POINT` |
//! | 2 | - | `SOMA_UNDEFINED` |
//! | 3 | stalk + mirrored children | `SOMA_NEUROMORPHO_THREE_POINT_CYLINDERS` |
//! | 3 | stalk, other coordinates | `SOMA_CYLINDERS` + warning |
//! | 3+ | anything else | `SOMA_CYLINDERS` |
//!
//! The NeuroMorpho.org three point soma is a stalk point `(x, y, z, r)` with
//! two soma children at `(x, y - r, z)` and `(x, y + r, z)`.

use std::fmt::Write as _;

use crate::diagnostics::Reporter;
use crate::forest::TopologyForest;
use crate::options::ReaderOptions;
use crate::types::point::{self, Point};
use crate::types::{PointRecord, Soma, SomaType};

/// Classify the soma and collect its points and diameters.
pub(crate) fn classify(
    forest: &TopologyForest,
    options: &ReaderOptions,
    reporter: &mut Reporter<'_>,
) -> Soma {
    let soma_points: Vec<&PointRecord> = forest.soma_points().collect();

    let soma_type = match soma_points.len() {
        0 | 2 => SomaType::SomaUndefined,
        1 => SomaType::SomaSinglePoint,
        3 => classify_three_points(forest, &soma_points, options, reporter),
        _ => SomaType::SomaCylinders,
    };

    tracing::debug!(
        soma_points = soma_points.len(),
        soma_type = %soma_type,
        "Soma classified"
    );

    Soma::new(
        soma_type,
        soma_points.iter().map(|p| p.position).collect(),
        soma_points.iter().map(|p| p.diameter()).collect(),
    )
}

fn classify_three_points(
    forest: &TopologyForest,
    soma_points: &[&PointRecord],
    options: &ReaderOptions,
    reporter: &mut Reporter<'_>,
) -> SomaType {
    let Some((stalk, first, second)) = find_stalk(forest, soma_points) else {
        return SomaType::SomaCylinders;
    };

    let expected_first = mirror_offset(stalk, -1.0);
    let expected_second = mirror_offset(stalk, 1.0);
    let tol = options.soma_tolerance;

    let in_order = close(&first.position, &expected_first, tol)
        && close(&second.position, &expected_second, tol);
    let swapped = close(&first.position, &expected_second, tol)
        && close(&second.position, &expected_first, tol);
    if in_order || swapped {
        return SomaType::SomaNeuromorphoThreePointCylinders;
    }

    let message = three_point_mismatch(stalk, [(first, expected_first), (second, expected_second)], tol);
    reporter.warn(stalk.line, message);
    SomaType::SomaCylinders
}

/// Find a soma point with exactly two soma children.
fn find_stalk<'a>(
    forest: &'a TopologyForest,
    soma_points: &[&'a PointRecord],
) -> Option<(&'a PointRecord, &'a PointRecord, &'a PointRecord)> {
    soma_points.iter().find_map(|stalk| {
        let soma_children: Vec<&PointRecord> = forest
            .children(stalk.id)
            .iter()
            .filter_map(|id| forest.get(*id))
            .filter(|p| p.is_soma())
            .collect();
        match soma_children.as_slice() {
            [first, second] => Some((*stalk, *first, *second)),
            _ => None,
        }
    })
}

/// `(x, y + sign * r, z)` of the stalk.
fn mirror_offset(stalk: &PointRecord, sign: f64) -> Point {
    let [x, y, z] = stalk.position;
    [x, y + sign * stalk.radius, z]
}

fn close(actual: &Point, expected: &Point, tol: f64) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| (a - e).abs() <= tol)
}

fn three_point_mismatch(
    stalk: &PointRecord,
    children: [(&PointRecord, Point); 2],
    tol: f64,
) -> String {
    let mut message = String::from(
        "The soma does not conform the three point soma spec\n\
         The only valid neuro-morpho soma is:\n\
         1 1 x   y   z r -1\n\
         2 1 x (y-r) z r  1\n\
         3 1 x (y+r) z r  1\n\
         \n\
         Got:\n",
    );

    let parent = stalk.parent.map_or_else(|| "-1".to_string(), |p| p.to_string());
    let _ = writeln!(
        message,
        "{} 1 {} {} {}",
        stalk.id,
        point::dump_point(&stalk.position),
        stalk.radius,
        parent
    );

    for (child, expected) in children {
        let _ = write!(message, "{} 1", child.id);
        for (actual, exp) in child.position.iter().zip(expected.iter()) {
            if (actual - exp).abs() <= tol {
                let _ = write!(message, " {:.6}", actual);
            } else {
                let _ = write!(message, " {:.6} (exp. {:.6})", actual, exp);
            }
        }
        let _ = writeln!(message, " {:.6} {}", child.radius, stalk.id);
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticSink, SharedBuffer};
    use crate::types::RawRecord;

    fn soma(line: usize, id: i64, x: f64, y: f64, parent: i64) -> RawRecord {
        RawRecord::new(line, id, 1, x, y, 0.0, 3.0, parent)
    }

    fn classify_records(records: &[RawRecord]) -> (Soma, String) {
        classify_with(records, &ReaderOptions::default())
    }

    fn classify_with(records: &[RawRecord], options: &ReaderOptions) -> (Soma, String) {
        let buffer = SharedBuffer::new();
        let sink = DiagnosticSink::with_writer(buffer.clone());
        let mut reporter = sink.reporter("");
        let forest = TopologyForest::build(records, &mut reporter).unwrap();
        let soma = classify(&forest, options, &mut reporter);
        (soma, buffer.contents())
    }

    #[test]
    fn test_point_counts() {
        let (none, _) = classify_records(&[RawRecord::new(1, 1, 3, 0.0, 0.0, 0.0, 1.0, -1)]);
        assert_eq!(none.soma_type(), SomaType::SomaUndefined);
        assert!(none.is_empty());

        let (single, _) = classify_records(&[soma(1, 1, 0.0, 0.0, -1)]);
        assert_eq!(single.soma_type(), SomaType::SomaSinglePoint);
        assert_eq!(single.diameters(), &[6.0]);

        let (two, _) = classify_records(&[soma(1, 1, 0.0, 0.0, -1), soma(2, 2, 0.0, 0.0, 1)]);
        assert_eq!(two.soma_type(), SomaType::SomaUndefined);

        let chain: Vec<RawRecord> = (1..=5)
            .map(|i| soma(i as usize, i, 0.0, 0.0, if i == 1 { -1 } else { i - 1 }))
            .collect();
        let (five, _) = classify_records(&chain);
        assert_eq!(five.soma_type(), SomaType::SomaCylinders);
    }

    #[test]
    fn test_neuromorpho_three_points() {
        let (soma3, out) = classify_records(&[
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 0.0, -3.0, 1),
            soma(3, 3, 0.0, 3.0, 1),
        ]);
        assert_eq!(soma3.soma_type(), SomaType::SomaNeuromorphoThreePointCylinders);
        assert!(out.is_empty());
    }

    #[test]
    fn test_neuromorpho_children_swapped() {
        let (soma3, _) = classify_records(&[
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 0.0, 3.0, 1),
            soma(3, 3, 0.0, -3.0, 1),
        ]);
        assert_eq!(soma3.soma_type(), SomaType::SomaNeuromorphoThreePointCylinders);
    }

    #[test]
    fn test_three_point_chain_is_cylinders() {
        let (soma3, out) = classify_records(&[
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 0.0, 0.0, 1),
            soma(3, 3, 0.0, 0.0, 2),
        ]);
        assert_eq!(soma3.soma_type(), SomaType::SomaCylinders);
        assert!(out.is_empty());
    }

    #[test]
    fn test_three_point_mismatch_warns() {
        let (soma3, out) = classify_records(&[
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 1.0, -3.0, 1),
            soma(3, 3, 0.0, 0.0, 1),
        ]);
        assert_eq!(soma3.soma_type(), SomaType::SomaCylinders);

        let expected = ":1:warning\n\
The soma does not conform the three point soma spec\n\
The only valid neuro-morpho soma is:\n\
1 1 x   y   z r -1\n\
2 1 x (y-r) z r  1\n\
3 1 x (y+r) z r  1\n\
\n\
Got:\n\
1 1 0 0 0 3 -1\n\
2 1 1.000000 (exp. 0.000000) -3.000000 0.000000 3.000000 1\n\
3 1 0.000000 0.000000 (exp. 3.000000) 0.000000 3.000000 1\n";
        assert!(out.starts_with(expected), "got:\n{out}");
    }

    #[test]
    fn test_tolerance_applies() {
        let (soma3, _) = classify_records(&[
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 0.0, -3.0 + 1e-9, 1),
            soma(3, 3, 1e-9, 3.0, 1),
        ]);
        assert_eq!(soma3.soma_type(), SomaType::SomaNeuromorphoThreePointCylinders);

        let skewed = [
            soma(1, 1, 0.0, 0.0, -1),
            soma(2, 2, 0.0, -3.05, 1),
            soma(3, 3, 0.05, 3.0, 1),
        ];
        let (strict, _) = classify_records(&skewed);
        assert_eq!(strict.soma_type(), SomaType::SomaCylinders);

        let loose = ReaderOptions::default().with_soma_tolerance(0.1);
        let (relaxed, out) = classify_with(&skewed, &loose);
        assert_eq!(relaxed.soma_type(), SomaType::SomaNeuromorphoThreePointCylinders);
        assert!(out.is_empty());
    }
}

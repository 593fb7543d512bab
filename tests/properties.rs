//! Property tests over generated connected neurons.

use proptest::prelude::*;
use proptest::sample::Index;

use swc_morphology::{Morphology, MorphologyReader, RawRecord};

/// A soma chain of one to four points followed by neurite points, each
/// attached to a random earlier point. Ids are `1..=n`, lines follow ids.
fn neuron() -> impl Strategy<Value = Vec<RawRecord>> {
    (
        1usize..=4,
        prop::collection::vec(
            (any::<Index>(), 2i64..=4, -20i32..20, -20i32..20, -20i32..20),
            0..40,
        ),
    )
        .prop_map(|(soma_len, neurites)| {
            let mut records: Vec<RawRecord> = (0..soma_len)
                .map(|i| {
                    let id = i as i64 + 1;
                    let parent = if i == 0 { -1 } else { id - 1 };
                    RawRecord::new(i + 1, id, 1, 0.0, i as f64, 0.0, 1.0, parent)
                })
                .collect();

            for (parent, type_code, x, y, z) in neurites {
                let line = records.len() + 1;
                let parent = records[parent.index(records.len())].id;
                records.push(RawRecord::new(
                    line,
                    line as i64,
                    type_code,
                    f64::from(x),
                    f64::from(y),
                    f64::from(z),
                    0.5,
                    parent,
                ));
            }
            records
        })
}

fn build(records: &[RawRecord]) -> Morphology {
    MorphologyReader::silent()
        .read(records)
        .expect("generated neurons are valid")
}

fn renumber_lines(records: &mut [RawRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.line = i + 1;
    }
}

proptest! {
    #[test]
    fn line_order_does_not_matter(
        (records, shuffled) in neuron().prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
    ) {
        let mut shuffled = shuffled;
        renumber_lines(&mut shuffled);
        let a = build(&records);
        let b = build(&shuffled);
        prop_assert_eq!(a.diff(&b), None);
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn monotone_relabeling_gives_equal_morphology(records in neuron(), stride in 1i64..5, offset in 0i64..100) {
        let relabeled: Vec<RawRecord> = records
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r.id = r.id * stride + offset;
                if r.parent_id >= 0 {
                    r.parent_id = r.parent_id * stride + offset;
                }
                r
            })
            .collect();
        prop_assert_eq!(build(&records), build(&relabeled));
    }

    #[test]
    fn every_point_is_accounted_for(records in neuron()) {
        let m = build(&records);
        let section_points: usize = m.iter().map(|s| s.points().len()).sum();
        prop_assert_eq!(m.points().len(), m.soma().len() + section_points);
        prop_assert_eq!(m.diameters().len(), m.points().len());
        prop_assert_eq!(m.iter().count(), m.num_sections());
    }

    #[test]
    fn child_sections_start_at_parent_end(records in neuron()) {
        let m = build(&records);
        for section in m.iter() {
            prop_assert!(section.points().len() >= 2 || section.is_root());
            if let Some(parent) = section.parent() {
                prop_assert_eq!(section.points().first(), parent.points().last());
                prop_assert!(parent.children().iter().any(|c| c.id() == section.id()));
            }
        }
    }

    #[test]
    fn connected_neurons_build_without_warnings(records in neuron()) {
        prop_assert!(build(&records).diagnostics().is_empty());
    }
}

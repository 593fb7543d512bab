//! Canonical serialization for structural fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Only compared data is serialized: soma points and diameters, root
//!   count, and per section its points, diameters and child count
//! - Sections serialize in depth-first preorder, which together with child
//!   counts fixes the tree shape
//! - Floats are quantized to integers (factor 1e6) so `-0.0` and `0.0`
//!   hash alike

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::morphology::Morphology;
use crate::types::Point;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

fn quantize(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

fn quantize_points(points: &[Point]) -> Vec<[i64; 3]> {
    points
        .iter()
        .map(|p| [quantize(p[0]), quantize(p[1]), quantize(p[2])])
        .collect()
}

fn quantize_all(values: &[f64]) -> Vec<i64> {
    values.iter().map(|v| quantize(*v)).collect()
}

#[derive(Serialize)]
struct CanonicalSection {
    points: Vec<[i64; 3]>,
    diameters: Vec<i64>,
    children: usize,
}

#[derive(Serialize)]
struct CanonicalMorphology {
    soma_points: Vec<[i64; 3]>,
    soma_diameters: Vec<i64>,
    roots: usize,
    sections: Vec<CanonicalSection>,
}

/// Fingerprint of everything structural equality compares.
pub(crate) fn morphology_fingerprint(morphology: &Morphology) -> String {
    let canonical = CanonicalMorphology {
        soma_points: quantize_points(morphology.soma().points()),
        soma_diameters: quantize_all(morphology.soma().diameters()),
        roots: morphology.root_sections().len(),
        sections: morphology
            .iter()
            .map(|s| CanonicalSection {
                points: quantize_points(s.points()),
                diameters: quantize_all(s.diameters()),
                children: s.children().len(),
            })
            .collect(),
    };
    canonical_hash_hex(&canonical)
}

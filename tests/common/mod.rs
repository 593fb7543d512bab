//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use swc_morphology::{
    DiagnosticSink, Morphology, MorphologyReader, RawRecord, ReaderOptions, Result,
    SharedBuffer,
};

/// Minimal whitespace tokenizer for SWC text used by the tests.
///
/// Strips `#` comments and blank lines, keeps 1-based line numbers.
pub fn records(text: &str) -> Vec<RawRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let content = line.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                return None;
            }
            let fields: Vec<&str> = content.split_whitespace().collect();
            assert_eq!(fields.len(), 7, "line {}: {:?}", i + 1, line);
            let float = |k: usize| fields[k].parse::<f64>().unwrap();
            let int = |k: usize| fields[k].parse::<i64>().unwrap();
            Some(
                RawRecord::new(
                    i + 1,
                    int(0),
                    int(1),
                    float(2),
                    float(3),
                    float(4),
                    float(5),
                    int(6),
                )
                .with_text(content),
            )
        })
        .collect()
}

/// Reader for `source` writing warnings into a fresh buffer.
pub fn capturing_reader(source: &str) -> (MorphologyReader, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let sink = Arc::new(DiagnosticSink::with_writer(buffer.clone()));
    (MorphologyReader::new(ReaderOptions::for_source(source), sink), buffer)
}

/// Build silently from SWC text.
pub fn read(text: &str) -> Result<Morphology> {
    MorphologyReader::silent().read(&records(text))
}

/// Install a test-writer tracing subscriber once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("swc_morphology=debug")
        .with_test_writer()
        .try_init();
}

/// The reference neuron: a point soma, a forked dendrite and a forked axon.
pub const SIMPLE: &str = "# simple neuron
1 1  0  0 0 1. -1
2 3  0  0 0 1.  1
3 3  0  5 0 1.  2
4 3 -5  5 0 0.  3
5 3  6  5 0 0.  3
6 2  0  0 0 1.  1
7 2  0 -4 0 1.  6
8 2  6 -4 0 0.  7
9 2 -5 -4 0 0.  7
";

//! Group labels attached to matrix rows
//!
//! Labels are doubles and are compared exactly. They must be finite.

use nalgebra::DVector;
use robust_core::{shape, Result};
use std::collections::HashMap;
use std::ops::Range;

/// Split rows into maximal runs of consecutive rows sharing a label
pub fn consecutive_segments(labels: &DVector<f64>) -> Result<Vec<Range<usize>>> {
    shape::ensure_finite(labels, "group labels")?;

    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..labels.len() {
        if labels[i] != labels[i - 1] {
            segments.push(start..i);
            start = i;
        }
    }
    if !labels.is_empty() {
        segments.push(start..labels.len());
    }
    Ok(segments)
}

/// Hash key of a finite label; `-0.0` and `0.0` share a key
fn label_key(label: f64) -> u64 {
    if label == 0.0 {
        0.0_f64.to_bits()
    } else {
        label.to_bits()
    }
}

/// Collect row indices per label, in order of first appearance
pub fn rows_by_label(labels: &DVector<f64>) -> Result<Vec<(f64, Vec<usize>)>> {
    shape::ensure_finite(labels, "group labels")?;

    let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
    let mut position: HashMap<u64, usize> = HashMap::new();
    for (i, &label) in labels.iter().enumerate() {
        match position.get(&label_key(label)) {
            Some(&g) => groups[g].1.push(i),
            None => {
                position.insert(label_key(label), groups.len());
                groups.push((label, vec![i]));
            }
        }
    }
    Ok(groups)
}

//! Scoring a partitioning of a [`PlaneSample`] against its ground truth.
//!
//! Pairs of points are the unit of account. A *positive* is a pair the
//! partitioning cuts (different labels); it is true when the points come from
//! different planes.

use super::{fit_plane, FitError, PlaneSample, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// `|found − true| / true` plane count.
    pub planes_error: f64,
    /// Share of pairs classified correctly; `1` when there are no pairs.
    pub accuracy: f64,
    pub total_pairs: usize,
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Fitted normal per found partition, ordered by label.
    pub computed_planes: Vec<Vec3>,
}

/// Score `labels` (one per sample point) against `sample.truth`.
pub fn evaluate(labels: &[usize], sample: &PlaneSample) -> Result<Evaluation, FitError> {
    assert_eq!(labels.len(), sample.points.len(), "one label per point");
    let n = labels.len();
    let (mut tp, mut tn, mut fp, mut fneg) = (0, 0, 0, 0);
    for i in 0..n {
        for j in i + 1..n {
            let same_truth = sample.truth[i] == sample.truth[j];
            let same_label = labels[i] == labels[j];
            match (same_truth, same_label) {
                (true, true) => tn += 1,
                (false, false) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fneg += 1,
            }
        }
    }
    let total_pairs = n * n.saturating_sub(1) / 2;
    let accuracy = if total_pairs == 0 {
        1.0
    } else {
        (tp + tn) as f64 / total_pairs as f64
    };

    let mut found: Vec<usize> = labels.to_vec();
    found.sort_unstable();
    found.dedup();
    let computed_planes = found
        .iter()
        .map(|&l| {
            let pts: Vec<Vec3> = labels
                .iter()
                .zip(&sample.points)
                .filter(|(lab, _)| **lab == l)
                .map(|(_, p)| *p)
                .collect();
            fit_plane(&pts)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected = sample.planes.len();
    let planes_error = if expected == 0 {
        found.len() as f64
    } else {
        (found.len() as f64 - expected as f64).abs() / expected as f64
    };
    Ok(Evaluation {
        planes_error,
        accuracy,
        total_pairs,
        true_positives: tp,
        true_negatives: tn,
        false_positives: fp,
        false_negatives: fneg,
        computed_planes,
    })
}

//! Classification metrics for evaluating binary classifier performance.
//!
//! Provides ROC AUC (area under the receiver-operating-characteristic
//! curve) and accuracy. Labels are 0.0 / 1.0; anything above 0.5 counts
//! as the positive class.

use crate::error::{AfinarError, Result};
use crate::primitives::Vector;

/// Compute the area under the ROC curve for binary labels.
///
/// Uses the rank-statistic (Mann-Whitney U) formulation with midranks for
/// tied scores, so a random or constant scorer lands at 0.5. Accumulation
/// is in `f64`; the result lies in [0, 1] and higher is better.
///
/// # Arguments
///
/// * `y_true` - True binary labels (0.0 / 1.0)
/// * `y_score` - Predicted positive-class scores, one per sample
///
/// # Errors
///
/// The metric is undefined, and an error is returned, when the inputs are
/// empty or of different lengths, when any score is non-finite, or when
/// only one class is present in `y_true`.
///
/// # Examples
///
/// ```
/// use afinar::metrics::roc_auc_score;
/// use afinar::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[0.0, 0.0, 1.0, 1.0]);
/// let y_score = Vector::from_slice(&[0.1, 0.4, 0.35, 0.8]);
/// let auc = roc_auc_score(&y_true, &y_score).unwrap();
/// assert!((auc - 0.75).abs() < 1e-6);
/// ```
pub fn roc_auc_score(y_true: &Vector<f32>, y_score: &Vector<f32>) -> Result<f32> {
    if y_true.len() != y_score.len() {
        return Err(AfinarError::DimensionMismatch {
            expected: format!("{} scores", y_true.len()),
            actual: format!("{} scores", y_score.len()),
        });
    }
    if y_true.is_empty() {
        return Err("ROC AUC is undefined for empty input".into());
    }
    if y_score.iter().any(|s| !s.is_finite()) {
        return Err("ROC AUC received a non-finite score".into());
    }

    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&label| label > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err("ROC AUC is undefined when only one class is present".into());
    }

    // Sort sample indices by score; ties receive their midrank.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| y_score[a].total_cmp(&y_score[b]));

    let mut ranks = vec![0.0f64; n];
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && y_score[order[end + 1]] == y_score[order[start]] {
            end += 1;
        }
        // Average of the 1-based ranks start+1..=end+1.
        let midrank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = midrank;
        }
        start = end + 1;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&label, _)| label > 0.5)
        .map(|(_, &rank)| rank)
        .sum();

    let n_pos_f = n_pos as f64;
    let n_neg_f = n_neg as f64;
    let auc = (positive_rank_sum - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg_f);
    Ok(auc as f32)
}

/// Compute classification accuracy over hard 0.0 / 1.0 labels.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use afinar::metrics::accuracy;
/// use afinar::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[0.0, 1.0, 1.0, 0.0]);
/// let y_pred = Vector::from_slice(&[0.0, 1.0, 0.0, 0.0]);
/// assert!((accuracy(&y_pred, &y_true) - 0.75).abs() < 1e-6);
/// ```
#[must_use]
pub fn accuracy(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| (**p > 0.5) == (**t > 0.5))
        .count();

    correct as f32 / y_true.len() as f32
}

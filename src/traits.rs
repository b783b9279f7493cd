//! Core traits for the models a search drives.
//!
//! The search owns enumeration, fold partitioning, and aggregation; the
//! model behind this trait is an external collaborator.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// A binary classifier that can be trained and can score samples.
///
/// `predict_proba` returns the per-sample probability of the positive
/// class, which is what threshold-independent metrics such as ROC AUC
/// consume. Labels are 0.0 / 1.0.
///
/// # Examples
///
/// ```
/// use afinar::prelude::*;
/// use afinar::error::Result;
///
/// /// Predicts the training-set positive rate for every sample.
/// #[derive(Clone, Default)]
/// struct PriorClassifier {
///     positive_rate: f32,
/// }
///
/// impl Classifier for PriorClassifier {
///     fn fit(&mut self, _x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
///         if y.is_empty() {
///             return Err("cannot fit with zero samples".into());
///         }
///         let positives = y.iter().filter(|&&label| label > 0.5).count();
///         self.positive_rate = positives as f32 / y.len() as f32;
///         Ok(())
///     }
///
///     fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
///         Vector::from_vec(vec![self.positive_rate; x.n_rows()])
///     }
/// }
///
/// let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
/// let y = Vector::from_slice(&[0.0, 0.0, 1.0, 1.0]);
///
/// let mut model = PriorClassifier::default();
/// model.fit(&x, &y).unwrap();
/// assert_eq!(model.predict_proba(&x).as_slice(), &[0.5, 0.5, 0.5, 0.5]);
/// ```
pub trait Classifier {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, empty data, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts the positive-class probability for each sample.
    fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Predicts hard 0.0 / 1.0 labels at the 0.5 probability threshold.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let probabilities = self.predict_proba(x);
        Vector::from_vec(
            probabilities
                .iter()
                .map(|&p| if p >= 0.5 { 1.0 } else { 0.0 })
                .collect(),
        )
    }
}

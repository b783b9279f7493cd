//! Model selection utilities: fold assignment, cross-validation, and
//! exhaustive hyperparameter search.
//!
//! This module provides tools for:
//! - K-Fold and stratified K-Fold partitioning
//! - Cross-validation with a caller-supplied scoring rule
//! - Grid search over hyperparameter combinations (see [`search`])

pub mod search;

pub use search::{
    accuracy_scorer, evaluate, roc_auc_scorer, test_score_report, CandidateResult, GridSearch,
    ParamGrid, ParamSet, ParamValue, SearchOutcome, SearchReport,
};

use crate::error::{AfinarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Classifier;

/// Results from cross-validation.
#[derive(Debug, Clone)]
pub struct CrossValidationResult {
    /// Score for each fold
    pub scores: Vec<f32>,
}

impl CrossValidationResult {
    /// Calculate mean score across folds
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f32>() / self.scores.len() as f32
    }

    /// Calculate standard deviation of scores
    #[must_use]
    pub fn std(&self) -> f32 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .scores
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f32>()
            / self.scores.len() as f32;
        variance.sqrt()
    }

    /// Get minimum score
    #[must_use]
    pub fn min(&self) -> f32 {
        self.scores.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Get maximum score
    #[must_use]
    pub fn max(&self) -> f32 {
        self.scores
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Run cross-validation on a classifier with a caller-supplied scorer.
///
/// Clones the model for each fold, fits it on the fold's training subset,
/// and scores it on the validation subset. Higher scores are better.
///
/// # Arguments
///
/// * `model` - The untrained model to cross-validate (must be cloneable)
/// * `x` - Feature matrix
/// * `y` - Binary label vector (0.0 / 1.0)
/// * `cv` - Cross-validation splitter
/// * `scorer` - `(trained model, validation features, validation labels) -> score`
///
/// # Errors
///
/// Fails eagerly with `InsufficientData` if the fold count is incompatible
/// with the sample count, with `DimensionMismatch` on misaligned inputs,
/// and propagates any fitting or scoring failure.
///
/// # Example
///
/// ```
/// use afinar::model_selection::{cross_validate, roc_auc_scorer, KFold};
/// use afinar::prelude::*;
/// # use afinar::error::Result;
/// # #[derive(Clone, Default)]
/// # struct PriorClassifier { positive_rate: f32 }
/// # impl Classifier for PriorClassifier {
/// #     fn fit(&mut self, _x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
/// #         let positives = y.iter().filter(|&&label| label > 0.5).count();
/// #         self.positive_rate = positives as f32 / y.len() as f32;
/// #         Ok(())
/// #     }
/// #     fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
/// #         Vector::from_vec(vec![self.positive_rate; x.n_rows()])
/// #     }
/// # }
///
/// let x = Matrix::from_vec(10, 1, (0..10).map(|i| i as f32).collect()).unwrap();
/// let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
///
/// let model = PriorClassifier::default();
/// let kfold = KFold::new(5);
/// let results = cross_validate(&model, &x, &y, &kfold, roc_auc_scorer).unwrap();
/// assert_eq!(results.scores.len(), 5);
/// ```
pub fn cross_validate<M, S>(
    model: &M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    cv: &KFold,
    scorer: S,
) -> Result<CrossValidationResult>
where
    M: Classifier + Clone,
    S: Fn(&M, &Matrix<f32>, &Vector<f32>) -> Result<f32>,
{
    let n_samples = x.n_rows();
    if n_samples != y.len() {
        return Err(AfinarError::DimensionMismatch {
            expected: format!("{n_samples} labels"),
            actual: format!("{} labels", y.len()),
        });
    }
    check_fold_count(cv.n_splits(), n_samples)?;

    let splits = cv.split(n_samples);
    let mut scores = Vec::with_capacity(splits.len());

    for (train_idx, val_idx) in splits {
        let (x_train, y_train) = extract_samples(x, y, &train_idx);
        let (x_val, y_val) = extract_samples(x, y, &val_idx);

        let mut fold_model = model.clone();
        fold_model.fit(&x_train, &y_train)?;

        let score = scorer(&fold_model, &x_val, &y_val)?;
        scores.push(score);
    }

    Ok(CrossValidationResult { scores })
}

/// Fail with `InsufficientData` unless `2 <= k <= n_samples`.
pub(crate) fn check_fold_count(k: usize, n_samples: usize) -> Result<()> {
    if n_samples == 0 || k < 2 || k > n_samples {
        return Err(AfinarError::InsufficientData { k, n_samples });
    }
    Ok(())
}

/// Helper function to extract samples by indices
fn extract_samples(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    indices: &[usize],
) -> (Matrix<f32>, Vector<f32>) {
    let n_features = x.n_cols();
    let mut x_data = Vec::with_capacity(indices.len() * n_features);
    let mut y_data = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_features {
            x_data.push(x.get(idx, col));
        }
        y_data.push(y[idx]);
    }

    let x_subset =
        Matrix::from_vec(indices.len(), n_features, x_data).expect("Failed to create matrix");
    let y_subset = Vector::from_vec(y_data);

    (x_subset, y_subset)
}

/// K-Fold cross-validator.
///
/// Splits data into K consecutive folds. Each fold is used once as the
/// validation set while the remaining K-1 folds form the training set.
/// Without shuffling the partition is fully deterministic: contiguous
/// index blocks, remainder spread over the leading folds.
///
/// # Example
///
/// ```
/// use afinar::model_selection::KFold;
///
/// let kfold = KFold::new(5);
/// for (train_idx, val_idx) in kfold.split(10) {
///     assert_eq!(train_idx.len(), 8);
///     assert_eq!(val_idx.len(), 2);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl KFold {
    /// Create a new K-Fold cross-validator.
    ///
    /// # Arguments
    ///
    /// * `n_splits` - Number of folds. Must be at least 2.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Enable shuffling before splitting into folds.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set random state for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true; // Shuffle is implied when random_state is set
        self
    }

    /// Number of folds this validator produces.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate train/validation indices for each fold.
    ///
    /// Returns a vector of (train_indices, validation_indices) tuples.
    #[must_use]
    pub fn split(&self, n_samples: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        maybe_shuffle(&mut indices, self.shuffle, self.random_state);

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut result = Vec::with_capacity(self.n_splits);
        let mut start = 0;

        for i in 0..self.n_splits {
            // Distribute remainder across first folds
            let current_fold_size = if i < remainder {
                fold_size + 1
            } else {
                fold_size
            };

            let end = start + current_fold_size;
            let val_indices: Vec<usize> = indices[start..end].to_vec();

            let mut train_indices = Vec::with_capacity(n_samples - current_fold_size);
            train_indices.extend_from_slice(&indices[..start]);
            train_indices.extend_from_slice(&indices[end..]);

            result.push((train_indices, val_indices));
            start = end;
        }

        result
    }
}

/// Stratified K-Fold cross-validator.
///
/// Splits data into K folds while maintaining the proportion of samples
/// from each class in every fold. Useful for classification problems with
/// imbalanced class distributions.
///
/// Classes are grouped in sorted label order, so the partition is
/// deterministic across runs and processes.
///
/// # Example
///
/// ```
/// use afinar::model_selection::StratifiedKFold;
/// use afinar::primitives::Vector;
///
/// let y = Vector::from_slice(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
/// let skfold = StratifiedKFold::new(4);
/// for (_, val_idx) in skfold.split(&y) {
///     assert_eq!(val_idx.len(), 2);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    random_state: Option<u64>,
}

impl StratifiedKFold {
    /// Create a new Stratified K-Fold cross-validator.
    ///
    /// # Arguments
    ///
    /// * `n_splits` - Number of folds. Must be at least 2.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            random_state: None,
        }
    }

    /// Enable shuffling within each class before splitting.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set random state for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self.shuffle = true;
        self
    }

    /// Number of folds this validator produces.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate stratified train/validation indices for each fold.
    ///
    /// Maintains approximate class distribution in each fold by splitting
    /// each class separately and combining the splits.
    #[must_use]
    pub fn split(&self, y: &Vector<f32>) -> Vec<(Vec<usize>, Vec<usize>)> {
        use std::collections::BTreeMap;

        let n_samples = y.len();

        // Group indices by class label, in sorted label order.
        let mut class_indices: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, &label) in y.iter().enumerate() {
            class_indices.entry(label as i64).or_default().push(i);
        }

        if self.shuffle {
            for indices in class_indices.values_mut() {
                maybe_shuffle(indices, true, self.random_state);
            }
        }

        // Distribute each class across folds.
        let mut fold_indices: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for indices in class_indices.values() {
            let class_size = indices.len();
            let fold_size = class_size / self.n_splits;
            let remainder = class_size % self.n_splits;

            let mut start = 0;
            for (i, fold) in fold_indices.iter_mut().enumerate() {
                let current_size = if i < remainder {
                    fold_size + 1
                } else {
                    fold_size
                };
                let end = start + current_size;

                fold.extend_from_slice(&indices[start..end]);
                start = end;
            }
        }

        let mut result = Vec::with_capacity(self.n_splits);
        for i in 0..self.n_splits {
            let val_indices = fold_indices[i].clone();

            let mut train_indices = Vec::with_capacity(n_samples - val_indices.len());
            for (j, fold) in fold_indices.iter().enumerate() {
                if i != j {
                    train_indices.extend_from_slice(fold);
                }
            }

            result.push((train_indices, val_indices));
        }

        result
    }
}

/// The caller's choice of fold partitioning for a search.
///
/// Whichever strategy is chosen, the resulting partition is computed once
/// per search and reused identically across all hyperparameter
/// combinations, so their scores are comparable.
#[derive(Debug, Clone)]
pub enum FoldStrategy {
    /// Plain K-fold over sample positions.
    Plain(KFold),
    /// Class-proportional K-fold.
    Stratified(StratifiedKFold),
}

impl FoldStrategy {
    /// Number of folds the chosen strategy produces.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        match self {
            FoldStrategy::Plain(kfold) => kfold.n_splits(),
            FoldStrategy::Stratified(skfold) => skfold.n_splits(),
        }
    }

    pub(crate) fn split(&self, y: &Vector<f32>) -> Vec<(Vec<usize>, Vec<usize>)> {
        match self {
            FoldStrategy::Plain(kfold) => kfold.split(y.len()),
            FoldStrategy::Stratified(skfold) => skfold.split(y),
        }
    }
}

/// Shuffle `indices` in place, seeded when a random state is given.
fn maybe_shuffle(indices: &mut [usize], shuffle: bool, random_state: Option<u64>) {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    if !shuffle {
        return;
    }
    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }
}

//! Exhaustive hyperparameter grid search with cross-validated selection.
//!
//! The driver owns the three pieces the selection contract depends on:
//! enumeration order over the grid, the fold partition, and the
//! aggregation/tie-break rule. Every (combination, fold) pair is an
//! independent fit-and-score unit, so combinations can be evaluated by a
//! worker pool of caller-configured size without changing the outcome.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{check_fold_count, extract_samples, FoldStrategy, KFold};
use crate::error::{AfinarError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Classifier;

/// A concrete hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// Get as f64 if numeric.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as i64 if integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as usize if a non-negative integer.
    #[must_use]
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Self::Int(v) if *v >= 0 => Some(*v as usize),
            _ => None,
        }
    }

    /// Get as bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// A finite grid of hyperparameter candidates.
///
/// Maps each parameter name to an ordered candidate sequence. The search
/// explores the Cartesian product of all sequences, enumerated in
/// lexicographic order over parameter names with candidate order as given,
/// so every combination appears exactly once and runs are reproducible.
///
/// # Example
///
/// ```
/// use afinar::model_selection::ParamGrid;
///
/// let grid = ParamGrid::new()
///     .with("max_depth", [2, 3, 4])
///     .with("min_samples_leaf", [0.12, 0.14, 0.16, 0.18]);
///
/// assert_eq!(grid.n_combinations(), 12);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamGrid {
    params: BTreeMap<String, Vec<ParamValue>>,
}

impl ParamGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter with its ordered candidate values.
    #[must_use]
    pub fn with<I, V>(mut self, name: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.params
            .insert(name.to_string(), candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Number of parameters in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the grid has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Candidate values for a parameter, if present.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Option<&[ParamValue]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// Total number of combinations the grid enumerates.
    #[must_use]
    pub fn n_combinations(&self) -> usize {
        self.params.values().map(Vec::len).product()
    }

    /// Check the grid is well-formed.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidGrid` if the grid has no parameters or any
    /// parameter has zero candidates.
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(AfinarError::InvalidGrid {
                reason: "grid has no parameters".to_string(),
            });
        }
        for (name, candidates) in &self.params {
            if candidates.is_empty() {
                return Err(AfinarError::InvalidGrid {
                    reason: format!("parameter '{name}' has no candidates"),
                });
            }
        }
        Ok(())
    }

    /// Enumerate every combination in the grid exactly once.
    ///
    /// Parameter names advance in lexicographic order (the earlier name
    /// varies slowest), candidates in the order they were given.
    #[must_use]
    pub fn enumerate(&self) -> Vec<ParamSet> {
        // Cartesian product, accumulated one parameter at a time.
        let mut combos: Vec<Vec<(String, ParamValue)>> = vec![Vec::new()];

        for (name, candidates) in &self.params {
            let mut expanded = Vec::with_capacity(combos.len() * candidates.len());
            for combo in &combos {
                for value in candidates {
                    let mut next = combo.clone();
                    next.push((name.clone(), value.clone()));
                    expanded.push(next);
                }
            }
            combos = expanded;
        }

        combos.into_iter().map(|values| ParamSet { values }).collect()
    }
}

/// One concrete hyperparameter combination.
///
/// Values are held in lexicographic name order, matching grid enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    values: Vec<(String, ParamValue)>,
}

impl ParamSet {
    /// Look up a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Iterate over (name, value) pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// One hyperparameter combination paired with its cross-validation scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResult {
    /// The evaluated combination
    pub params: ParamSet,
    /// Validation score for each fold
    pub fold_scores: Vec<f32>,
}

impl CandidateResult {
    /// Mean validation score across folds.
    #[must_use]
    pub fn mean(&self) -> f32 {
        if self.fold_scores.is_empty() {
            return 0.0;
        }
        self.fold_scores.iter().sum::<f32>() / self.fold_scores.len() as f32
    }

    /// Standard deviation of the fold scores.
    #[must_use]
    pub fn std(&self) -> f32 {
        if self.fold_scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .fold_scores
            .iter()
            .map(|&score| (score - mean).powi(2))
            .sum::<f32>()
            / self.fold_scores.len() as f32;
        variance.sqrt()
    }
}

/// Outcome of a grid search: the winning combination, the full results
/// table, and a model refit on the entire training set with the winner.
#[derive(Debug, Clone)]
pub struct SearchOutcome<M> {
    /// The winning hyperparameter combination
    pub best_params: ParamSet,
    /// Index of the winner in `results` (enumeration order)
    pub best_index: usize,
    /// The winner's mean validation score
    pub best_mean_score: f32,
    /// Per-combination results, in enumeration order
    pub results: Vec<CandidateResult>,
    /// Model refit on the full training set with `best_params`
    pub best_model: M,
}

impl<M> SearchOutcome<M> {
    /// Machine-readable summary pairing the selection with a held-out score.
    #[must_use]
    pub fn report(&self, test_score: f32) -> SearchReport {
        SearchReport {
            best_params: self.best_params.clone(),
            best_mean_score: self.best_mean_score,
            test_score,
        }
    }
}

/// Machine-readable search summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// The winning hyperparameter combination
    pub best_params: ParamSet,
    /// The winner's mean cross-validation score
    pub best_mean_score: f32,
    /// Score of the refit model on the held-out test set
    pub test_score: f32,
}

/// Exhaustive grid search with cross-validated selection.
///
/// Evaluates every combination of a [`ParamGrid`] with the same fold
/// partition, selects the combination with the maximal mean validation
/// score (exact ties go to the first-enumerated combination), and refits
/// a final model on the full training set.
///
/// # Example
///
/// ```
/// use afinar::prelude::*;
/// use afinar::error::Result;
/// # #[derive(Clone)]
/// # struct Stub { bias: f32 }
/// # impl Classifier for Stub {
/// #     fn fit(&mut self, _x: &Matrix<f32>, _y: &Vector<f32>) -> Result<()> { Ok(()) }
/// #     fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
/// #         Vector::from_vec(vec![self.bias; x.n_rows()])
/// #     }
/// # }
///
/// let x = Matrix::from_vec(8, 1, (0..8).map(|i| i as f32).collect()).unwrap();
/// let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
/// let grid = ParamGrid::new().with("bias", [0.2, 0.8]);
///
/// let outcome = GridSearch::new(2)
///     .search(
///         |params| Stub { bias: params.get("bias").and_then(|v| v.as_f64()).unwrap() as f32 },
///         &grid,
///         &x,
///         &y,
///         |model: &Stub, _x, _y| Ok(model.bias),
///     )
///     .unwrap();
///
/// assert_eq!(outcome.best_params.get("bias"), Some(&ParamValue::Float(0.8)));
/// ```
#[derive(Debug, Clone)]
pub struct GridSearch {
    folds: FoldStrategy,
    n_jobs: usize,
}

impl GridSearch {
    /// Create a search with plain unshuffled `n_splits`-fold validation,
    /// evaluated sequentially.
    #[must_use]
    pub fn new(n_splits: usize) -> Self {
        Self {
            folds: FoldStrategy::Plain(KFold::new(n_splits)),
            n_jobs: 1,
        }
    }

    /// Choose the fold partitioning strategy.
    #[must_use]
    pub fn with_folds(mut self, folds: FoldStrategy) -> Self {
        self.folds = folds;
        self
    }

    /// Set the worker-pool degree for combination evaluation.
    ///
    /// `1` (the default) evaluates sequentially. Any degree produces the
    /// same outcome; only wall-clock time differs.
    #[must_use]
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs.max(1);
        self
    }

    /// Run the search.
    ///
    /// Enumerates the grid deterministically, evaluates every combination
    /// against the same fold partition (fresh model per fold, supplied
    /// scorer on the validation subset), selects the maximal mean score
    /// with first-enumerated tie-break, and refits the winner on the
    /// entire training set. The search is exhaustive: no early stopping,
    /// no pruning.
    ///
    /// # Errors
    ///
    /// * `InvalidGrid` - empty grid or a parameter with zero candidates
    /// * `InsufficientData` - fold count incompatible with the sample count
    /// * `DimensionMismatch` - features and labels of different lengths
    /// * `Scoring` - a fit or scoring failure (or non-finite score) in any
    ///   (combination, fold) unit; the whole search aborts rather than
    ///   selecting from a partial grid
    pub fn search<M, F, S>(
        &self,
        factory: F,
        grid: &ParamGrid,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        scorer: S,
    ) -> Result<SearchOutcome<M>>
    where
        M: Classifier,
        F: Fn(&ParamSet) -> M + Sync,
        S: Fn(&M, &Matrix<f32>, &Vector<f32>) -> Result<f32> + Sync,
    {
        grid.validate()?;

        let n_samples = x.n_rows();
        if n_samples != y.len() {
            return Err(AfinarError::DimensionMismatch {
                expected: format!("{n_samples} labels"),
                actual: format!("{} labels", y.len()),
            });
        }
        check_fold_count(self.folds.n_splits(), n_samples)?;

        let combos = grid.enumerate();
        // One partition, reused across all combinations.
        let splits = self.folds.split(y);

        let results: Vec<CandidateResult> = if self.n_jobs == 1 {
            combos
                .iter()
                .map(|params| evaluate_candidate(&factory, params, x, y, &splits, &scorer))
                .collect::<Result<_>>()?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.n_jobs)
                .build()
                .map_err(|e| AfinarError::Other(format!("failed to start worker pool: {e}")))?;
            pool.install(|| {
                combos
                    .par_iter()
                    .map(|params| evaluate_candidate(&factory, params, x, y, &splits, &scorer))
                    .collect::<Result<Vec<_>>>()
            })?
        };

        // Maximal mean score; strict comparison keeps the first-enumerated
        // combination on exact ties.
        let mut best_index = 0;
        for (index, candidate) in results.iter().enumerate().skip(1) {
            if candidate.mean() > results[best_index].mean() {
                best_index = index;
            }
        }

        let best_params = results[best_index].params.clone();
        let best_mean_score = results[best_index].mean();

        let mut best_model = factory(&best_params);
        best_model.fit(x, y)?;

        Ok(SearchOutcome {
            best_params,
            best_index,
            best_mean_score,
            results,
            best_model,
        })
    }
}

/// Evaluate one combination over every fold of the shared partition.
fn evaluate_candidate<M, F, S>(
    factory: &F,
    params: &ParamSet,
    x: &Matrix<f32>,
    y: &Vector<f32>,
    splits: &[(Vec<usize>, Vec<usize>)],
    scorer: &S,
) -> Result<CandidateResult>
where
    M: Classifier,
    F: Fn(&ParamSet) -> M,
    S: Fn(&M, &Matrix<f32>, &Vector<f32>) -> Result<f32>,
{
    let mut fold_scores = Vec::with_capacity(splits.len());

    for (fold, (train_idx, val_idx)) in splits.iter().enumerate() {
        let (x_train, y_train) = extract_samples(x, y, train_idx);
        let (x_val, y_val) = extract_samples(x, y, val_idx);

        let mut model = factory(params);
        model
            .fit(&x_train, &y_train)
            .map_err(|e| scoring_failure(params, fold, &e.to_string()))?;

        let score = scorer(&model, &x_val, &y_val)
            .map_err(|e| scoring_failure(params, fold, &e.to_string()))?;
        if !score.is_finite() {
            return Err(scoring_failure(
                params,
                fold,
                &format!("scorer returned non-finite value {score}"),
            ));
        }
        fold_scores.push(score);
    }

    Ok(CandidateResult {
        params: params.clone(),
        fold_scores,
    })
}

fn scoring_failure(params: &ParamSet, fold: usize, message: &str) -> AfinarError {
    AfinarError::Scoring {
        params: params.to_string(),
        fold,
        message: message.to_string(),
    }
}

/// Score an already-fitted model on held-out data.
///
/// Thin by design: applies the supplied scorer and propagates whatever the
/// prediction step signals, unwrapped.
///
/// # Errors
///
/// Whatever the scorer returns.
pub fn evaluate<M, S>(model: &M, x: &Matrix<f32>, y: &Vector<f32>, scorer: S) -> Result<f32>
where
    S: Fn(&M, &Matrix<f32>, &Vector<f32>) -> Result<f32>,
{
    scorer(model, x, y)
}

/// Score a classifier by the ROC AUC of its positive-class probabilities.
///
/// # Errors
///
/// Propagates undefined-metric conditions from
/// [`roc_auc_score`](crate::metrics::roc_auc_score).
pub fn roc_auc_scorer<M: Classifier>(
    model: &M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
) -> Result<f32> {
    let scores = model.predict_proba(x);
    crate::metrics::roc_auc_score(y, &scores)
}

/// Score a classifier by thresholded prediction accuracy.
///
/// # Errors
///
/// None beyond prediction itself; present for signature uniformity.
pub fn accuracy_scorer<M: Classifier>(
    model: &M,
    x: &Matrix<f32>,
    y: &Vector<f32>,
) -> Result<f32> {
    let predictions = model.predict(x);
    Ok(crate::metrics::accuracy(&predictions, y))
}

/// Format a held-out ROC AUC score as a single report line.
///
/// ```
/// use afinar::model_selection::test_score_report;
///
/// assert_eq!(test_score_report(0.8234), "Test set ROC AUC score: 0.823");
/// ```
#[must_use]
pub fn test_score_report(score: f32) -> String {
    format!("Test set ROC AUC score: {score:.3}")
}

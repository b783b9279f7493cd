//! Evaluation metrics for binary classifiers.
//!
//! Includes threshold-independent ranking quality (ROC AUC) and
//! hard-label accuracy.

pub mod classification;

pub use classification::{accuracy, roc_auc_score};

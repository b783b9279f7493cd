//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use afinar::prelude::*;
//! ```

pub use crate::metrics::{accuracy, roc_auc_score};
pub use crate::model_selection::{
    accuracy_scorer, cross_validate, evaluate, roc_auc_scorer, test_score_report, FoldStrategy,
    GridSearch, KFold, ParamGrid, ParamSet, ParamValue, SearchOutcome, SearchReport,
    StratifiedKFold,
};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Classifier;

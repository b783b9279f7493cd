//! Afinar: hyperparameter grid search and cross-validated model selection
//! in pure Rust.
//!
//! Afinar makes the selection procedure an explicit, documented contract:
//! the grid enumeration order, the fold partition, the aggregation rule,
//! and the tie-break are all owned by the library instead of hidden inside
//! a black-box utility. The model behind the search is a trait seam; any
//! type implementing [`Classifier`](traits::Classifier) can be tuned.
//!
//! # Quick Start
//!
//! ```
//! use afinar::prelude::*;
//! use afinar::error::Result;
//!
//! // A model is anything implementing Classifier. This one predicts the
//! // training-set positive rate, shrunk toward 0.5 by its hyperparameter.
//! #[derive(Clone)]
//! struct ShrunkPrior {
//!     shrinkage: f32,
//!     positive_rate: f32,
//! }
//!
//! impl Classifier for ShrunkPrior {
//!     fn fit(&mut self, _x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
//!         let positives = y.iter().filter(|&&label| label > 0.5).count();
//!         let rate = positives as f32 / y.len() as f32;
//!         self.positive_rate = 0.5 + (rate - 0.5) * (1.0 - self.shrinkage);
//!         Ok(())
//!     }
//!
//!     fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
//!         Vector::from_vec(vec![self.positive_rate; x.n_rows()])
//!     }
//! }
//!
//! let x = Matrix::from_vec(10, 1, (0..10).map(|i| i as f32).collect()).unwrap();
//! let y = Vector::from_slice(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
//!
//! let grid = ParamGrid::new().with("shrinkage", [0.0, 0.5, 1.0]);
//! let outcome = GridSearch::new(5)
//!     .search(
//!         |params| ShrunkPrior {
//!             shrinkage: params.get("shrinkage").and_then(|v| v.as_f64()).unwrap() as f32,
//!             positive_rate: 0.5,
//!         },
//!         &grid,
//!         &x,
//!         &y,
//!         accuracy_scorer,
//!     )
//!     .unwrap();
//!
//! assert_eq!(outcome.results.len(), 3);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`traits`]: The `Classifier` seam the search drives
//! - [`model_selection`]: K-fold partitioning, cross-validation, grid search
//! - [`metrics`]: Evaluation metrics (ROC AUC, accuracy)

pub mod error;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod primitives;
pub mod traits;

pub use error::{AfinarError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::Classifier;

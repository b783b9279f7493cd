//! Property-based tests for grid enumeration and selection invariants.

use afinar::error::Result;
use afinar::prelude::*;
use proptest::prelude::*;

// Classifier steered entirely by its "bias" hyperparameter; lets the
// properties control every candidate's score exactly.
#[derive(Debug, Clone)]
struct Stub {
    bias: f32,
}

impl Classifier for Stub {
    fn fit(&mut self, _x: &Matrix<f32>, _y: &Vector<f32>) -> Result<()> {
        Ok(())
    }

    fn predict_proba(&self, x: &Matrix<f32>) -> Vector<f32> {
        Vector::from_vec(vec![self.bias; x.n_rows()])
    }
}

fn stub_factory(params: &ParamSet) -> Stub {
    let bias = params
        .get("bias")
        .and_then(|value| value.as_f64())
        .expect("grids in these tests carry 'bias'") as f32;
    Stub { bias }
}

fn bias_scorer(model: &Stub, _x: &Matrix<f32>, _y: &Vector<f32>) -> Result<f32> {
    Ok(model.bias)
}

fn tiny_dataset(n: usize) -> (Matrix<f32>, Vector<f32>) {
    let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).expect("matrix");
    let y = Vector::from_vec((0..n).map(|i| (i % 2) as f32).collect());
    (x, y)
}

/// Build a grid from up to three parameters with the given candidate counts.
fn grid_from_counts(counts: &[usize]) -> ParamGrid {
    let names = ["alpha", "beta", "gamma"];
    let mut grid = ParamGrid::new();
    for (name, &count) in names.iter().zip(counts.iter()) {
        grid = grid.with(name, (0..count).map(|c| c as i64));
    }
    grid
}

proptest! {
    /// The number of enumerated combinations equals the product of the
    /// per-parameter candidate counts, and every combination is unique.
    #[test]
    fn prop_enumeration_is_exhaustive_and_unique(
        counts in prop::collection::vec(1_usize..5, 1..=3)
    ) {
        let grid = grid_from_counts(&counts);
        let combos = grid.enumerate();

        let expected: usize = counts.iter().product();
        prop_assert_eq!(combos.len(), expected);
        prop_assert_eq!(grid.n_combinations(), expected);

        for (i, left) in combos.iter().enumerate() {
            for right in &combos[i + 1..] {
                prop_assert_ne!(left, right);
            }
        }
    }

    /// Enumeration order is deterministic regardless of insertion order.
    #[test]
    fn prop_enumeration_order_is_deterministic(
        counts in prop::collection::vec(1_usize..4, 2..=3)
    ) {
        let forward = grid_from_counts(&counts);

        // Same parameters inserted in reverse.
        let names = ["alpha", "beta", "gamma"];
        let mut reversed = ParamGrid::new();
        for (name, &count) in names.iter().zip(counts.iter()).rev() {
            reversed = reversed.with(name, (0..count).map(|c| c as i64));
        }

        prop_assert_eq!(forward.enumerate(), reversed.enumerate());
    }

    /// Parameter names advance in lexicographic order within each combination.
    #[test]
    fn prop_param_names_sorted_within_combination(
        counts in prop::collection::vec(1_usize..4, 2..=3)
    ) {
        let grid = grid_from_counts(&counts);
        for combo in grid.enumerate() {
            let names: Vec<&str> = combo.iter().map(|(name, _)| name).collect();
            let mut sorted = names.clone();
            sorted.sort_unstable();
            prop_assert_eq!(names, sorted);
        }
    }

    /// The winner's mean score dominates every candidate, and exact ties
    /// resolve to the first-enumerated combination.
    #[test]
    fn prop_winner_dominates_with_first_tie_break(
        biases in prop::collection::vec(0.0_f64..1.0, 1..8),
        k in 2_usize..5
    ) {
        let (x, y) = tiny_dataset(20);
        let grid = ParamGrid::new().with("bias", biases.clone());

        let outcome = GridSearch::new(k)
            .search(stub_factory, &grid, &x, &y, bias_scorer)
            .expect("search succeeds");

        prop_assert_eq!(outcome.results.len(), biases.len());
        for candidate in &outcome.results {
            prop_assert!(outcome.best_mean_score >= candidate.mean());
        }

        // First index attaining the maximum wins.
        let first_max = outcome
            .results
            .iter()
            .position(|candidate| candidate.mean() >= outcome.best_mean_score)
            .expect("some candidate attains the maximum");
        prop_assert_eq!(outcome.best_index, first_max);
    }

    /// Identical inputs give identical outcomes, run to run.
    #[test]
    fn prop_search_is_idempotent(
        biases in prop::collection::vec(0.0_f64..1.0, 1..6),
        n in 8_usize..30
    ) {
        let (x, y) = tiny_dataset(n);
        let grid = ParamGrid::new().with("bias", biases);

        let first = GridSearch::new(4)
            .search(stub_factory, &grid, &x, &y, bias_scorer)
            .expect("first run");
        let second = GridSearch::new(4)
            .search(stub_factory, &grid, &x, &y, bias_scorer)
            .expect("second run");

        prop_assert_eq!(first.best_index, second.best_index);
        for (a, b) in first.results.iter().zip(second.results.iter()) {
            prop_assert_eq!(&a.fold_scores, &b.fold_scores);
        }
    }

    /// A fold count above the sample count always fails eagerly.
    #[test]
    fn prop_oversized_fold_count_fails(
        n in 1_usize..10,
        extra in 1_usize..10
    ) {
        let (x, y) = tiny_dataset(n);
        let grid = ParamGrid::new().with("bias", [0.5]);

        let err = GridSearch::new(n + extra)
            .search(stub_factory, &grid, &x, &y, bias_scorer)
            .expect_err("k exceeds samples");
        prop_assert!(
            matches!(err, afinar::AfinarError::InsufficientData { .. }),
            "expected InsufficientData error"
        );
    }
}

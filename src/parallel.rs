//! Parallel inference using rayon.
//!
//! Training stays sequential: every step mutates the shared clause arena.

use rayon::prelude::*;

use crate::{Model, Prediction};

/// # Overview
///
/// Parallel prediction over a batch.
pub fn predict_batch(model: &Model, x: &[Vec<u8>]) -> Vec<usize> {
    x.par_iter().map(|xi| model.predict(xi)).collect()
}

/// # Overview
///
/// Parallel votes and predicted class for every example.
pub fn evaluate_batch(model: &Model, x: &[Vec<u8>]) -> Vec<Prediction> {
    x.par_iter().map(|xi| model.evaluate(xi)).collect()
}

/// # Overview
///
/// Parallel accuracy; 0.0 on empty input.
pub fn accuracy_parallel(model: &Model, x: &[Vec<u8>], y: &[usize]) -> f32 {
    if x.is_empty() {
        return 0.0;
    }
    let correct: usize = x
        .par_iter()
        .zip(y.par_iter())
        .filter(|(xi, yi)| model.predict(xi) == **yi)
        .count();
    correct as f32 / x.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, TrainConfig};

    fn trained() -> (Model, Vec<Vec<u8>>, Vec<usize>) {
        let config = Config::builder()
            .classes(3)
            .features(3)
            .clauses(10)
            .states(100)
            .build()
            .unwrap();
        let x = vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]];
        let y = vec![0, 1, 2];
        let mut model = Model::dense(config).unwrap();
        model.fit(&x, &y, &TrainConfig::default(), 30, 7).unwrap();
        (model, x, y)
    }

    #[test]
    fn matches_sequential_prediction() {
        let (model, x, _) = trained();
        assert_eq!(predict_batch(&model, &x), model.predict_batch(&x));
    }

    #[test]
    fn evaluate_batch_matches_evaluate() {
        let (model, x, _) = trained();
        let batch = evaluate_batch(&model, &x);
        for (p, xi) in batch.iter().zip(&x) {
            assert_eq!(*p, model.evaluate(xi));
        }
    }

    #[test]
    fn accuracy_matches_sequential() {
        let (model, x, y) = trained();
        assert_eq!(accuracy_parallel(&model, &x, &y), model.accuracy(&x, &y));
        assert_eq!(accuracy_parallel(&model, &[], &[]), 0.0);
    }
}

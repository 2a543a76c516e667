//! Voting inference: per-class clause sums and arg-max selection.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::{
    Model,
    error::{Error, Result}
};

/// # Overview
///
/// Raw class votes and the winning class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub votes: Vec<i32>,
    pub class: usize
}

/// # Overview
///
/// Index of the largest vote. Ties resolve to the lowest index; an empty
/// slice yields 0.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::argmax;
///
/// assert_eq!(argmax(&[5, 7, 7]), 1);
/// ```
#[inline]
#[must_use]
pub fn argmax(votes: &[i32]) -> usize {
    let mut best = 0;
    for (c, &v) in votes.iter().enumerate().skip(1) {
        if v > votes[best] {
            best = c;
        }
    }
    best
}

impl Model {
    /// # Overview
    ///
    /// Raw vote of one class: positive outputs minus negative outputs.
    #[inline]
    #[must_use]
    pub fn class_vote(&self, class: usize, x: &[u8]) -> i32 {
        let n_state = self.n_state();
        (0..self.config().n_pairs())
            .map(|j| {
                let (pos, neg) = self.pair(class, j);
                i32::from(pos.evaluate(x, n_state)) - i32::from(neg.evaluate(x, n_state))
            })
            .sum()
    }

    /// # Overview
    ///
    /// Writes raw votes into a caller buffer and returns the predicted class.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] if `votes.len() != n_class`.
    pub fn evaluate_into(&self, x: &[u8], votes: &mut [i32]) -> Result<usize> {
        if votes.len() != self.n_class() {
            return Err(Error::DimensionMismatch {
                expected: self.n_class(),
                got:      votes.len()
            });
        }
        debug_assert!(x.len() >= self.config().n_feature);
        for (class, vote) in votes.iter_mut().enumerate() {
            *vote = self.class_vote(class, x);
        }
        Ok(argmax(votes))
    }

    /// # Overview
    ///
    /// Votes for every class and the arg-max class.
    #[must_use]
    pub fn evaluate(&self, x: &[u8]) -> Prediction {
        let mut votes = vec![0; self.n_class()];
        for (class, vote) in votes.iter_mut().enumerate() {
            *vote = self.class_vote(class, x);
        }
        let class = argmax(&votes);
        Prediction {
            votes,
            class
        }
    }

    /// # Overview
    ///
    /// Predicts class with highest vote.
    #[inline]
    #[must_use]
    pub fn predict(&self, x: &[u8]) -> usize {
        self.evaluate(x).class
    }

    /// # Overview
    ///
    /// Batch prediction.
    #[must_use]
    pub fn predict_batch(&self, xs: &[Vec<u8>]) -> Vec<usize> {
        xs.iter().map(|x| self.predict(x)).collect()
    }

    /// # Overview
    ///
    /// Fraction of correct predictions (0.0 to 1.0); 0.0 on empty input.
    #[must_use]
    pub fn accuracy(&self, x: &[Vec<u8>], y: &[usize]) -> f32 {
        if x.is_empty() {
            return 0.0;
        }
        let correct = x
            .iter()
            .zip(y)
            .filter(|(xi, yi)| self.predict(xi) == **yi)
            .count();
        correct as f32 / x.len() as f32
    }
}

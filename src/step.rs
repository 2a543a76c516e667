//! Per-example training step: reinforce the target class, suppress one other.

use smallvec::SmallVec;

use crate::{
    Model, TrainConfig,
    error::{Error, Result},
    feedback::{type_i, type_ii},
    utils::RandomSource
};

/// Pair outputs kept on the stack for models up to this many pairs per class.
const INLINE_PAIRS: usize = 64;

/// `(positive fired, negative fired)` for each pair of one class.
type PairOutputs = SmallVec<[(bool, bool); INLINE_PAIRS]>;

/// # Overview
///
/// Clamps a class vote to `[-T, T]`.
#[inline(always)]
#[must_use]
pub fn clamp_vote(vote: i32, threshold: u32) -> i32 {
    let t = threshold as i32;
    vote.clamp(-t, t)
}

/// # Overview
///
/// Picks a class other than `target`, uniformly among the `n_class - 1`
/// candidates.
#[inline]
pub fn sample_other_class<R: RandomSource>(target: usize, n_class: usize, rng: &mut R) -> usize {
    let k = rng.uniform_index(n_class - 1);
    if k >= target { k + 1 } else { k }
}

impl Model {
    /// Evaluates every pair of `class`, fills `out` and returns the clamped
    /// vote.
    fn pair_outputs(&self, class: usize, x: &[u8], threshold: u32, out: &mut PairOutputs) -> i32 {
        let n_state = self.n_state();
        out.clear();
        let mut vote = 0i32;
        for j in 0..self.config().n_pairs() {
            let (pos, neg) = self.pair(class, j);
            let fired = (pos.evaluate(x, n_state), neg.evaluate(x, n_state));
            vote += i32::from(fired.0) - i32::from(fired.1);
            out.push(fired);
        }
        clamp_vote(vote, threshold)
    }

    /// # Overview
    ///
    /// Trains on one labeled example.
    ///
    /// The target class `y` is reinforced with probability
    /// `c1 = (T - vote) / 2T`: Type I on its positive clauses, Type II on
    /// negative clauses that fired. One other class `y'` is then suppressed
    /// with probability `c2 = (T + vote) / 2T`: Type II on its positive
    /// clauses that fired, Type I on its negative clauses that fired.
    ///
    /// # Errors
    ///
    /// - [`Error::ClassOutOfRange`] if `y >= n_class`;
    /// - [`Error::AllocationFailed`] if the per-pair buffers cannot be
    ///   reserved.
    ///
    /// Both are raised before any automaton is touched; the example can be
    /// skipped and training continued.
    pub fn step<R: RandomSource>(
        &mut self,
        x: &[u8],
        y: usize,
        params: &TrainConfig,
        rng: &mut R
    ) -> Result<()> {
        let n_class = self.n_class();
        if y >= n_class {
            return Err(Error::ClassOutOfRange {
                class: y,
                n_class
            });
        }
        debug_assert!(x.len() >= self.config().n_feature);
        debug_assert!(params.validate().is_ok());

        let n_pairs = self.config().n_pairs();
        let n_state = self.n_state();
        let t = params.threshold as f32;

        let mut outputs = PairOutputs::new();
        outputs.try_reserve_exact(n_pairs).map_err(|_| Error::AllocationFailed)?;

        let vote = self.pair_outputs(y, x, params.threshold, &mut outputs);
        let c1 = (t - vote as f32) / (2.0 * t);
        tracing::trace!(class = y, vote, c1, "reinforce target");

        for (j, &(pos_fired, neg_fired)) in outputs.iter().enumerate() {
            let (pos, neg) = self.pair_mut(y, j);
            if rng.chance(c1) {
                type_i(pos, x, pos_fired, n_state, params.s, rng);
            }
            if neg_fired && rng.chance(c1) {
                type_ii(neg, x, n_state);
            }
        }

        let other = sample_other_class(y, n_class, rng);
        let vote = self.pair_outputs(other, x, params.threshold, &mut outputs);
        let c2 = (t + vote as f32) / (2.0 * t);
        tracing::trace!(class = other, vote, c2, "suppress non-target");

        for (j, &(pos_fired, neg_fired)) in outputs.iter().enumerate() {
            let (pos, neg) = self.pair_mut(other, j);
            if pos_fired && rng.chance(c2) {
                type_ii(pos, x, n_state);
            }
            if neg_fired && rng.chance(c2) {
                type_i(neg, x, true, n_state, params.s, rng);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::{Clause, Config, clause::Polarity, utils::rng_from_seed};

    struct Always;

    impl RngCore for Always {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn params() -> TrainConfig {
        TrainConfig::builder().threshold(2).specificity(4.0).build().unwrap()
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp_vote(7, 3), 3);
        assert_eq!(clamp_vote(-7, 3), -3);
        assert_eq!(clamp_vote(1, 3), 1);
    }

    #[test]
    fn other_class_never_target() {
        let mut rng = rng_from_seed(3);
        for target in 0..4 {
            let mut seen = [false; 4];
            for _ in 0..500 {
                seen[sample_other_class(target, 4, &mut rng)] = true;
            }
            assert!(!seen[target]);
            assert_eq!(seen.iter().filter(|&&s| s).count(), 3);
        }
    }

    #[test]
    fn other_class_with_two_classes() {
        let mut rng = rng_from_seed(3);
        assert_eq!(sample_other_class(0, 2, &mut rng), 1);
        assert_eq!(sample_other_class(1, 2, &mut rng), 0);
    }

    // `Error::AllocationFailed` shares this path: it is returned before the
    // first evaluation. Forcing it needs `try_reserve_exact` to fail for a
    // pair count the model could itself allocate, so only the
    // class-range guard is exercised here.
    #[test]
    fn rejects_unknown_class() {
        let config = Config::builder().classes(2).features(2).clauses(2).states(10).build().unwrap();
        let mut model = Model::dense(config).unwrap();
        let before = model.clone();
        let err = model.step(&[1, 0], 2, &params(), &mut rng_from_seed(1));
        assert_eq!(err, Err(Error::ClassOutOfRange {
            class:   2,
            n_class: 2
        }));
        assert_eq!(model, before);
    }

    /// Two classes, one pair each, one positive and one negative literal on
    /// x[0] per clause.
    fn tiny(states: [u16; 4]) -> Model {
        let config = Config::builder().classes(2).features(1).clauses(2).states(10).build().unwrap();
        let clauses = states.iter().map(|&s| Clause::new(&[0], &[], s)).collect();
        Model::new(config, clauses).unwrap()
    }

    fn state(model: &Model, class: usize, polarity: Polarity) -> u16 {
        model.clause(class, 0, polarity).automata()[0].state()
    }

    #[test]
    fn target_positive_clause_learns_input() {
        // target class 0: pos clause excluded -> fires, vote 0 -> c1 = 0.5
        let mut model = tiny([5, 5, 5, 5]);
        model.step(&[1], 0, &params(), &mut Always).unwrap();
        assert_eq!(state(&model, 0, Polarity::Positive), 6);
    }

    #[test]
    fn target_negative_clause_is_rejected() {
        // target neg clause fires on x=0 with its literal excluded:
        // Type II pushes it to the boundary + 1.
        let mut model = tiny([5, 5, 5, 5]);
        model.step(&[0], 0, &params(), &mut Always).unwrap();
        assert_eq!(state(&model, 0, Polarity::Negative), 6);
    }

    #[test]
    fn non_target_clauses_are_suppressed() {
        // class 1 is the only non-target; both its clauses fire on x=0.
        // pos gets Type II (5 -> 6), neg gets Type I recognize on x=0
        // (positive literal, x=0, decrement 5 -> 4).
        let mut model = tiny([5, 5, 5, 5]);
        model.step(&[0], 0, &params(), &mut Always).unwrap();
        assert_eq!(state(&model, 1, Polarity::Positive), 6);
        assert_eq!(state(&model, 1, Polarity::Negative), 4);
    }

    #[test]
    fn included_matching_literal_is_reinforced() {
        // pos literal included and x=1: fires; neg (excluded) fires too,
        // vote 0 -> c1 = 0.5 and Type I pushes the literal deeper.
        let mut model = tiny([8, 5, 5, 5]);
        model.step(&[1], 0, &params(), &mut Always).unwrap();
        assert_eq!(state(&model, 0, Polarity::Positive), 9);
    }

    #[test]
    fn saturated_target_vote_gives_no_feedback() {
        // pos fires, neg (NOT x0 included) is silent: vote = +1 = T, c1 = 0.
        let config = Config::builder().classes(2).features(1).clauses(2).states(10).build().unwrap();
        let clauses = vec![
            Clause::new(&[0], &[], 8),
            Clause::new(&[], &[0], 8),
            Clause::new(&[0], &[], 5),
            Clause::new(&[0], &[], 5),
        ];
        let mut model = Model::new(config, clauses).unwrap();
        let params = TrainConfig::builder().threshold(1).specificity(4.0).build().unwrap();
        let mut rng = rng_from_seed(42);

        for _ in 0..50 {
            model.step(&[1], 0, &params, &mut rng).unwrap();
        }
        assert_eq!(state(&model, 0, Polarity::Positive), 8);
        assert_eq!(state(&model, 0, Polarity::Negative), 8);
    }
}

//! Property-based tests for the compressed Tsetlin Machine.

use proptest::prelude::*;
use tsetlin_mcu::{
    Automaton, Clause, Config, FastRng, Model, Polarity, RandomSource, TrainConfig, argmax,
    clamp_vote, feedback, sample_other_class, utils::rng_from_seed
};

/// Seeded source drawing from `(0, 1]`, so a zero probability never passes.
struct NonZero(FastRng);

impl RandomSource for NonZero {
    fn uniform_float(&mut self) -> f32 {
        1.0 - self.0.uniform_float()
    }

    fn uniform_index(&mut self, n: usize) -> usize {
        self.0.uniform_index(n)
    }
}

/// Two classes on a one-feature input of 0. Class 0 votes `+n_pairs`
/// (every positive clause is empty, every negative one needs `x[0] == 1`),
/// class 1 votes `-n_pairs`.
fn saturated_model(n_pairs: usize) -> Model {
    let config = Config::builder()
        .classes(2)
        .features(1)
        .clauses(2 * n_pairs)
        .states(10)
        .build()
        .unwrap();
    let mut clauses = Vec::with_capacity(4 * n_pairs);
    for _ in 0..n_pairs {
        clauses.push(Clause::new(&[], &[], 5));
        clauses.push(Clause::new(&[0], &[], 10));
    }
    for _ in 0..n_pairs {
        clauses.push(Clause::new(&[0], &[], 10));
        clauses.push(Clause::new(&[], &[], 5));
    }
    Model::new(config, clauses).unwrap()
}

fn clause_strategy() -> impl Strategy<Value = (Vec<u32>, Vec<u32>, Vec<u8>)> {
    (
        prop::collection::vec(0u32..16, 0..8),
        prop::collection::vec(0u32..16, 0..8),
        prop::collection::vec(0u8..=1, 16)
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Automaton state stays within bounds after any number of operations.
    #[test]
    fn automaton_state_bounds(
        half in 1u16..100,
        ops in prop::collection::vec(any::<bool>(), 0..500)
    ) {
        let n_state = 2 * half;
        let mut a = Automaton::at_boundary(n_state);
        for up in ops {
            if up {
                a.increment(n_state);
            } else {
                a.decrement();
            }
        }
        prop_assert!((1..=n_state).contains(&a.state()));
    }

    /// Feedback never moves a state outside `[1, n_state]`.
    #[test]
    fn feedback_keeps_states_bounded(
        (pos, neg, x) in clause_strategy(),
        rounds in prop::collection::vec((any::<bool>(), any::<bool>()), 1..200),
        seed in any::<u64>(),
        s in 1.5f32..20.0
    ) {
        let n_state = 20;
        let mut clause = Clause::new(&pos, &neg, 10);
        let mut rng = rng_from_seed(seed);
        for (use_type_i, fires) in rounds {
            if use_type_i {
                feedback::type_i(&mut clause, &x, fires, n_state, s, &mut rng);
            } else {
                feedback::type_ii(&mut clause, &x, n_state);
            }
        }
        prop_assert!(clause.automata().iter().all(|a| (1..=n_state).contains(&a.state())));
    }

    /// Evaluation is pure and never changes the clause.
    #[test]
    fn evaluate_is_pure(
        (pos, neg, x) in clause_strategy(),
        state in 1u16..=20
    ) {
        let clause = Clause::new(&pos, &neg, state);
        let before = clause.clone();
        let first = clause.evaluate(&x, 20);
        prop_assert_eq!(first, clause.evaluate(&x, 20));
        prop_assert_eq!(clause, before);
    }

    /// A clause whose literals are all excluded always fires.
    #[test]
    fn excluded_clause_fires(
        (pos, neg, x) in clause_strategy(),
        state in 1u16..=10
    ) {
        let clause = Clause::new(&pos, &neg, state);
        prop_assert!(clause.evaluate(&x, 20));
    }

    /// Evaluation agrees with the literal-by-literal definition.
    #[test]
    fn evaluate_matches_definition(
        (pos, neg, x) in clause_strategy(),
        states in prop::collection::vec(1u16..=20, 16)
    ) {
        let positions: Vec<u32> = pos.iter().chain(&neg).copied().collect();
        let states = states[..positions.len()].to_vec();
        let clause = Clause::from_parts(positions, states, pos.len()).unwrap();

        let expected = clause.literals().all(|lit| {
            !lit.automaton.is_included(20) || {
                let v = x[lit.position as usize];
                match lit.polarity {
                    Polarity::Positive => v == 1,
                    Polarity::Negative => v == 0
                }
            }
        });
        prop_assert_eq!(clause.evaluate(&x, 20), expected);
    }

    /// Type II leaves a clause with only included literals untouched.
    #[test]
    fn type_ii_ignores_included(
        (pos, neg, x) in clause_strategy(),
        state in 11u16..=20
    ) {
        let mut clause = Clause::new(&pos, &neg, state);
        let before = clause.clone();
        feedback::type_ii(&mut clause, &x, 20);
        prop_assert_eq!(clause, before);
    }

    /// Clamped votes stay in `[-T, T]` and keep in-range votes.
    #[test]
    fn clamp_vote_bounds(vote in any::<i32>(), t in 1u32..1000) {
        let v = clamp_vote(vote, t);
        prop_assert!(v.abs() <= t as i32);
        if vote.unsigned_abs() <= t {
            prop_assert_eq!(v, vote);
        }
    }

    /// Votes beyond `T` are clamped before `c1`/`c2`: a target already at
    /// `+T` and a non-target at `-T` receive no feedback at all.
    #[test]
    fn saturated_votes_give_no_feedback(
        t in 1u32..8,
        extra in 0usize..40,
        steps in 1usize..20,
        seed in any::<u64>()
    ) {
        let mut model = saturated_model(t as usize + extra);
        let before = model.clone();
        let params = TrainConfig::builder().threshold(t).specificity(3.0).build().unwrap();
        let mut rng = NonZero(rng_from_seed(seed));

        for _ in 0..steps {
            model.step(&[0], 0, &params, &mut rng).unwrap();
        }
        prop_assert_eq!(model, before);
    }

    /// The first maximum always wins.
    #[test]
    fn argmax_picks_first_maximum(votes in prop::collection::vec(-50i32..50, 1..12)) {
        let best = argmax(&votes);
        let max = *votes.iter().max().unwrap();
        prop_assert_eq!(votes[best], max);
        prop_assert!(votes[..best].iter().all(|&v| v < max));
    }

    /// The sampled non-target class is valid and never the target.
    #[test]
    fn other_class_differs(n_class in 2usize..20, seed in any::<u64>()) {
        let mut rng = rng_from_seed(seed);
        let target = (seed as usize) % n_class;
        let other = sample_other_class(target, n_class, &mut rng);
        prop_assert!(other < n_class);
        prop_assert_ne!(other, target);
    }

    /// Valid configurations build, odd clause counts never do.
    #[test]
    fn config_validation(
        classes in 2usize..10,
        features in 1usize..100,
        pairs in 1usize..50,
        half in 1u16..200
    ) {
        prop_assert!(Config::builder()
            .classes(classes)
            .features(features)
            .clauses(2 * pairs)
            .states(2 * half)
            .build()
            .is_ok());
        prop_assert!(Config::builder()
            .classes(classes)
            .features(features)
            .clauses(2 * pairs + 1)
            .build()
            .is_err());
    }

    /// Predictions stay below n_class after training on arbitrary data.
    #[test]
    fn predictions_in_range(
        classes in 2usize..5,
        data in prop::collection::vec((prop::collection::vec(0u8..=1, 8), 0usize..5), 1..20),
        seed in any::<u64>()
    ) {
        let config = Config::builder()
            .classes(classes)
            .features(8)
            .clauses(4)
            .states(50)
            .build()
            .unwrap();
        let mut model = Model::dense(config).unwrap();
        let x: Vec<Vec<u8>> = data.iter().map(|(xi, _)| xi.clone()).collect();
        let y: Vec<usize> = data.iter().map(|(_, yi)| yi % classes).collect();

        model.fit(&x, &y, &TrainConfig::default(), 3, seed).unwrap();

        for xi in &x {
            let p = model.evaluate(xi);
            prop_assert!(p.class < classes);
            prop_assert_eq!(p.votes.len(), classes);
            prop_assert!(p.votes.iter().all(|v| v.unsigned_abs() as usize <= 2));
        }
    }
}

//! Type I and Type II feedback mechanisms.
//!
//! Both rules walk the clause's literal arena once. Positive and negative
//! blocks mirror each other with the input bit inverted.

use crate::{Clause, utils::RandomSource};

/// Input bit at a literal position.
///
/// # Safety
///
/// `p < x.len()`; callers check `x.len() >= clause.span()` once per call.
#[inline(always)]
unsafe fn bit(x: &[u8], p: u32) -> u8 {
    // SAFETY: upheld by the caller
    unsafe { *x.get_unchecked(p as usize) }
}

#[inline(always)]
fn check_span(clause: &Clause, x: &[u8]) {
    assert!(
        x.len() >= clause.span(),
        "input of length {} is shorter than clause span {}",
        x.len(),
        clause.span()
    );
}

/// # Overview
///
/// Type I feedback ("recognize pattern").
///
/// With `p_decrease = 1/s` and `p_increase = (s-1)/s`:
///
/// - clause did not fire: every literal above state 1 decays with
///   `p_decrease`, whatever the input;
/// - clause fired: literals agreeing with the input are rewarded with
///   `p_increase`, disagreeing ones are punished with `p_decrease`.
///
/// A draw is taken only for a literal whose state can actually move.
///
/// # Panics
///
/// If `x` is shorter than the clause [`span`](Clause::span). The length is
/// checked once per call; literal reads are unchecked.
pub fn type_i<R: RandomSource>(
    clause: &mut Clause,
    x: &[u8],
    fires: bool,
    n_state: u16,
    s: f32,
    rng: &mut R
) {
    let p_decrease = 1.0 / s;
    let p_increase = (s - 1.0) / s;
    check_span(clause, x);
    let (pos, neg) = clause.blocks_mut();

    if !fires {
        for a in pos.automata.iter_mut().chain(neg.automata.iter_mut()) {
            if a.state() > 1 && rng.chance(p_decrease) {
                a.decrement();
            }
        }
        return;
    }

    for (&p, a) in pos.positions.iter().zip(pos.automata.iter_mut()) {
        // SAFETY: p < span <= x.len()
        let xk = unsafe { bit(x, p) };
        if xk == 1 && a.state() < n_state && rng.chance(p_increase) {
            a.increment(n_state);
        } else if xk == 0 && a.state() > 1 && rng.chance(p_decrease) {
            a.decrement();
        }
    }

    for (&p, a) in neg.positions.iter().zip(neg.automata.iter_mut()) {
        // SAFETY: p < span <= x.len()
        let xk = unsafe { bit(x, p) };
        if xk == 1 && a.state() > 1 && rng.chance(p_decrease) {
            a.decrement();
        } else if xk == 0 && a.state() < n_state && rng.chance(p_increase) {
            a.increment(n_state);
        }
    }
}

/// # Overview
///
/// Type II feedback ("reject false positive"). Deterministic.
///
/// Pushes excluded literals that would have blocked this input one step
/// toward inclusion: positive literals where `x == 0`, negative literals
/// where `x == 1`. Literals already above `n_state / 2` are left alone.
///
/// # Panics
///
/// If `x` is shorter than the clause [`span`](Clause::span).
pub fn type_ii(clause: &mut Clause, x: &[u8], n_state: u16) {
    check_span(clause, x);
    let (pos, neg) = clause.blocks_mut();

    for (&p, a) in pos.positions.iter().zip(pos.automata.iter_mut()) {
        // SAFETY: p < span <= x.len()
        if unsafe { bit(x, p) } == 0 && !a.is_included(n_state) {
            a.increment(n_state);
        }
    }

    for (&p, a) in neg.positions.iter().zip(neg.automata.iter_mut()) {
        // SAFETY: p < span <= x.len()
        if unsafe { bit(x, p) } == 1 && !a.is_included(n_state) {
            a.increment(n_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;
    use crate::utils::rng_from_seed;

    /// Every draw is 0.0, so every gated update happens.
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

    /// Every draw is just below 1.0, so no gated update happens.
    struct Never;

    impl RngCore for Never {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xff);
        }
    }

    fn states(clause: &Clause) -> Vec<u16> {
        clause.automata().iter().map(|a| a.state()).collect()
    }

    #[test]
    fn type_i_erase_decays_everything() {
        let mut clause = Clause::new(&[0, 1], &[2], 6);
        type_i(&mut clause, &[1, 1, 0], false, 10, 4.0, &mut Always);
        assert_eq!(states(&clause), vec![5, 5, 5]);
    }

    #[test]
    fn type_i_erase_stops_at_one() {
        let mut clause = Clause::new(&[0], &[1], 1);
        type_i(&mut clause, &[1, 0], false, 10, 4.0, &mut Always);
        assert_eq!(states(&clause), vec![1, 1]);
    }

    #[test]
    fn type_i_recognize_follows_input() {
        // pos@0 sees 1 -> up, pos@1 sees 0 -> down,
        // neg@0 sees 1 -> down, neg@1 sees 0 -> up
        let mut clause = Clause::new(&[0, 1], &[0, 1], 5);
        type_i(&mut clause, &[1, 0], true, 10, 4.0, &mut Always);
        assert_eq!(states(&clause), vec![6, 4, 4, 6]);
    }

    #[test]
    fn type_i_recognize_respects_ceiling() {
        let mut clause = Clause::new(&[0], &[1], 10);
        type_i(&mut clause, &[1, 0], true, 10, 4.0, &mut Always);
        assert_eq!(states(&clause), vec![10, 10]);
    }

    #[test]
    fn type_i_is_gated_by_draws() {
        let mut clause = Clause::new(&[0, 1], &[2], 5);
        type_i(&mut clause, &[1, 0, 1], true, 10, 4.0, &mut Never);
        type_i(&mut clause, &[1, 0, 1], false, 10, 4.0, &mut Never);
        assert_eq!(states(&clause), vec![5, 5, 5]);
    }

    #[test]
    fn type_i_firing_learns_pattern() {
        let mut clause = Clause::new(&[0, 1, 2], &[0, 1, 2], 5);
        let mut rng = rng_from_seed(42);

        for _ in 0..200 {
            type_i(&mut clause, &[1, 0, 1], true, 10, 3.0, &mut rng);
        }

        assert!(clause.evaluate(&[1, 0, 1], 10));
        assert!(clause.automata()[0].is_included(10));
        assert!(clause.automata()[4].is_included(10));
        assert!(!clause.automata()[1].is_included(10));
    }

    #[test]
    #[should_panic(expected = "shorter than clause span")]
    fn type_i_rejects_short_input() {
        let mut clause = Clause::new(&[0], &[3], 5);
        type_i(&mut clause, &[1, 0], true, 10, 4.0, &mut Always);
    }

    #[test]
    #[should_panic(expected = "shorter than clause span")]
    fn type_ii_rejects_short_input() {
        let mut clause = Clause::new(&[2], &[], 5);
        type_ii(&mut clause, &[0, 0], 10);
    }

    #[test]
    fn input_longer_than_span_is_accepted() {
        let mut clause = Clause::new(&[0], &[1], 5);
        type_ii(&mut clause, &[0, 1, 1, 1], 10);
        assert_eq!(states(&clause), vec![6, 6]);
    }

    #[test]
    fn type_ii_at_boundary() {
        let mut clause = Clause::new(&[0], &[], 5);
        type_ii(&mut clause, &[0], 10);
        assert_eq!(clause.automata()[0].state(), 6);

        let mut clause = Clause::new(&[0], &[], 5);
        type_ii(&mut clause, &[1], 10);
        assert_eq!(clause.automata()[0].state(), 5);
    }

    #[test]
    fn type_ii_negative_block() {
        let mut clause = Clause::new(&[], &[0, 1], 3);
        type_ii(&mut clause, &[1, 0], 10);
        assert_eq!(states(&clause), vec![4, 3]);
    }

    #[test]
    fn type_ii_leaves_included_literals() {
        let mut clause = Clause::new(&[0, 1], &[2], 7);
        type_ii(&mut clause, &[0, 0, 1], 10);
        assert_eq!(states(&clause), vec![7, 7, 7]);
    }

    #[test]
    fn type_ii_blocks_false_positive() {
        let mut clause = Clause::new(&[0, 1, 2], &[0, 1, 2], 1);

        for _ in 0..100 {
            type_ii(&mut clause, &[1, 0, 1], 10);
        }

        assert!(!clause.evaluate(&[1, 0, 1], 10));
        assert_eq!(clause.automata()[1].state(), 6);
        assert_eq!(clause.automata()[0].state(), 1);
    }
}

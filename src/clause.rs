//! Compressed clause - a sparse conjunction over a fixed set of literal slots.
//!
//! A clause keeps only the literals it was built with, not all
//! `2 * n_feature` candidates. Positions and automata live in two boxed
//! arenas aligned index-for-index:
//!
//! ```text
//! positions: [ p0 p1 p2 | n0 n1 ]
//! automata:  [ a0 a1 a2 | b0 b1 ]
//!              positive   negative
//!              n_pos = 3  n_neg = 2
//! ```
//!
//! The arenas are sized once at construction. Training mutates automaton
//! states in place and never adds or removes a slot.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::{
    Automaton,
    error::{Error, Result}
};

/// # Overview
///
/// Sign of a literal or of a clause vote.
///
/// A positive literal holds when its input bit is 1, a negative one when it
/// is 0. A positive clause adds its output to the class vote, a negative
/// clause subtracts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negative
}

impl Polarity {
    /// # Overview
    ///
    /// Returns `+1` or `-1`.
    #[inline(always)]
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1
        }
    }
}

/// # Overview
///
/// One literal slot of a clause, as yielded by [`Clause::literals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub position:  u32,
    pub polarity:  Polarity,
    pub automaton: Automaton
}

/// # Overview
///
/// A clause over a fixed arena of literal slots.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::Clause;
///
/// // x[0] AND NOT x[2], both automata above the boundary of n_state = 10.
/// let clause = Clause::new(&[0], &[2], 8);
///
/// assert!(clause.evaluate(&[1, 0, 0], 10));
/// assert!(!clause.evaluate(&[1, 0, 1], 10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    positions: Box<[u32]>,
    automata:  Box<[Automaton]>,
    n_pos:     usize,
    span:      usize
}

impl Clause {
    /// # Overview
    ///
    /// Creates clause with every literal starting at `state`.
    #[must_use]
    pub fn new(positive: &[u32], negative: &[u32], state: u16) -> Self {
        let positions: Vec<u32> = positive.iter().chain(negative).copied().collect();
        let automata = positions.iter().map(|_| Automaton::with_state(state)).collect();
        Self::assemble(positions.into_boxed_slice(), automata, positive.len())
    }

    /// # Overview
    ///
    /// Creates clause from its positive-then-negative arenas.
    ///
    /// # Errors
    ///
    /// [`Error::LiteralCountMismatch`] if the arenas differ in length or
    /// `n_pos_literal` exceeds them.
    pub fn from_parts(positions: Vec<u32>, states: Vec<u16>, n_pos_literal: usize) -> Result<Self> {
        if positions.len() != states.len() || n_pos_literal > positions.len() {
            return Err(Error::LiteralCountMismatch {
                clause:    0,
                positions: positions.len(),
                states:    states.len()
            });
        }
        let automata = states.into_iter().map(Automaton::with_state).collect();
        Ok(Self::assemble(positions.into_boxed_slice(), automata, n_pos_literal))
    }

    fn assemble(positions: Box<[u32]>, automata: Box<[Automaton]>, n_pos: usize) -> Self {
        let span = positions.iter().map(|&p| p as usize + 1).max().unwrap_or(0);
        Self {
            positions,
            automata,
            n_pos,
            span
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn n_pos_literal(&self) -> usize {
        self.n_pos
    }

    #[inline(always)]
    #[must_use]
    pub fn n_neg_literal(&self) -> usize {
        self.positions.len() - self.n_pos
    }

    #[inline(always)]
    #[must_use]
    pub fn n_literals(&self) -> usize {
        self.positions.len()
    }

    /// # Overview
    ///
    /// Minimum input length: one past the largest literal position.
    #[inline(always)]
    #[must_use]
    pub fn span(&self) -> usize {
        self.span
    }

    #[inline(always)]
    #[must_use]
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    #[inline(always)]
    #[must_use]
    pub fn automata(&self) -> &[Automaton] {
        &self.automata
    }

    #[inline(always)]
    pub fn automata_mut(&mut self) -> &mut [Automaton] {
        &mut self.automata
    }

    /// # Overview
    ///
    /// Splits the arenas into their positive and negative blocks.
    #[inline(always)]
    pub(crate) fn blocks_mut(&mut self) -> (Block<'_>, Block<'_>) {
        let (pos_p, neg_p) = self.positions.split_at(self.n_pos);
        let (pos_a, neg_a) = self.automata.split_at_mut(self.n_pos);
        (
            Block {
                positions: pos_p,
                automata:  pos_a
            },
            Block {
                positions: neg_p,
                automata:  neg_a
            }
        )
    }

    /// # Overview
    ///
    /// Iterates all literal slots, positive block first.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.positions
            .iter()
            .zip(self.automata.iter())
            .enumerate()
            .map(|(k, (&position, &automaton))| Literal {
                position,
                polarity: if k < self.n_pos {
                    Polarity::Positive
                } else {
                    Polarity::Negative
                },
                automaton
            })
    }

    /// # Overview
    ///
    /// Evaluates the conjunction of included literals. Early exit on the
    /// first violation; excluded literals are ignored.
    ///
    /// # Panics
    ///
    /// If `x` is shorter than [`span`](Self::span). The length is checked
    /// once per call; literal reads are unchecked.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, x: &[u8], n_state: u16) -> bool {
        assert!(
            x.len() >= self.span,
            "input of length {} is shorter than clause span {}",
            x.len(),
            self.span
        );
        let (pos_p, neg_p) = self.positions.split_at(self.n_pos);
        let (pos_a, neg_a) = self.automata.split_at(self.n_pos);

        for (&p, a) in pos_p.iter().zip(pos_a) {
            // SAFETY: p < span <= x.len()
            if a.is_included(n_state) && unsafe { *x.get_unchecked(p as usize) } == 0 {
                return false;
            }
        }
        for (&p, a) in neg_p.iter().zip(neg_a) {
            // SAFETY: p < span <= x.len()
            if a.is_included(n_state) && unsafe { *x.get_unchecked(p as usize) } == 1 {
                return false;
            }
        }
        true
    }

    /// # Overview
    ///
    /// Number of literals currently included.
    #[must_use]
    pub fn n_included(&self, n_state: u16) -> usize {
        self.automata.iter().filter(|a| a.is_included(n_state)).count()
    }
}

/// Mutable view of one literal block.
pub(crate) struct Block<'a> {
    pub(crate) positions: &'a [u32],
    pub(crate) automata:  &'a mut [Automaton]
}

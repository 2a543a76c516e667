//! Tsetlin Automaton - the fundamental building block.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// # Overview
///
/// Returns the inclusion boundary `n_state / 2`.
///
/// States strictly above the boundary include the literal; states at or
/// below it exclude it.
#[inline(always)]
#[must_use]
pub const fn include_threshold(n_state: u16) -> u16 {
    n_state / 2
}

/// # Overview
///
/// A single Tsetlin Automaton with states from 1 to `n_state`.
/// States `1..=n_state/2` exclude the literal, states above include it.
///
/// `n_state` is shared by every automaton of a model, so it is passed in
/// rather than stored: one `u16` per literal slot is all the clause arena
/// carries.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::Automaton;
///
/// let mut automaton = Automaton::with_state(5);
/// assert!(!automaton.is_included(10));
///
/// automaton.increment(10);
/// assert!(automaton.is_included(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Automaton {
    state: u16
}

impl Automaton {
    /// # Overview
    ///
    /// Creates automaton with specific initial state.
    #[inline]
    #[must_use]
    pub const fn with_state(state: u16) -> Self {
        Self {
            state
        }
    }

    /// # Overview
    ///
    /// Creates automaton on the exclude side of the boundary.
    #[inline]
    #[must_use]
    pub const fn at_boundary(n_state: u16) -> Self {
        Self::with_state(include_threshold(n_state))
    }

    /// # Overview
    ///
    /// Returns current state value.
    #[inline(always)]
    #[must_use]
    pub const fn state(self) -> u16 {
        self.state
    }

    /// # Overview
    ///
    /// Returns true if `state > n_state / 2` (include literal).
    #[inline(always)]
    #[must_use]
    pub const fn is_included(self, n_state: u16) -> bool {
        self.state > include_threshold(n_state)
    }

    /// # Overview
    ///
    /// Increments state. Capped at `n_state`.
    #[inline(always)]
    pub fn increment(&mut self, n_state: u16) {
        if self.state < n_state {
            self.state += 1;
        }
    }

    /// # Overview
    ///
    /// Decrements state. Floored at 1.
    #[inline(always)]
    pub fn decrement(&mut self) {
        if self.state > 1 {
            self.state -= 1;
        }
    }
}

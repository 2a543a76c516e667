//! Rule extraction for interpretability.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{Clause, clause::Polarity};

/// # Overview
///
/// A human-readable rule extracted from a clause.
///
/// Represents a conjunction of the literals currently included:
/// `(x[i1] AND x[i2] AND NOT x[j1])`.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::{Clause, Polarity, Rule};
///
/// let clause = Clause::new(&[0, 3], &[2], 8);
/// let rule = Rule::from_clause(&clause, 10, Polarity::Positive);
///
/// assert_eq!(rule.included, vec![0, 3]);
/// assert_eq!(rule.negated, vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub included: Vec<usize>,
    pub negated:  Vec<usize>,
    pub polarity: Polarity
}

impl Rule {
    /// # Overview
    ///
    /// Extracts rule from a clause given the model's `n_state`.
    pub fn from_clause(clause: &Clause, n_state: u16, polarity: Polarity) -> Self {
        let mut included = Vec::new();
        let mut negated = Vec::new();

        for literal in clause.literals().filter(|l| l.automaton.is_included(n_state)) {
            match literal.polarity {
                Polarity::Positive => included.push(literal.position as usize),
                Polarity::Negative => negated.push(literal.position as usize)
            }
        }

        Self {
            included,
            negated,
            polarity
        }
    }

    /// # Overview
    ///
    /// Returns true if rule has no active literals (matches everything).
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.negated.is_empty()
    }

    /// # Overview
    ///
    /// Returns number of active literals.
    pub fn complexity(&self) -> usize {
        self.included.len() + self.negated.len()
    }
}

#[cfg(feature = "std")]
impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = match self.polarity {
            Polarity::Positive => "+",
            Polarity::Negative => "-"
        };
        if self.is_empty() {
            return write!(f, "{sign} TRUE");
        }

        let mut parts = Vec::new();
        for &i in &self.included {
            parts.push(format!("x[{i}]"));
        }
        for &i in &self.negated {
            parts.push(format!("NOT x[{i}]"));
        }

        write!(f, "{sign} ({})", parts.join(" AND "))
    }
}

//! The model: every clause of every class, plus the record it is loaded from.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Automaton, Clause, Config, Rule,
    automaton::include_threshold,
    clause::Polarity,
    error::{Error, Result}
};

/// # Overview
///
/// Persisted form of one compressed clause.
///
/// `positions` and `states` hold the positive block followed by the negative
/// block; `n_pos_literal + n_neg_literal` must equal their length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClauseRecord {
    pub n_pos_literal: u32,
    pub n_neg_literal: u32,
    pub positions:     Vec<u32>,
    pub states:        Vec<u32>
}

/// # Overview
///
/// Persisted form of a whole model, as produced by an off-device builder.
///
/// The record is untrusted: [`Model::from_record`] validates every field
/// before the core touches it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelRecord {
    pub n_class:   u32,
    pub n_feature: u32,
    pub n_clause:  u32,
    pub n_state:   u32,
    pub clauses:   Vec<ClauseRecord>
}

/// # Overview
///
/// Multi-class Tsetlin Machine over compressed clauses.
///
/// Clauses are stored flat: class `c`, pair `j` lives at
/// `c * n_clause + 2 * j` (positive) and `c * n_clause + 2 * j + 1`
/// (negative). The layout is fixed at load; training only mutates
/// automaton states.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::{Config, Model};
///
/// let config = Config::builder().classes(3).features(4).clauses(10).build().unwrap();
/// let model = Model::dense(config).unwrap();
///
/// assert!(model.predict(&[1, 0, 1, 0]) < 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ModelRecord", into = "ModelRecord")
)]
pub struct Model {
    config:  Config,
    clauses: Vec<Clause>
}

impl Model {
    /// # Overview
    ///
    /// Creates a model from already built clauses.
    ///
    /// # Errors
    ///
    /// Rejects an invalid config, a clause count other than
    /// `n_class * n_clause`, literal positions `>= n_feature` and states
    /// outside `[1, n_state]`.
    pub fn new(config: Config, clauses: Vec<Clause>) -> Result<Self> {
        config.validate()?;
        if clauses.len() != config.total_clauses() {
            return Err(Error::ClauseCountMismatch {
                expected: config.total_clauses(),
                got:      clauses.len()
            });
        }
        for (idx, clause) in clauses.iter().enumerate() {
            if let Some(&position) = clause.positions().iter().find(|&&p| p as usize >= config.n_feature) {
                return Err(Error::PositionOutOfRange {
                    clause: idx,
                    position,
                    n_feature: config.n_feature
                });
            }
            if let Some(a) = clause.automata().iter().find(|a| a.state() == 0 || a.state() > config.n_state) {
                return Err(Error::StateOutOfRange {
                    clause:  idx,
                    state:   u32::from(a.state()),
                    n_state: config.n_state
                });
            }
        }

        tracing::debug!(
            n_class = config.n_class,
            n_feature = config.n_feature,
            n_clause = config.n_clause,
            n_state = config.n_state,
            n_literals = clauses.iter().map(Clause::n_literals).sum::<usize>(),
            "model loaded"
        );

        Ok(Self {
            config,
            clauses
        })
    }

    /// # Overview
    ///
    /// Creates a model whose clauses hold every literal of every feature,
    /// each automaton just below the inclusion boundary.
    ///
    /// Starting point for training from scratch when no compressed layout
    /// was supplied.
    ///
    /// # Errors
    ///
    /// Any [`Config::validate`] failure; the fields of `Config` are public,
    /// so a hand-built config may bypass the builder.
    pub fn dense(config: Config) -> Result<Self> {
        config.validate()?;
        let all: Vec<u32> = (0..config.n_feature as u32).collect();
        let state = include_threshold(config.n_state);
        let clauses = (0..config.total_clauses()).map(|_| Clause::new(&all, &all, state)).collect();
        Ok(Self {
            config,
            clauses
        })
    }

    /// # Overview
    ///
    /// Materializes and validates a persisted record.
    ///
    /// # Errors
    ///
    /// Any shape, count, position or state violation. Nothing is
    /// re-validated on the hot path afterwards.
    pub fn from_record(record: ModelRecord) -> Result<Self> {
        if record.n_state > u32::from(u16::MAX) {
            return Err(Error::InvalidStates {
                got: record.n_state
            });
        }
        let config = Config {
            n_class:   record.n_class as usize,
            n_feature: record.n_feature as usize,
            n_clause:  record.n_clause as usize,
            n_state:   record.n_state as u16
        };
        config.validate()?;

        let mut clauses = Vec::new();
        clauses.try_reserve_exact(record.clauses.len()).map_err(|_| Error::AllocationFailed)?;

        for (idx, rec) in record.clauses.into_iter().enumerate() {
            let declared = rec.n_pos_literal as usize + rec.n_neg_literal as usize;
            if rec.positions.len() != declared || rec.states.len() != declared {
                return Err(Error::LiteralCountMismatch {
                    clause:    idx,
                    positions: rec.positions.len(),
                    states:    rec.states.len()
                });
            }
            if let Some(&state) = rec.states.iter().find(|&&s| s == 0 || s > record.n_state) {
                return Err(Error::StateOutOfRange {
                    clause: idx,
                    state,
                    n_state: config.n_state
                });
            }
            let states = rec.states.into_iter().map(|s| s as u16).collect();
            clauses.push(Clause::from_parts(rec.positions, states, rec.n_pos_literal as usize)?);
        }

        Self::new(config, clauses)
    }

    /// # Overview
    ///
    /// Snapshots the model into its persisted form.
    #[must_use]
    pub fn to_record(&self) -> ModelRecord {
        ModelRecord {
            n_class:   self.config.n_class as u32,
            n_feature: self.config.n_feature as u32,
            n_clause:  self.config.n_clause as u32,
            n_state:   u32::from(self.config.n_state),
            clauses:   self
                .clauses
                .iter()
                .map(|c| ClauseRecord {
                    n_pos_literal: c.n_pos_literal() as u32,
                    n_neg_literal: c.n_neg_literal() as u32,
                    positions:     c.positions().to_vec(),
                    states:        c.automata().iter().map(|a| u32::from(a.state())).collect()
                })
                .collect()
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    #[must_use]
    pub fn n_class(&self) -> usize {
        self.config.n_class
    }

    #[inline(always)]
    #[must_use]
    pub fn n_state(&self) -> u16 {
        self.config.n_state
    }

    #[inline(always)]
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// # Overview
    ///
    /// Clause of a class/pair slot.
    ///
    /// # Panics
    ///
    /// If the slot is outside the model.
    #[inline]
    #[must_use]
    pub fn clause(&self, class: usize, pair: usize, polarity: Polarity) -> &Clause {
        &self.clauses[self.config.clause_index(class, pair, polarity)]
    }

    #[inline]
    pub fn clause_mut(&mut self, class: usize, pair: usize, polarity: Polarity) -> &mut Clause {
        let idx = self.config.clause_index(class, pair, polarity);
        &mut self.clauses[idx]
    }

    /// # Overview
    ///
    /// Positive and negative clause of one pair.
    #[inline(always)]
    pub(crate) fn pair(&self, class: usize, pair: usize) -> (&Clause, &Clause) {
        let base = self.config.clause_index(class, pair, Polarity::Positive);
        (&self.clauses[base], &self.clauses[base + 1])
    }

    #[inline(always)]
    pub(crate) fn pair_mut(&mut self, class: usize, pair: usize) -> (&mut Clause, &mut Clause) {
        let base = self.config.clause_index(class, pair, Polarity::Positive);
        match &mut self.clauses[base..base + 2] {
            [pos, neg] => (pos, neg),
            _ => unreachable!("pair slice always holds two clauses")
        }
    }

    /// # Overview
    ///
    /// Extracts the rules of one class, positive and negative clauses
    /// interleaved as stored.
    #[must_use]
    pub fn rules(&self, class: usize) -> Vec<Rule> {
        (0..self.config.n_pairs())
            .flat_map(|j| {
                let (pos, neg) = self.pair(class, j);
                [
                    Rule::from_clause(pos, self.config.n_state, Polarity::Positive),
                    Rule::from_clause(neg, self.config.n_state, Polarity::Negative)
                ]
            })
            .collect()
    }

    /// # Overview
    ///
    /// Automaton states of all clauses, in storage order.
    pub fn automata(&self) -> impl Iterator<Item = &Automaton> + '_ {
        self.clauses.iter().flat_map(|c| c.automata().iter())
    }
}

impl TryFrom<ModelRecord> for Model {
    type Error = Error;

    fn try_from(record: ModelRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

impl From<Model> for ModelRecord {
    fn from(model: Model) -> Self {
        model.to_record()
    }
}

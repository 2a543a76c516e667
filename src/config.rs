//! Model shape and training hyper-parameters, with validating builders.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    clause::Polarity,
    error::{Error, Result}
};

/// # Overview
///
/// Shape of a model: classes, input width, clauses per class and automaton
/// depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Config {
    pub n_class:   usize,
    pub n_feature: usize,
    pub n_clause:  usize,
    pub n_state:   u16
}

impl Config {
    /// # Overview
    ///
    /// Creates a new ConfigBuilder.
    #[inline]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.n_class < 2 {
            return Err(Error::TooFewClasses {
                got: self.n_class
            });
        }
        if self.n_clause == 0 {
            return Err(Error::MissingClauses);
        }
        if !self.n_clause.is_multiple_of(2) {
            return Err(Error::OddClauses);
        }
        if self.n_feature == 0 {
            return Err(Error::MissingFeatures);
        }
        if self.n_state < 2 || !self.n_state.is_multiple_of(2) {
            return Err(Error::InvalidStates {
                got: u32::from(self.n_state)
            });
        }
        Ok(())
    }

    /// # Overview
    ///
    /// Positive/negative clause pairs per class.
    #[inline(always)]
    #[must_use]
    pub const fn n_pairs(&self) -> usize {
        self.n_clause / 2
    }

    /// # Overview
    ///
    /// Total clause count across all classes.
    #[inline(always)]
    #[must_use]
    pub const fn total_clauses(&self) -> usize {
        self.n_class * self.n_clause
    }

    /// # Overview
    ///
    /// Flat index of a clause: `class * n_clause + 2 * pair`, plus one for
    /// the negative clause of the pair.
    #[inline(always)]
    #[must_use]
    pub const fn clause_index(&self, class: usize, pair: usize, polarity: Polarity) -> usize {
        let base = class * self.n_clause + pair * 2;
        match polarity {
            Polarity::Positive => base,
            Polarity::Negative => base + 1
        }
    }
}

/// # Overview
///
/// Builder for Config with validation.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    n_class:   Option<usize>,
    n_feature: Option<usize>,
    n_clause:  Option<usize>,
    n_state:   Option<u16>
}

impl ConfigBuilder {
    /// # Overview
    ///
    /// Sets the number of classes (at least 2).
    pub fn classes(mut self, n: usize) -> Self {
        self.n_class = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets the width of the boolean input vector.
    pub fn features(mut self, n: usize) -> Self {
        self.n_feature = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets clauses per class (must be even).
    pub fn clauses(mut self, n: usize) -> Self {
        self.n_clause = Some(n);
        self
    }

    /// # Overview
    ///
    /// Sets automaton depth (even, default: 200).
    pub fn states(mut self, n: u16) -> Self {
        self.n_state = Some(n);
        self
    }

    /// # Overview
    ///
    /// Builds and validates the Config.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            n_class:   self.n_class.ok_or(Error::MissingClasses)?,
            n_feature: self.n_feature.ok_or(Error::MissingFeatures)?,
            n_clause:  self.n_clause.ok_or(Error::MissingClauses)?,
            n_state:   self.n_state.unwrap_or(200)
        };
        config.validate()?;
        Ok(config)
    }
}

/// # Overview
///
/// Hyper-parameters of one training step: vote clamp `T` and sensitivity
/// `s`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct TrainConfig {
    pub threshold: u32,
    pub s:         f32
}

impl TrainConfig {
    /// # Overview
    ///
    /// Creates a new TrainConfigBuilder.
    #[inline]
    pub fn builder() -> TrainConfigBuilder {
        TrainConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates `1 <= T <= i32::MAX` and `s > 1`.
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 || self.threshold > i32::MAX as u32 {
            return Err(Error::InvalidThreshold);
        }
        if self.s.is_nan() || self.s <= 1.0 {
            return Err(Error::InvalidSpecificity);
        }
        Ok(())
    }

    /// # Overview
    ///
    /// Probability of rewarding a literal: `(s-1)/s`.
    #[inline]
    #[must_use]
    pub fn prob_increase(&self) -> f32 {
        (self.s - 1.0) / self.s
    }

    /// # Overview
    ///
    /// Probability of punishing a literal: `1/s`.
    #[inline]
    #[must_use]
    pub fn prob_decrease(&self) -> f32 {
        1.0 / self.s
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            threshold: 10,
            s:         7.5
        }
    }
}

/// # Overview
///
/// Builder for TrainConfig with validation.
#[derive(Debug, Default)]
pub struct TrainConfigBuilder {
    threshold: Option<u32>,
    s:         Option<f32>
}

impl TrainConfigBuilder {
    /// # Overview
    ///
    /// Sets the vote clamp `T` (default: 10).
    pub fn threshold(mut self, t: u32) -> Self {
        self.threshold = Some(t);
        self
    }

    /// # Overview
    ///
    /// Sets sensitivity `s` (default: 7.5).
    pub fn specificity(mut self, s: f32) -> Self {
        self.s = Some(s);
        self
    }

    /// # Overview
    ///
    /// Builds and validates the TrainConfig.
    pub fn build(self) -> Result<TrainConfig> {
        let defaults = TrainConfig::default();
        let config = TrainConfig {
            threshold: self.threshold.unwrap_or(defaults.threshold),
            s:         self.s.unwrap_or(defaults.s)
        };
        config.validate()?;
        Ok(config)
    }
}

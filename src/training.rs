//! Epoch driver over [`Model::step`]: shuffling, plateau detection and
//! per-epoch reporting.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::{
    Model, TrainConfig,
    error::{Error, Result},
    utils::{rng_from_seed, shuffle}
};

/// Called after every epoch with `(epoch, train accuracy)`; returning
/// `false` ends training.
pub type ProgressCallback = Box<dyn FnMut(usize, f32) -> bool + Send>;

/// # Overview
///
/// Options for [`Model::fit_with_options`].
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::FitOptions;
///
/// let opts = FitOptions::new(10, 42)
///     .with_early_stop(3, 0.005)
///     .with_callback(|epoch, acc| {
///         println!("epoch {epoch}: {:.1}%", acc * 100.0);
///         acc < 0.99
///     });
/// assert_eq!(opts.epochs, 10);
/// ```
pub struct FitOptions {
    pub epochs:     usize,
    pub seed:       u64,
    pub early_stop: Option<EarlyStop>,
    pub shuffle:    bool,
    pub callback:   Option<ProgressCallback>
}

impl FitOptions {
    #[must_use]
    pub fn new(epochs: usize, seed: u64) -> Self {
        Self {
            epochs,
            seed,
            early_stop: None,
            shuffle: true,
            callback: None
        }
    }

    /// Stops once accuracy has not improved by more than `min_delta` for
    /// `patience` consecutive epochs.
    #[must_use]
    pub fn with_early_stop(mut self, patience: usize, min_delta: f32) -> Self {
        self.early_stop = Some(EarlyStop {
            patience,
            min_delta
        });
        self
    }

    /// Presents examples in dataset order every epoch.
    #[must_use]
    pub fn no_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize, f32) -> bool + Send + 'static
    {
        self.callback = Some(Box::new(callback));
        self
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::new(10, 42)
    }
}

impl core::fmt::Debug for FitOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FitOptions")
            .field("epochs", &self.epochs)
            .field("seed", &self.seed)
            .field("early_stop", &self.early_stop)
            .field("shuffle", &self.shuffle)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// # Overview
///
/// Plateau criterion for early stopping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyStop {
    pub patience:  usize,
    pub min_delta: f32
}

/// Best accuracy seen so far and the epochs spent without beating it.
#[derive(Debug)]
struct Plateau {
    rule:    EarlyStop,
    best:    Option<f32>,
    stalled: usize
}

impl Plateau {
    fn new(rule: EarlyStop) -> Self {
        Self {
            rule,
            best: None,
            stalled: 0
        }
    }

    /// Returns `true` once training should stop.
    fn observe(&mut self, accuracy: f32) -> bool {
        match self.best {
            Some(best) if accuracy <= best + self.rule.min_delta => {
                self.stalled += 1;
                self.stalled >= self.rule.patience
            }
            _ => {
                self.best = Some(accuracy);
                self.stalled = 0;
                false
            }
        }
    }
}

/// # Overview
///
/// Outcome of a training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitResult {
    pub epochs_run:     usize,
    /// Training accuracy after the last epoch run.
    pub final_accuracy: f32,
    /// Set when the callback or the plateau criterion ended the run.
    pub stopped_early:  bool,
    /// Steps that could not reserve their scratch buffers.
    pub skipped:        usize,
    pub history:        Vec<f32>
}

impl FitResult {
    fn record_epoch(&mut self, accuracy: f32) {
        self.epochs_run += 1;
        self.final_accuracy = accuracy;
        self.history.push(accuracy);
    }
}

impl Model {
    /// # Overview
    ///
    /// Rejects a dataset the step loop could not consume.
    fn check_dataset(&self, x: &[Vec<u8>], y: &[usize]) -> Result<()> {
        if x.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got:      y.len()
            });
        }
        let n_feature = self.config().n_feature;
        if let Some(xi) = x.iter().find(|xi| xi.len() < n_feature) {
            return Err(Error::DimensionMismatch {
                expected: n_feature,
                got:      xi.len()
            });
        }
        let n_class = self.n_class();
        match y.iter().find(|&&class| class >= n_class) {
            Some(&class) => Err(Error::ClassOutOfRange {
                class,
                n_class
            }),
            None => Ok(())
        }
    }

    /// # Overview
    ///
    /// Trains for `epochs` passes over shuffled data with a seeded
    /// generator.
    ///
    /// # Errors
    ///
    /// As [`fit_with_options`](Self::fit_with_options).
    pub fn fit(
        &mut self,
        x: &[Vec<u8>],
        y: &[usize],
        params: &TrainConfig,
        epochs: usize,
        seed: u64
    ) -> Result<FitResult> {
        self.fit_with_options(x, y, params, FitOptions::new(epochs, seed))
    }

    /// # Overview
    ///
    /// Runs training epochs until `opts.epochs` is reached, the callback
    /// declines, or accuracy plateaus.
    ///
    /// A step that fails with [`Error::AllocationFailed`] leaves the model
    /// untouched; the example is skipped and counted in
    /// [`FitResult::skipped`].
    ///
    /// # Errors
    ///
    /// Invalid `params`, an empty or mismatched dataset, inputs narrower
    /// than `n_feature` or labels `>= n_class`. All are checked before the
    /// first step.
    pub fn fit_with_options(
        &mut self,
        x: &[Vec<u8>],
        y: &[usize],
        params: &TrainConfig,
        mut opts: FitOptions
    ) -> Result<FitResult> {
        params.validate()?;
        self.check_dataset(x, y)?;

        let mut rng = rng_from_seed(opts.seed);
        let mut order: Vec<usize> = (0..x.len()).collect();
        let mut plateau = opts.early_stop.map(Plateau::new);
        let mut result = FitResult {
            history: Vec::with_capacity(opts.epochs),
            ..FitResult::default()
        };

        while result.epochs_run < opts.epochs {
            if opts.shuffle {
                shuffle(&mut order, &mut rng);
            }
            for &i in &order {
                match self.step(&x[i], y[i], params, &mut rng) {
                    Ok(()) => {}
                    Err(Error::AllocationFailed) => {
                        tracing::warn!(example = i, "step skipped: allocation failed");
                        result.skipped += 1;
                    }
                    Err(e) => return Err(e)
                }
            }

            let accuracy = self.accuracy(x, y);
            result.record_epoch(accuracy);
            tracing::debug!(epoch = result.epochs_run, accuracy, "epoch finished");

            if let Some(callback) = opts.callback.as_mut()
                && !callback(result.epochs_run, accuracy)
            {
                result.stopped_early = true;
                break;
            }
            if let Some(p) = plateau.as_mut()
                && p.observe(accuracy)
            {
                tracing::info!(epoch = result.epochs_run, accuracy, "accuracy plateaued");
                result.stopped_early = true;
                break;
            }
        }

        if result.epochs_run == 0 {
            result.final_accuracy = self.accuracy(x, y);
        }
        Ok(result)
    }
}

//! # Tsetlin Machine for microcontrollers
//!
//! Multi-class Tsetlin Machine with compressed clauses, built to train and
//! infer on-device.
//!
//! Each clause stores only the literals it may ever include, as a positive
//! block followed by a negative block of `(position, automaton)` pairs.
//! Clauses come in (positive, negative) pairs per class; a class votes with
//! the number of firing positive clauses minus the number of firing
//! negative ones.
//!
//! # Features
//!
//! - `std` (default): Standard library support, IDX dataset reader
//! - `parallel`: Batch inference via rayon
//! - `serde`: Model records and configuration serialization
//!
//! # Examples
//!
//! ```
//! use tsetlin_mcu::{Config, Model, TrainConfig};
//!
//! let config = Config::builder()
//!     .classes(2)
//!     .features(2)
//!     .clauses(10)
//!     .states(100)
//!     .build()
//!     .unwrap();
//! let mut model = Model::dense(config).unwrap();
//!
//! let x = vec![vec![0, 1], vec![1, 0], vec![0, 1], vec![1, 0]];
//! let y = vec![1, 0, 1, 0];
//!
//! let params = TrainConfig::default();
//! model.fit(&x, &y, &params, 20, 42).unwrap();
//! assert!(model.predict(&x[0]) < 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod automaton;
mod clause;
mod config;
mod encoding;
pub mod error;
pub mod feedback;
mod inference;
mod model;
mod rule;
mod step;
mod training;
pub mod utils;

#[cfg(feature = "std")]
pub mod idx;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use automaton::{Automaton, include_threshold};
pub use clause::{Clause, Literal, Polarity};
pub use config::{Config, ConfigBuilder, TrainConfig, TrainConfigBuilder};
pub use encoding::{BitWidth, Quantizer, norm_cdf, quantize_unit, threshold_encode, write_bits};
pub use error::{Error, Result};
pub use inference::{Prediction, argmax};
pub use model::{ClauseRecord, Model, ModelRecord};
pub use rule::Rule;
pub use step::{clamp_vote, sample_other_class};
pub use training::{EarlyStop, FitOptions, FitResult, ProgressCallback};
pub use utils::{FastRng, RandomSource};

//! Error types for the Tsetlin Machine engine.

use core::fmt;

/// # Overview
///
/// Errors raised while configuring, loading, training or feeding a model.
///
/// Hot-path operations (clause evaluation, feedback) never return errors;
/// everything here is detected at a boundary: configuration, model load,
/// the start of a training step, or the dataset/encoding collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingClasses,
    MissingClauses,
    MissingFeatures,
    OddClauses,
    TooFewClasses { got: usize },
    InvalidStates { got: u32 },
    InvalidSpecificity,
    InvalidThreshold,
    EmptyDataset,
    DimensionMismatch { expected: usize, got: usize },
    ClauseCountMismatch { expected: usize, got: usize },
    LiteralCountMismatch { clause: usize, positions: usize, states: usize },
    PositionOutOfRange { clause: usize, position: u32, n_feature: usize },
    StateOutOfRange { clause: usize, state: u32, n_state: u16 },
    ClassOutOfRange { class: usize, n_class: usize },
    AllocationFailed,
    InvalidBitWidth(u8),
    InvalidNormalization,
    ValueOutOfRange,
    InvalidMagic { expected: u32, got: u32 },
    Truncated { expected: usize, got: usize },
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingClasses => write!(f, "n_class is required"),
            Self::MissingClauses => write!(f, "n_clause is required"),
            Self::MissingFeatures => write!(f, "n_feature is required"),
            Self::OddClauses => write!(f, "n_clause must be even"),
            Self::TooFewClasses {
                got
            } => write!(f, "at least 2 classes are required, got {got}"),
            Self::InvalidStates {
                got
            } => write!(f, "n_state must be even and in [2, 65534], got {got}"),
            Self::InvalidSpecificity => write!(f, "s must be > 1.0"),
            Self::InvalidThreshold => write!(f, "threshold T must be in [1, i32::MAX]"),
            Self::EmptyDataset => write!(f, "dataset cannot be empty"),
            Self::DimensionMismatch {
                expected,
                got
            } => {
                write!(f, "dimension mismatch: expected {expected}, got {got}")
            }
            Self::ClauseCountMismatch {
                expected,
                got
            } => write!(f, "model must hold {expected} clauses, got {got}"),
            Self::LiteralCountMismatch {
                clause,
                positions,
                states
            } => write!(
                f,
                "clause {clause}: {positions} literal positions but {states} automaton states"
            ),
            Self::PositionOutOfRange {
                clause,
                position,
                n_feature
            } => write!(
                f,
                "clause {clause}: literal position {position} outside {n_feature} features"
            ),
            Self::StateOutOfRange {
                clause,
                state,
                n_state
            } => write!(f, "clause {clause}: state {state} outside [1, {n_state}]"),
            Self::ClassOutOfRange {
                class,
                n_class
            } => write!(f, "class {class} outside {n_class} classes"),
            Self::AllocationFailed => write!(f, "failed to allocate training buffers"),
            Self::InvalidBitWidth(bits) => {
                write!(f, "bit width must be 1, 2, 4 or 8, got {bits}")
            }
            Self::InvalidNormalization => write!(f, "std must be finite and > 0"),
            Self::ValueOutOfRange => write!(f, "value must lie in [0, 1]"),
            Self::InvalidMagic {
                expected,
                got
            } => write!(f, "invalid magic number: expected {expected:#010x}, got {got:#010x}"),
            Self::Truncated {
                expected,
                got
            } => write!(f, "truncated data: expected {expected} bytes, got {got}"),
            #[cfg(feature = "std")]
            Self::Io(kind) => write!(f, "I/O error: {kind}")
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// # Overview
///
/// Result type for Tsetlin Machine operations.
pub type Result<T> = core::result::Result<T, Error>;

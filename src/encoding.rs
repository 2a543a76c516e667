//! Literal encoding: raw scalar features to boolean literals.
//!
//! A clause's literal positions index the flattened output of this module,
//! so the bit width and bit order are part of a model's contract: a model
//! trained on 8-bit encodings is meaningless against 4-bit input.
//!
//! ```text
//! raw ──(x - mean) / std──► z ──Φ(z)──► u ∈ [0,1] ──round(u · (2^b - 1))──► level
//! level ──MSB first──► b literals
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::{Error, Result};

/// # Overview
///
/// Literals produced per raw feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BitWidth {
    One   = 1,
    Two   = 2,
    Four  = 4,
    Eight = 8
}

impl BitWidth {
    #[inline(always)]
    #[must_use]
    pub const fn bits(self) -> usize {
        self as usize
    }

    /// # Overview
    ///
    /// Highest quantization level, `2^b - 1`.
    #[inline(always)]
    #[must_use]
    pub const fn max_level(self) -> u8 {
        ((1u16 << self as u16) - 1) as u8
    }
}

impl TryFrom<u8> for BitWidth {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        match bits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(Error::InvalidBitWidth(other))
        }
    }
}

/// # Overview
///
/// Standard normal CDF, `0.5 * (1 + erf(z / sqrt(2)))`.
#[inline]
#[must_use]
pub fn norm_cdf(z: f32) -> f32 {
    0.5 * (1.0 + libm::erff(z / core::f32::consts::SQRT_2))
}

/// # Overview
///
/// Rounds `u ∈ [0, 1]` to the nearest of `2^b` levels, ties to even.
///
/// # Errors
///
/// [`Error::ValueOutOfRange`] for values outside `[0, 1]` (NaN included).
#[inline]
pub fn quantize_unit(u: f32, width: BitWidth) -> Result<u8> {
    if !(0.0..=1.0).contains(&u) {
        return Err(Error::ValueOutOfRange);
    }
    Ok(libm::rintf(u * f32::from(width.max_level())) as u8)
}

/// # Overview
///
/// Writes the `b` bits of `level`, most significant first, as 0/1 bytes.
#[inline]
pub fn write_bits(level: u8, width: BitWidth, out: &mut [u8]) {
    let b = width.bits();
    for (i, bit) in out[..b].iter_mut().enumerate() {
        *bit = (level >> (b - 1 - i)) & 1;
    }
}

/// # Overview
///
/// CDF-normalised multi-bit quantizer.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::{BitWidth, Quantizer};
///
/// let q = Quantizer::new(0.0, 1.0, BitWidth::Two).unwrap();
/// // raw = mean -> u = 0.5 -> round(1.5) = 2 (ties to even) -> [1, 0]
/// assert_eq!(q.encode(&[0]), vec![1, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    mean:  f32,
    std:   f32,
    width: BitWidth
}

impl Quantizer {
    /// Pixel statistics of the MNIST training set.
    pub const MNIST_MEAN: f32 = 33.318;
    pub const MNIST_STD: f32 = 78.567;

    /// # Overview
    ///
    /// Creates a quantizer for features with the given mean and std.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNormalization`] unless `std` is finite and positive
    /// and `mean` is finite.
    pub fn new(mean: f32, std: f32, width: BitWidth) -> Result<Self> {
        if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
            return Err(Error::InvalidNormalization);
        }
        Ok(Self {
            mean,
            std,
            width
        })
    }

    /// # Overview
    ///
    /// Quantizer with MNIST pixel statistics.
    #[must_use]
    pub const fn mnist(width: BitWidth) -> Self {
        Self {
            mean: Self::MNIST_MEAN,
            std: Self::MNIST_STD,
            width
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn width(&self) -> BitWidth {
        self.width
    }

    /// # Overview
    ///
    /// Length of the boolean vector for `n_raw` features.
    #[inline(always)]
    #[must_use]
    pub const fn encoded_len(&self, n_raw: usize) -> usize {
        n_raw * self.width.bits()
    }

    /// # Overview
    ///
    /// Maps a raw value into `[0, 1]` through the normal CDF.
    #[inline]
    #[must_use]
    pub fn normalize(&self, raw: f32) -> f32 {
        norm_cdf((raw - self.mean) / self.std)
    }

    /// # Overview
    ///
    /// Quantization level of a raw value.
    #[inline]
    #[must_use]
    pub fn level(&self, raw: f32) -> u8 {
        // erff may overshoot by an ulp at the tails
        let u = self.normalize(raw).clamp(0.0, 1.0);
        libm::rintf(u * f32::from(self.width.max_level())) as u8
    }

    /// # Overview
    ///
    /// Encodes raw features into a caller buffer of
    /// [`encoded_len`](Self::encoded_len) bytes.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] on a wrongly sized buffer.
    pub fn encode_into(&self, raw: &[u8], out: &mut [u8]) -> Result<()> {
        let expected = self.encoded_len(raw.len());
        if out.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: out.len()
            });
        }
        let b = self.width.bits();
        for (&value, chunk) in raw.iter().zip(out.chunks_exact_mut(b)) {
            write_bits(self.level(f32::from(value)), self.width, chunk);
        }
        Ok(())
    }

    /// # Overview
    ///
    /// Encodes raw features into a new boolean vector.
    #[must_use]
    pub fn encode(&self, raw: &[u8]) -> Vec<u8> {
        let mut out = vec![0; self.encoded_len(raw.len())];
        let b = self.width.bits();
        for (&value, chunk) in raw.iter().zip(out.chunks_exact_mut(b)) {
            write_bits(self.level(f32::from(value)), self.width, chunk);
        }
        out
    }
}

/// # Overview
///
/// Single-bit encoding by plain threshold: `raw > threshold` becomes 1.
#[must_use]
pub fn threshold_encode(raw: &[u8], threshold: u8) -> Vec<u8> {
    raw.iter().map(|&v| u8::from(v > threshold)).collect()
}

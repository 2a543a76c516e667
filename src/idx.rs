//! IDX dataset files (the MNIST image/label container).
//!
//! ```text
//! images: magic 0x00000803 | count | rows | cols | count*rows*cols bytes
//! labels: magic 0x00000801 | count | count bytes
//! ```
//!
//! All header fields are big-endian `u32`.

use std::{fs, path::Path};

use crate::error::{Error, Result};

/// Magic number of an `idx3-ubyte` image file.
pub const IMAGES_MAGIC: u32 = 0x0000_0803;
/// Magic number of an `idx1-ubyte` label file.
pub const LABELS_MAGIC: u32 = 0x0000_0801;

/// # Overview
///
/// A block of equally sized 8-bit images, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Images {
    rows:   usize,
    cols:   usize,
    pixels: Vec<u8>
}

impl Images {
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Pixels per image.
    #[inline]
    #[must_use]
    pub fn image_len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        if self.image_len() == 0 {
            0
        } else {
            self.pixels.len() / self.image_len()
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Overview
    ///
    /// Pixels of image `idx`, or `None` past the end.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&[u8]> {
        let n = self.image_len();
        self.pixels.get(idx * n..(idx + 1) * n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.pixels.chunks_exact(self.image_len().max(1))
    }
}

fn read_u32_be(bytes: &[u8], offset: usize) -> Result<u32> {
    let word = bytes.get(offset..offset + 4).ok_or(Error::Truncated {
        expected: offset + 4,
        got:      bytes.len()
    })?;
    Ok(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
}

fn check_magic(bytes: &[u8], expected: u32) -> Result<()> {
    let got = read_u32_be(bytes, 0)?;
    if got != expected {
        return Err(Error::InvalidMagic {
            expected,
            got
        });
    }
    Ok(())
}

/// # Overview
///
/// Parses an in-memory image file.
///
/// # Errors
///
/// [`Error::InvalidMagic`] or [`Error::Truncated`].
pub fn parse_images(bytes: &[u8]) -> Result<Images> {
    check_magic(bytes, IMAGES_MAGIC)?;
    let count = read_u32_be(bytes, 4)? as usize;
    let rows = read_u32_be(bytes, 8)? as usize;
    let cols = read_u32_be(bytes, 12)? as usize;

    let payload = &bytes[16..];
    let expected = count.saturating_mul(rows).saturating_mul(cols);
    if payload.len() < expected {
        return Err(Error::Truncated {
            expected: expected.saturating_add(16),
            got:      bytes.len()
        });
    }

    tracing::debug!(count, rows, cols, "parsed idx images");
    Ok(Images {
        rows,
        cols,
        pixels: payload[..expected].to_vec()
    })
}

/// # Overview
///
/// Parses an in-memory label file.
///
/// # Errors
///
/// [`Error::InvalidMagic`] or [`Error::Truncated`].
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    check_magic(bytes, LABELS_MAGIC)?;
    let count = read_u32_be(bytes, 4)? as usize;

    let payload = &bytes[8..];
    if payload.len() < count {
        return Err(Error::Truncated {
            expected: 8 + count,
            got:      bytes.len()
        });
    }

    tracing::debug!(count, "parsed idx labels");
    Ok(payload[..count].to_vec())
}

/// # Overview
///
/// Reads and parses an image file.
pub fn read_images(path: impl AsRef<Path>) -> Result<Images> {
    parse_images(&fs::read(path)?)
}

/// # Overview
///
/// Reads and parses a label file.
pub fn read_labels(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    parse_labels(&fs::read(path)?)
}

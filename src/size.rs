//! Target edge lengths for generated icons

use std::fmt;
use std::num::NonZeroU32;

use thiserror::Error;

/// Edge lengths produced when nothing else is configured
pub const DEFAULT_SIZES: [u32; 10] = [16, 24, 32, 48, 64, 96, 128, 256, 512, 1024];

/// Errors raised while building a size set
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("icon size must be a positive number of pixels, got {0}")]
    Zero(u32),

    #[error("icon size {0} is listed more than once")]
    Duplicate(u32),

    #[error("at least one icon size is required")]
    Empty,
}

/// A square edge length in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeSpec(NonZeroU32);

impl SizeSpec {
    /// Create a size, returning None for zero
    pub fn new(pixels: u32) -> Option<Self> {
        NonZeroU32::new(pixels).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// File name of the PNG produced for this size, e.g. `16x16.png`
    pub fn artifact_name(self) -> String {
        format!("{0}x{0}.png", self.get())
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SizeSpec {
    type Error = SizeError;

    fn try_from(pixels: u32) -> Result<Self, Self::Error> {
        Self::new(pixels).ok_or(SizeError::Zero(pixels))
    }
}

/// Ascending, duplicate-free list of sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeSet {
    sizes: Vec<SizeSpec>,
}

impl SizeSet {
    pub fn new(pixels: impl IntoIterator<Item = u32>) -> Result<Self, SizeError> {
        let mut sizes = pixels
            .into_iter()
            .map(SizeSpec::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if sizes.is_empty() {
            return Err(SizeError::Empty);
        }
        sizes.sort();
        if let Some(pair) = sizes.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SizeError::Duplicate(pair[0].get()));
        }
        Ok(Self { sizes })
    }

    pub fn iter(&self) -> impl Iterator<Item = SizeSpec> + '_ {
        self.sizes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl Default for SizeSet {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES
                .iter()
                .filter_map(|&pixels| SizeSpec::new(pixels))
                .collect(),
        }
    }
}

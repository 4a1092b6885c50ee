//! Value types shared by the calculator, the registry, and the asset model.
//!
//! - [`ImageDimensions`]: original pixel size of an image. Both sides > 0.
//! - [`Dimension`]: which side of an image is being asked for.
//! - [`TransformMode`] / [`TransformDescriptor`]: a named resize policy and
//!   its target box, as stored in `[transforms.<handle>]` config tables.
//! - [`DimensionError`]: every way a size computation can fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("Not applicable: {0}")]
    NotApplicable(String),
    #[error("Transform not found: {0}")]
    TransformNotFound(String),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Pixel size of an original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Build a size, rejecting zero on either side.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        if width == 0 || height == 0 {
            return Err(DimensionError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn get(self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Re-check the invariant on a value built with a struct literal.
    pub(crate) fn checked(self) -> Result<Self, DimensionError> {
        Self::new(self.width, self.height)
    }
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `4000x2000`.
impl FromStr for ImageDimensions {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DimensionError::NotApplicable(format!("expected WIDTHxHEIGHT, got '{s}'"));
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl FromStr for Dimension {
    type Err = DimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width" => Ok(Dimension::Width),
            "height" => Ok(Dimension::Height),
            other => Err(DimensionError::NotApplicable(format!(
                "'{other}' is not a dimension (expected width or height)"
            ))),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
        })
    }
}

/// How an original image is mapped into a transform's target box.
///
/// - `StretchToFit`: exactly the target box, aspect ratio ignored.
/// - `ScaleToFit`: shrink (never enlarge) to fit inside the box, aspect kept.
/// - `ScaleAndCrop`: shrink and crop to fill the box exactly; smaller
///   originals pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformMode {
    StretchToFit,
    ScaleToFit,
    ScaleAndCrop,
}

impl TransformMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformMode::StretchToFit => "stretchToFit",
            TransformMode::ScaleToFit => "scaleToFit",
            TransformMode::ScaleAndCrop => "scaleAndCrop",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resize policy plus its target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformDescriptor {
    pub mode: TransformMode,
    pub width: u32,
    pub height: u32,
}

impl TransformDescriptor {
    pub fn new(mode: TransformMode, width: u32, height: u32) -> Result<Self, DimensionError> {
        if width == 0 || height == 0 {
            return Err(DimensionError::InvalidDimensions { width, height });
        }
        Ok(Self {
            mode,
            width,
            height,
        })
    }

    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// True when `original` is larger than the target box on either side.
    pub fn is_exceeded_by(&self, original: ImageDimensions) -> bool {
        original.height > self.height || original.width > self.width
    }
}

//! Pure calculation functions for displayed image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Every rounding step goes through [`round_px`], which rounds half away
//! from zero (`62.5 → 63`).

use super::transform::{Dimension, DimensionError, ImageDimensions, TransformDescriptor, TransformMode};

/// Round a fractional pixel count to the nearest whole pixel, ties away from zero.
fn round_px(value: f64) -> u32 {
    value.round() as u32
}

/// Calculate one displayed dimension of an image, optionally through a transform.
///
/// # Arguments
/// * `original` - Original image dimensions (both sides > 0)
/// * `dimension` - Which side to return
/// * `transform` - Optional resize policy; `None` returns the original side
///
/// # Examples
/// ```
/// # use asset_dims::imaging::{compute_dimension, Dimension, ImageDimensions, TransformDescriptor, TransformMode};
/// let original = ImageDimensions::new(4000, 2000).unwrap();
/// let fit = TransformDescriptor::new(TransformMode::ScaleToFit, 1000, 1000).unwrap();
/// assert_eq!(compute_dimension(original, Dimension::Width, Some(&fit)), Ok(1000));
/// assert_eq!(compute_dimension(original, Dimension::Height, Some(&fit)), Ok(500));
/// ```
pub fn compute_dimension(
    original: ImageDimensions,
    dimension: Dimension,
    transform: Option<&TransformDescriptor>,
) -> Result<u32, DimensionError> {
    let original = original.checked()?;

    let Some(transform) = transform else {
        return Ok(original.get(dimension));
    };
    let transform = TransformDescriptor::new(transform.mode, transform.width, transform.height)?;

    let value = match transform.mode {
        TransformMode::StretchToFit => transform.get(dimension),
        TransformMode::ScaleToFit => {
            if transform.is_exceeded_by(original) {
                let factor = f64::max(
                    original.width as f64 / transform.width as f64,
                    original.height as f64 / transform.height as f64,
                );
                round_px(original.get(dimension) as f64 / factor)
            } else {
                original.get(dimension)
            }
        }
        TransformMode::ScaleAndCrop => {
            if transform.is_exceeded_by(original) {
                transform.get(dimension)
            } else {
                original.get(dimension)
            }
        }
    };

    Ok(value)
}

/// Calculate both displayed dimensions at once.
pub fn compute_size(
    original: ImageDimensions,
    transform: Option<&TransformDescriptor>,
) -> Result<ImageDimensions, DimensionError> {
    Ok(ImageDimensions {
        width: compute_dimension(original, Dimension::Width, transform)?,
        height: compute_dimension(original, Dimension::Height, transform)?,
    })
}

/// Calculate thumbnail dimensions that fit a bounding box, preserving aspect ratio.
///
/// The image is treated as horizontal when its height/width ratio is at most
/// the box's: the width then matches `max_width` and the height follows.
/// Otherwise the height matches `max_height`. The result never exceeds the box
/// on the matched side.
///
/// # Returns
/// * `(width, height)` - Final thumbnail dimensions
///
/// # Examples
/// ```
/// # use asset_dims::imaging::{calculate_thumb_dimensions, ImageDimensions};
/// // 2000x1000 into 125x125 → 125x63
/// let original = ImageDimensions::new(2000, 1000).unwrap();
/// assert_eq!(calculate_thumb_dimensions(125, 125, original), Ok((125, 63)));
/// ```
pub fn calculate_thumb_dimensions(
    max_width: u32,
    max_height: u32,
    original: ImageDimensions,
) -> Result<(u32, u32), DimensionError> {
    let original = original.checked()?;
    if max_width == 0 || max_height == 0 {
        return Err(DimensionError::InvalidDimensions {
            width: max_width,
            height: max_height,
        });
    }

    let (max_w, max_h) = (max_width as f64, max_height as f64);
    let (orig_w, orig_h) = (original.width as f64, original.height as f64);

    if orig_h / orig_w <= max_h / max_w {
        // Horizontal: width is the constraint
        Ok((max_width, round_px(max_w / orig_w * orig_h)))
    } else {
        // Vertical: height is the constraint
        Ok((round_px(max_h / orig_h * orig_w), max_height))
    }
}

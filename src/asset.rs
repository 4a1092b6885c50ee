//! Uploaded asset files and their derived sizes and URLs.
//!
//! An [`AssetFile`] is the record the CMS keeps for one uploaded file. Only
//! image assets have meaningful dimensions; every size query on any other
//! kind fails with [`DimensionError::NotApplicable`].
//!
//! ## URLs
//!
//! ```text
//! url:        {base_url}{folder_path}[_{handle}/]{filename}
//!             https://cdn.example.com/photos/_thumb/dawn.jpg
//! thumb_url:  {resource_base}assetthumbs/{id}/{width}x{height}
//!             /resources/assetthumbs/42/125x63
//! ```
//!
//! Where `base_url` and `folder_path` come from is the caller's business
//! (asset sources and folders are not modelled here).

use crate::imaging::{
    Dimension, DimensionError, ImageDimensions, TransformResolver, calculate_thumb_dimensions,
    compute_dimension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind name the CMS assigns to raster images.
pub const IMAGE_KIND: &str = "image";

/// Default thumbnail box edge, in pixels.
pub const DEFAULT_THUMB_SIZE: u32 = 125;

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFile {
    pub id: u64,
    #[serde(default)]
    pub source_id: Option<u64>,
    #[serde(default)]
    pub folder_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<u64>,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    /// File kind as classified on upload (`image`, `pdf`, `video`, ...).
    pub kind: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

/// Thumbnail rendering info for an image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbData {
    pub url: String,
    /// Same thumbnail at double density.
    #[serde(rename = "url2x")]
    pub url_2x: String,
    pub width: u32,
    pub height: u32,
}

impl AssetFile {
    /// Create an image asset with the given original dimensions.
    pub fn image(id: u64, filename: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            source_id: None,
            folder_id: None,
            content_id: None,
            filename: filename.into(),
            original_name: None,
            kind: IMAGE_KIND.to_string(),
            width,
            height,
            size: 0,
            date_modified: None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == IMAGE_KIND
    }

    /// File extension without the dot, or `""` when the filename has none.
    pub fn extension(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext,
            _ => "",
        }
    }

    /// Original dimensions, validated. Fails for non-images and zero sizes.
    pub fn original_dimensions(&self) -> Result<ImageDimensions, DimensionError> {
        self.ensure_image()?;
        ImageDimensions::new(self.width, self.height)
    }

    /// Displayed width, optionally through the transform named `handle`.
    pub fn width(
        &self,
        handle: Option<&str>,
        resolver: &impl TransformResolver,
    ) -> Result<u32, DimensionError> {
        self.dimension(Dimension::Width, handle, resolver)
    }

    /// Displayed height, optionally through the transform named `handle`.
    pub fn height(
        &self,
        handle: Option<&str>,
        resolver: &impl TransformResolver,
    ) -> Result<u32, DimensionError> {
        self.dimension(Dimension::Height, handle, resolver)
    }

    /// Displayed size of one side. An empty handle means no transform.
    pub fn dimension(
        &self,
        dimension: Dimension,
        handle: Option<&str>,
        resolver: &impl TransformResolver,
    ) -> Result<u32, DimensionError> {
        let original = self.original_dimensions()?;
        match handle.filter(|h| !h.is_empty()) {
            None => compute_dimension(original, dimension, None),
            Some(handle) => {
                let transform = resolver.resolve(handle)?;
                compute_dimension(original, dimension, Some(&transform))
            }
        }
    }

    /// Public URL of the file, or of its transformed variant when `handle` is set.
    pub fn url(&self, base_url: &str, folder_path: &str, handle: Option<&str>) -> String {
        let variant = match handle.filter(|h| !h.is_empty()) {
            Some(handle) => format!("_{handle}/"),
            None => String::new(),
        };
        format!("{base_url}{folder_path}{variant}{}", self.filename)
    }

    /// URL of the thumbnail resource at an exact size.
    pub fn thumb_url(&self, resource_base: &str, width: u32, height: u32) -> String {
        format!("{resource_base}assetthumbs/{}/{width}x{height}", self.id)
    }

    /// Thumbnail size and URLs for a `max_width` x `max_height` box.
    ///
    /// Fails with `InvalidDimensions` when the double-density size does not
    /// fit in a `u32`.
    pub fn thumb_data(
        &self,
        max_width: u32,
        max_height: u32,
        resource_base: &str,
    ) -> Result<ThumbData, DimensionError> {
        let original = self.original_dimensions()?;
        let (width, height) = calculate_thumb_dimensions(max_width, max_height, original)?;
        let (width_2x, height_2x) = width
            .checked_mul(2)
            .zip(height.checked_mul(2))
            .ok_or(DimensionError::InvalidDimensions { width, height })?;

        Ok(ThumbData {
            url: self.thumb_url(resource_base, width, height),
            url_2x: self.thumb_url(resource_base, width_2x, height_2x),
            width,
            height,
        })
    }

    fn ensure_image(&self) -> Result<(), DimensionError> {
        if self.is_image() {
            Ok(())
        } else {
            Err(DimensionError::NotApplicable(format!(
                "{} is a {} asset, not an image",
                self.filename, self.kind
            )))
        }
    }
}

/// Renders the filename.
impl fmt::Display for AssetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename)
    }
}

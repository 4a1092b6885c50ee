//! Bulk evaluation of an asset list.
//!
//! Reads a JSON array of [`AssetFile`] records and computes, for each one,
//! its displayed size (optionally through a transform) and its thumbnail
//! data. Assets are evaluated in parallel using
//! [rayon](https://docs.rs/rayon); results keep the input order.
//!
//! A failing asset (a PDF, a zero-sized image, an unknown handle) produces an
//! error entry for that asset only. The batch itself fails only when the
//! input cannot be read or parsed.

use crate::asset::{AssetFile, ThumbData};
use crate::config::SiteConfig;
use crate::imaging::{DimensionError, ImageDimensions, TransformResolver};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sizes computed for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    pub size: ImageDimensions,
    pub thumb: ThumbData,
}

/// Outcome for one input asset.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub asset: AssetFile,
    pub result: Result<AssetReport, DimensionError>,
}

/// Read a JSON asset list from disk.
pub fn load_assets(path: &Path) -> Result<Vec<AssetFile>, BatchError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Evaluate one asset against the config's thumbnail box and URL prefix.
pub fn evaluate(
    asset: &AssetFile,
    handle: Option<&str>,
    config: &SiteConfig,
    resolver: &impl TransformResolver,
) -> Result<AssetReport, DimensionError> {
    let size = ImageDimensions {
        width: asset.width(handle, resolver)?,
        height: asset.height(handle, resolver)?,
    };
    let thumb = asset.thumb_data(
        config.thumbnails.max_width,
        config.thumbnails.max_height,
        &config.urls.resource_base,
    )?;
    Ok(AssetReport { size, thumb })
}

/// Evaluate every asset in parallel, preserving input order.
pub fn run(
    assets: Vec<AssetFile>,
    handle: Option<&str>,
    config: &SiteConfig,
    resolver: &impl TransformResolver,
) -> Vec<BatchEntry> {
    assets
        .into_par_iter()
        .map(|asset| {
            let result = evaluate(&asset, handle, config, resolver);
            if let Err(e) = &result {
                tracing::debug!(asset = %asset, error = %e, "asset skipped");
            }
            BatchEntry { asset, result }
        })
        .collect()
}

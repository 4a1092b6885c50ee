//! # asset-dims
//!
//! Displayed-size math for media assets managed by a CMS: what size an
//! uploaded image ends up at once a named transform is applied, and what box
//! its thumbnail gets.
//!
//! # Architecture
//!
//! ```text
//! config.toml ──► SiteConfig ──► TransformRegistry ─┐
//!                                                   ▼
//!                 AssetFile ──────────────► compute_dimension ──► width / height
//!                     └──────────────────► calculate_thumb_dimensions ──► ThumbData
//! ```
//!
//! The calculations are pure functions over value types. Transform
//! definitions are looked up through the [`imaging::TransformResolver`]
//! trait, which callers pass in explicitly: there is no global registry.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Value types, dimension/thumbnail calculations, transform lookup |
//! | [`asset`] | The uploaded-file record: kind checks, extension, URLs, thumbnail data |
//! | [`config`] | `config.toml` loading, environment overrides, validation |
//! | [`paths`] | Bootstrap folder resolution and validation |
//! | [`logging`] | `tracing` subscriber setup with a reloadable filter |
//! | [`batch`] | Parallel evaluation of a JSON asset list |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Failures
//!
//! Every size query returns `Result<_, DimensionError>`. "Not an image",
//! "no such transform", and "zero-sized original" are distinct variants, so
//! a caller can tell a missing transform apart from a request that never
//! asked for one, and no division ever sees a zero.
//!
//! ## Rounding
//!
//! Fractional pixel counts are rounded half away from zero (`f64::round`),
//! the same way in every branch: `62.5 → 63`.
//!
//! ## Never Enlarge
//!
//! `scaleToFit` and `scaleAndCrop` only ever shrink. An original that already
//! fits the transform box is reported at its own size. `stretchToFit` is the
//! one mode that always reports the box.

pub mod asset;
pub mod batch;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod paths;

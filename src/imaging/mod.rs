//! Image size math. Pure Rust, no pixel work.
//!
//! | Operation | Function |
//! |---|---|
//! | **Displayed side** | [`compute_dimension`] |
//! | **Displayed size** | [`compute_size`] |
//! | **Thumbnail box** | [`calculate_thumb_dimensions`] |
//! | **Transform lookup** | [`TransformResolver`] / [`TransformRegistry`] |
//!
//! The module is split into:
//! - **Transform**: value types and [`DimensionError`]
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Resolver**: handle → [`TransformDescriptor`] lookup behind a trait

mod calculations;
pub mod resolver;
mod transform;

pub use calculations::{calculate_thumb_dimensions, compute_dimension, compute_size};
pub use resolver::{TransformRegistry, TransformResolver};
pub use transform::{
    Dimension, DimensionError, ImageDimensions, TransformDescriptor, TransformMode,
};

//! Utility modules shared across the engine
//!
//! - Interpolation: piecewise-linear mapping and display rounding

pub mod interpolation;

pub use interpolation::{lerp, round_to};

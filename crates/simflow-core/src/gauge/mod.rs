//! Liquid-fill gauge model.
//!
//! Everything here is terminal-agnostic: a percentage goes in, a readout and
//! a per-cell classification of a circular gauge come out. The TUI paints the
//! raster and layers the sheen animation on top.

mod model;
mod raster;

pub use model::{clamp_percentage, GaugeModel, TextTone, CAPTION, ROUNDED_TOP_THRESHOLD};
pub use raster::{GaugeCell, GaugeRaster};

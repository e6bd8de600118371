use super::raster::{GaugeCell, GaugeRaster};

/// Above this percentage the fill is drawn with a rounded top
pub const ROUNDED_TOP_THRESHOLD: f64 = 90.0;
/// Above this percentage the readout sits on the fill and uses light text
const LIGHT_TEXT_THRESHOLD: f64 = 50.0;
/// Caption shown under the readout
pub const CAPTION: &str = "remaining";

/// Clamp any percentage into `[0, 100]`. Non-finite values (a zero quota
/// yields `NaN` or `inf`) become 0.
pub fn clamp_percentage(percentage: f64) -> f64 {
    if !percentage.is_finite() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Text color variant for the readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    /// Drawn over the fill
    Light,
    /// Drawn over the background
    Dark,
}

/// Visual model of the gauge for one percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeModel {
    percentage: f64,
}

impl GaugeModel {
    /// Build the model; the percentage is clamped first
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage: clamp_percentage(percentage),
        }
    }

    /// Clamped percentage
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Fill height as a fraction of the gauge, in `[0, 1]`
    pub fn fill_fraction(&self) -> f64 {
        self.percentage / 100.0
    }

    /// Whether the fill top is rounded instead of flat
    pub fn rounded_top(&self) -> bool {
        self.percentage > ROUNDED_TOP_THRESHOLD
    }

    /// Readout text color
    pub fn text_tone(&self) -> TextTone {
        if self.percentage > LIGHT_TEXT_THRESHOLD {
            TextTone::Light
        } else {
            TextTone::Dark
        }
    }

    /// Percentage rounded half away from zero, e.g. `"70%"`
    pub fn readout(&self) -> String {
        format!("{}%", self.percentage.round() as u8)
    }

    /// Fixed caption under the readout
    pub fn caption(&self) -> &'static str {
        CAPTION
    }

    /// Classify every cell of a `width` x `height` grid.
    ///
    /// Cells are sampled at their centers in a unit square (x in `[-1, 1]`,
    /// y in `[0, 1]` growing upwards). The container is the inscribed ellipse,
    /// which is a circle once the caller doubles the width for terminal cell
    /// aspect. The fill box spans the full width up to `fill_fraction`; with a
    /// rounded top it is the ellipse inscribed in that box, otherwise only its
    /// bottom half is rounded.
    pub fn rasterize(&self, width: u16, height: u16) -> GaugeRaster {
        let fill = self.fill_fraction();
        let rounded_top = self.rounded_top();
        let mut cells = Vec::with_capacity(width as usize * height as usize);

        for row in 0..height {
            let y = 1.0 - (f64::from(row) + 0.5) / f64::from(height);
            for col in 0..width {
                let x = (f64::from(col) + 0.5) / f64::from(width) * 2.0 - 1.0;

                let cell = if !in_container(x, y) {
                    GaugeCell::Outside
                } else if in_fill(x, y, fill, rounded_top) {
                    GaugeCell::Fill
                } else {
                    GaugeCell::Background
                };
                cells.push(cell);
            }
        }

        GaugeRaster::new(width, height, cells)
    }
}

fn in_container(x: f64, y: f64) -> bool {
    let dy = 2.0 * y - 1.0;
    x * x + dy * dy <= 1.0
}

fn in_fill(x: f64, y: f64, fill: f64, rounded_top: bool) -> bool {
    if fill <= 0.0 || y > fill {
        return false;
    }
    let half = fill / 2.0;
    let dy = (y - half) / half;
    let in_ellipse = x * x + dy * dy <= 1.0;

    if rounded_top {
        in_ellipse
    } else {
        y >= half || in_ellipse
    }
}

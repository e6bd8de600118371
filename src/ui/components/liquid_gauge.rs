//! Circular liquid-fill gauge.
//!
//! Cell classification comes from [`GaugeModel::rasterize`]; this widget only
//! maps cells to colors, draws the surface sheen and centers the readout.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use simflow_core::gauge::{GaugeCell, GaugeModel, TextTone};

/// Readout color over the fill
const LIGHT_TEXT: Color = Color::White;
/// Caption color over the fill
const LIGHT_CAPTION: Color = Color::Rgb(0xe2, 0xe8, 0xf0);
/// Readout color over the background
const DARK_TEXT: Color = Color::Rgb(0x37, 0x41, 0x51);
/// Caption color over the background
const DARK_CAPTION: Color = Color::Rgb(0x6b, 0x72, 0x80);
/// Sheen glyphs cycled along the liquid surface
const SHEEN_GLYPHS: [char; 4] = ['~', '≈', '~', ' '];

/// Liquid-fill gauge widget
pub struct LiquidGauge {
    model: GaugeModel,
    size: u16,
    fill_color: Color,
    background_color: Color,
    sheen_frame: usize,
}

impl LiquidGauge {
    /// Gauge for `percentage`; out-of-range values are clamped
    pub fn new(percentage: f64) -> Self {
        Self {
            model: GaugeModel::new(percentage),
            size: 12,
            fill_color: Color::Rgb(0x3b, 0x82, 0xf6),
            background_color: Color::Rgb(0xf1, 0xf5, 0xf9),
            sheen_frame: 0,
        }
    }

    /// Diameter in rows (the gauge is twice as many columns wide)
    pub fn size(mut self, size: u16) -> Self {
        self.size = size;
        self
    }

    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Animation step for the surface sheen
    pub fn sheen_frame(mut self, frame: usize) -> Self {
        self.sheen_frame = frame;
        self
    }

    /// Gauge rectangle centered in `area`
    fn gauge_rect(&self, area: Rect) -> Rect {
        let rows = self.size.min(area.height).min(area.width / 2);
        let cols = rows * 2;
        Rect {
            x: area.x + (area.width - cols) / 2,
            y: area.y + (area.height - rows) / 2,
            width: cols,
            height: rows,
        }
    }

    fn text_colors(&self) -> (Color, Color) {
        match self.model.text_tone() {
            TextTone::Light => (LIGHT_TEXT, LIGHT_CAPTION),
            TextTone::Dark => (DARK_TEXT, DARK_CAPTION),
        }
    }

    /// Write `text` centered on `row`, keeping the cell backgrounds
    fn put_centered(buf: &mut Buffer, rect: Rect, row: u16, text: &str, fg: Color, bold: bool) {
        let width = text.width() as u16;
        if row >= rect.y + rect.height || width > rect.width {
            return;
        }
        let mut x = rect.x + (rect.width - width) / 2;
        for ch in text.chars() {
            if let Some(cell) = buf.cell_mut((x, row)) {
                cell.set_char(ch).set_fg(fg);
                if bold {
                    cell.modifier.insert(Modifier::BOLD);
                }
            }
            x += 1;
        }
    }
}

impl Widget for LiquidGauge {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let rect = self.gauge_rect(area);
        if rect.height >= 2 {
            let raster = self.model.rasterize(rect.width, rect.height);
            let surface = raster.surface_row();

            for (col, row, kind) in raster.iter() {
                let color = match kind {
                    GaugeCell::Outside => continue,
                    GaugeCell::Background => self.background_color,
                    GaugeCell::Fill => self.fill_color,
                };
                let Some(cell) = buf.cell_mut((rect.x + col, rect.y + row)) else {
                    continue;
                };
                cell.set_char(' ').set_bg(color);

                if kind == GaugeCell::Fill && surface == Some(row) {
                    let glyph = SHEEN_GLYPHS[(col as usize + self.sheen_frame) % SHEEN_GLYPHS.len()];
                    cell.set_char(glyph).set_fg(LIGHT_CAPTION);
                }
            }
        }

        // Readout on the middle row, caption below it
        let (text_fg, caption_fg) = self.text_colors();
        let text_rect = if rect.height >= 2 { rect } else { area };
        let middle = text_rect.y + text_rect.height.saturating_sub(1) / 2;
        Self::put_centered(buf, text_rect, middle, &self.model.readout(), text_fg, true);
        Self::put_centered(
            buf,
            text_rect,
            middle + 1,
            self.model.caption(),
            caption_fg,
            false,
        );
    }
}

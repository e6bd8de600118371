/// Classification of one gauge cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeCell {
    /// Outside the circular container
    Outside,
    /// Inside the container, above the fill
    Background,
    /// Part of the liquid fill
    Fill,
}

/// Row-major grid of [`GaugeCell`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeRaster {
    width: u16,
    height: u16,
    cells: Vec<GaugeCell>,
}

impl GaugeRaster {
    pub(crate) fn new(width: u16, height: u16, cells: Vec<GaugeCell>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `col`, `row` (row 0 is the top)
    pub fn get(&self, col: u16, row: u16) -> Option<GaugeCell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: GaugeCell) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }

    /// Topmost row that contains fill, i.e. the liquid surface
    pub fn surface_row(&self) -> Option<u16> {
        (0..self.height).find(|&row| {
            (0..self.width).any(|col| self.get(col, row) == Some(GaugeCell::Fill))
        })
    }

    /// Iterate `(col, row, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, GaugeCell)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let col = (i % width as usize) as u16;
            let row = (i / width as usize) as u16;
            (col, row, *cell)
        })
    }
}

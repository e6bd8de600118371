use ratatui::layout::{Constraint, Direction, Rect};

/// Height of the card entry box
const INPUT_HEIGHT: u16 = 3;
/// Height of the error box
const ERROR_HEIGHT: u16 = 3;
/// Minimum width of the details panel next to the gauge
const MIN_DETAILS_WIDTH: u16 = 30;

/// Layout configuration for the UI
pub struct Layout {
    /// Gauge diameter in rows
    pub gauge_size: u16,
    /// Height for input area
    pub input_height: u16,
}

/// Which optional regions are on screen
#[derive(Debug, Clone, Copy, Default)]
pub struct Visibility {
    /// Entry form shown
    pub input: bool,
    /// Error box shown
    pub error: bool,
    /// Record loaded: split the body into gauge and details
    pub record: bool,
}

impl Layout {
    /// Create a new layout for a gauge of `gauge_size` rows
    pub fn new(gauge_size: u16) -> Self {
        Self {
            gauge_size,
            input_height: INPUT_HEIGHT,
        }
    }

    /// Columns the gauge panel needs: doubled diameter plus borders
    fn gauge_panel_width(&self) -> u16 {
        self.gauge_size * 2 + 2
    }

    /// Calculate the main areas
    /// Layout: [            Header             ]
    ///         [ Gauge ][      Details         ]   (body)
    ///         [            Input              ]   (optional)
    ///         [            Error              ]   (optional)
    ///         [          Status Bar           ]
    pub fn calculate(&self, area: Rect, visibility: Visibility) -> LayoutAreas {
        let input_height = if visibility.input {
            self.input_height
        } else {
            0
        };
        let error_height = if visibility.error { ERROR_HEIGHT } else { 0 };

        let rows = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Header
                Constraint::Min(3),               // Body
                Constraint::Length(input_height), // Input
                Constraint::Length(error_height), // Error
                Constraint::Length(1),            // Status bar
            ])
            .split(area);

        let body = rows[1];
        let (gauge, details, placeholder) = if visibility.record {
            let gauge_width = self.gauge_panel_width();
            if body.width >= gauge_width + MIN_DETAILS_WIDTH {
                let columns = ratatui::layout::Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(gauge_width), Constraint::Min(MIN_DETAILS_WIDTH)])
                    .split(body);
                (Some(columns[0]), Some(columns[1]), None)
            } else {
                // Too narrow for both: details only
                (None, Some(body), None)
            }
        } else {
            (None, None, Some(body))
        };

        LayoutAreas {
            header: rows[0],
            gauge,
            details,
            placeholder,
            input: visibility.input.then_some(rows[2]),
            error: visibility.error.then_some(rows[3]),
            status_bar: rows[4],
        }
    }

    /// Calculate areas for a popup (centered)
    pub fn popup_area(&self, area: Rect, width_pct: u16, height_pct: u16) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - height_pct) / 2),
                Constraint::Percentage(height_pct),
                Constraint::Percentage((100 - height_pct) / 2),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(12)
    }
}

/// Calculated layout areas
pub struct LayoutAreas {
    /// Title line
    pub header: Rect,
    /// Gauge panel (record loaded and wide enough)
    pub gauge: Option<Rect>,
    /// Details panel (record loaded)
    pub details: Option<Rect>,
    /// Body when no record is loaded
    pub placeholder: Option<Rect>,
    /// Card entry box
    pub input: Option<Rect>,
    /// Error box
    pub error: Option<Rect>,
    /// Status bar
    pub status_bar: Rect,
}

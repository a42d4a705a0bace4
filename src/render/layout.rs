//! Pixel layout of the cell grid

use crate::config::FigureMargins;
use crate::figure::CellPosition;

/// Axis-aligned rectangle in pixels, y growing downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Horizontal pixel of data value `v` on an axis spanning `range`
    pub fn map_x(&self, v: f64, range: (f64, f64)) -> f64 {
        self.x0 + (v - range.0) / (range.1 - range.0) * self.width()
    }

    /// Vertical pixel of data value `v`; larger values are higher up
    pub fn map_y(&self, v: f64, range: (f64, f64)) -> f64 {
        self.y1 - (v - range.0) / (range.1 - range.0) * self.height()
    }

    /// Pixel of an axes-fraction coordinate ((0, 0) is bottom-left)
    pub fn fraction_to_px(&self, xy: (f64, f64)) -> (f64, f64) {
        (
            self.x0 + xy.0 * self.width(),
            self.y1 - xy.1 * self.height(),
        )
    }
}

/// Placement of an `n` x `n` grid of equally sized cells inside the figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    pub width: u32,
    pub height: u32,
    pub n: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    origin_x: f64,
    origin_y: f64,
}

impl FigureLayout {
    pub fn new(width: u32, height: u32, n: usize, margins: FigureMargins) -> Self {
        let n = n.max(1);
        let (w, h) = (width as f64, height as f64);

        let grid_left = margins.left * w;
        let grid_right = margins.right * w;
        // Figure fractions are measured from the bottom
        let grid_top = (1.0 - margins.top) * h;
        let grid_bottom = (1.0 - margins.bottom) * h;

        let slots = n as f64 + (n as f64 - 1.0) * margins.spacing;
        let cell_width = (grid_right - grid_left) / slots;
        let cell_height = (grid_bottom - grid_top) / slots;

        Self {
            width,
            height,
            n,
            cell_width,
            cell_height,
            gap_x: cell_width * margins.spacing,
            gap_y: cell_height * margins.spacing,
            origin_x: grid_left,
            origin_y: grid_top,
        }
    }

    pub fn cell_rect(&self, position: CellPosition) -> PixelRect {
        let x0 = self.origin_x + position.col as f64 * (self.cell_width + self.gap_x);
        let y0 = self.origin_y + position.row as f64 * (self.cell_height + self.gap_y);
        PixelRect {
            x0,
            y0,
            x1: x0 + self.cell_width,
            y1: y0 + self.cell_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_grid_fills_margins() {
        let margins = FigureMargins {
            left: 0.1,
            bottom: 0.1,
            right: 0.9,
            top: 0.9,
            spacing: 0.0,
        };
        let layout = FigureLayout::new(1000, 1000, 4, margins);
        assert!(close(layout.cell_width, 200.0));

        let first = layout.cell_rect(CellPosition::new(0, 0));
        assert!(close(first.x0, 100.0) && close(first.y0, 100.0));

        let last = layout.cell_rect(CellPosition::new(3, 3));
        assert!(close(last.x1, 900.0) && close(last.y1, 900.0));
    }

    #[test]
    fn test_spacing_between_cells() {
        let margins = FigureMargins {
            spacing: 0.1,
            ..FigureMargins::default()
        };
        let layout = FigureLayout::new(1400, 1400, 7, margins);
        let a = layout.cell_rect(CellPosition::new(0, 0));
        let b = layout.cell_rect(CellPosition::new(0, 1));
        assert!(close(b.x0 - a.x1, layout.gap_x));
        assert!(close(layout.gap_x, layout.cell_width * 0.1));

        let last = layout.cell_rect(CellPosition::new(6, 6));
        assert!(close(last.x1, 0.95 * 1400.0));
        assert!(close(last.y1, (1.0 - 0.08) * 1400.0));
    }

    #[test]
    fn test_data_mapping() {
        let rect = PixelRect {
            x0: 10.0,
            y0: 20.0,
            x1: 110.0,
            y1: 220.0,
        };
        assert!(close(rect.map_x(0.5, (0.0, 1.0)), 60.0));
        assert!(close(rect.map_y(0.0, (0.0, 1.0)), 220.0));
        assert!(close(rect.map_y(1.0, (0.0, 1.0)), 20.0));

        let (x, y) = rect.fraction_to_px((0.5, 1.05));
        assert!(close(x, 60.0) && close(y, 10.0));
    }
}

//! Terminal drawing surface for the spectrum.
//!
//! Horizontal units are cells; vertical units are eighths of a cell so bars
//! can use the lower-block glyphs. Bars are assumed bottom-aligned.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use super::surface::{BarRect, Gradient, Rgb, Surface};

const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct CellCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<Option<(char, Rgb)>>,
}

impl CellCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; usize::from(cols) * usize::from(rows)],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Glyph and colour at `(col, row)`, row 0 being the top.
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Rgb)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[usize::from(row) * usize::from(self.cols) + usize::from(col)]
    }

    fn fill_column(&mut self, col: usize, top: i32, bottom: i32, gradient: &Gradient) {
        for row in 0..usize::from(self.rows) {
            let row_top = row as i32 * 8;
            let filled = (bottom.min(row_top + 8) - top.max(row_top)).clamp(0, 8);
            if filled == 0 {
                continue;
            }
            let t = 1.0 - (row as f32 + 0.5) / f32::from(self.rows);
            self.cells[row * usize::from(self.cols) + col] =
                Some((EIGHTHS[filled as usize], gradient.at(t)));
        }
    }
}

impl Surface for CellCanvas {
    fn size(&self) -> (f32, f32) {
        (f32::from(self.cols), f32::from(self.rows) * 8.0)
    }

    fn clear(&mut self) {
        self.cells.fill(None);
    }

    fn fill_rounded_rect(&mut self, rect: BarRect, radius: f32, fill: &Gradient) {
        let first = rect.x.round().max(0.0) as usize;
        let last = ((rect.x + rect.width).round() as usize)
            .max(first + 1)
            .min(usize::from(self.cols));
        let bottom = (rect.y + rect.height).round() as i32;
        let top = rect.y.round() as i32;
        let rounded = radius > 0.0 && last - first >= 2;

        for col in first..last {
            let edge = col == first || col + 1 == last;
            // Shave the outer columns so the top reads as rounded.
            let top = if rounded && edge && bottom - top > 1 {
                top + 1
            } else {
                top
            };
            self.fill_column(col, top, bottom, fill);
        }
    }
}

impl Widget for &CellCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        // Bottom-align the canvas inside `area`.
        let y0 = area.y + area.height - rows;
        for row in 0..rows {
            for col in 0..cols {
                let Some((ch, Rgb(r, g, b))) = self.cell(col, self.rows - rows + row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, y0 + row)) {
                    cell.set_char(ch).set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }
}

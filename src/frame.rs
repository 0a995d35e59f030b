// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Region of the plane shown on screen, centered on the spiral origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub half_width: f64,
    pub half_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            half_width: 1.6,
            half_height: 0.9,
        }
    }
}

/// A screen worth of cells. Row 0 is reserved for the caption; points are
/// projected onto the rows below it.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    cover: Vec<f32>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            cover: vec![0.0; len],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.cover.fill(0.0);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::BLANK)
    }

    /// Writes `cell` unless something more opaque already occupies the spot.
    pub fn plot(&mut self, x: u16, y: u16, cell: Cell, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            if alpha > self.cover[i] {
                self.cover[i] = alpha;
                self.cells[i] = cell;
            }
        }
    }

    /// Centers `text` on row `y`, clipped to the frame width.
    pub fn put_centered(&mut self, y: u16, text: &str, template: Cell) {
        let len = text.chars().count().min(self.width as usize) as u16;
        let x0 = (self.width - len) / 2;
        for (k, ch) in text.chars().take(len as usize).enumerate() {
            if let Some(i) = self.index(x0 + k as u16, y) {
                self.cells[i] = Cell { ch, ..template };
                self.cover[i] = f32::INFINITY;
            }
        }
    }

    /// Maps a point of the plane to a cell below the caption row, or `None`
    /// when it falls outside the viewport.
    pub fn project(&self, view: &Viewport, x: f64, y: f64) -> Option<(u16, u16)> {
        let rows = self.height.checked_sub(1)? as f64;
        let cols = self.width as f64;
        let u = (x + view.half_width) / (2.0 * view.half_width);
        let v = (view.half_height - y) / (2.0 * view.half_height);
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        Some(((u * cols) as u16, 1 + (v * rows) as u16))
    }
}

use super::piece::{Cells, Piece, Shape};

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 20;

type Row = [Option<Shape>; WIDTH];

const EMPTY_ROW: Row = [None; WIDTH];

/// Locked cells. Each occupied cell remembers the shape that filled it,
/// which decides its color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; HEIGHT],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Shape> {
        self.rows.get(y).and_then(|row| row.get(x).copied().flatten())
    }

    pub fn set(&mut self, x: usize, y: usize, shape: Option<Shape>) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = shape;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Whether `cells` placed at (x, y) stay inside the walls and floor and
    /// off every locked cell. Rows above the top are open.
    pub fn fits(&self, cells: &Cells, x: i32, y: i32) -> bool {
        cells.iter().all(|&(cx, cy)| {
            let (col, row) = (x + cx, y + cy);
            if col < 0 || col >= WIDTH as i32 || row >= HEIGHT as i32 {
                return false;
            }
            row < 0 || self.rows[row as usize][col as usize].is_none()
        })
    }

    /// Write the piece into the grid. Cells still above the top are lost.
    pub fn lock(&mut self, piece: &Piece) {
        for (col, row) in piece.absolute() {
            if row >= 0 {
                self.set(col as usize, row as usize, Some(piece.shape));
            }
        }
    }

    /// Remove every full row and refill from the top, keeping the order of
    /// the rest. Returns how many rows went.
    pub fn clear_lines(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().any(Option::is_none));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, EMPTY_ROW);
        }
        cleared
    }
}

use rand::Rng;

use super::board::WIDTH;

pub type Cells = [(i32, i32); 4];

/// Column the 4x4 spawn box starts at.
pub const SPAWN_X: i32 = WIDTH as i32 / 2 - 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
    ];

    /// Spawn orientation, relative to the piece origin.
    pub fn cells(self) -> Cells {
        match self {
            Shape::I => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Shape::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            Shape::T => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Shape::S => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Shape::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Shape::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Shape::L => [(2, 0), (0, 1), (1, 1), (2, 1)],
        }
    }

    pub fn random(rng: &mut impl Rng) -> Shape {
        Shape::ALL[rng.gen_range(0..Shape::ALL.len())]
    }

    /// One step clockwise. The I piece turns about a pivot half a cell
    /// higher than the others; O is returned unchanged.
    pub fn rotate(self, cells: &Cells) -> Cells {
        if self == Shape::O {
            return *cells;
        }
        let lift = if self == Shape::I { 1 } else { 0 };
        cells.map(|(x, y)| (2 - y, x - lift))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub cells: Cells,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn spawn(shape: Shape) -> Self {
        Self {
            shape,
            cells: shape.cells(),
            x: SPAWN_X,
            y: 0,
        }
    }

    /// Board coordinates of each cell.
    pub fn absolute(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().map(move |&(cx, cy)| (self.x + cx, self.y + cy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn set(cells: &Cells) -> HashSet<(i32, i32)> {
        cells.iter().copied().collect()
    }

    #[test]
    fn spawn_is_centered() {
        let piece = Piece::spawn(Shape::T);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, 0);
        let cols: Vec<i32> = piece.absolute().map(|(x, _)| x).collect();
        assert_eq!(cols, vec![4, 3, 4, 5]);
    }

    #[test]
    fn o_piece_never_turns() {
        let cells = Shape::O.cells();
        assert_eq!(Shape::O.rotate(&cells), cells);
    }

    #[test]
    fn i_piece_stands_up_in_column_one() {
        let turned = Shape::I.rotate(&Shape::I.cells());
        assert_eq!(turned, [(1, -1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn t_piece_clockwise() {
        let turned = Shape::T.rotate(&Shape::T.cells());
        assert_eq!(set(&turned), set(&[(2, 1), (1, 0), (1, 1), (1, 2)]));
    }

    #[test]
    fn four_turns_restore_every_shape() {
        for shape in Shape::ALL {
            let start = shape.cells();
            let mut cells = start;
            for _ in 0..4 {
                cells = shape.rotate(&cells);
            }
            assert_eq!(set(&cells), set(&start), "{shape:?}");
        }
    }

    proptest! {
        #[test]
        fn four_turns_restore_any_orientation(idx in 0usize..7, turns in 0usize..4) {
            let shape = Shape::ALL[idx];
            let mut cells = shape.cells();
            for _ in 0..turns {
                cells = shape.rotate(&cells);
            }
            let before = cells;
            for _ in 0..4 {
                cells = shape.rotate(&cells);
            }
            prop_assert_eq!(cells, before);
        }
    }
}

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::Board;
use super::piece::{Piece, Shape};

/// Points per lock, indexed by rows cleared (capped at four).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// What locking a piece did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub cleared: usize,
    pub points: u32,
    /// The next piece had nowhere to spawn.
    pub topped_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Applied,
    Blocked,
    /// A downward move was blocked, so the piece locked where it was.
    Locked(LockReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateResult {
    Rotated,
    /// Rotated after shifting by this many columns.
    Kicked(i32),
    Rejected,
}

/// Columns tried, in order, when a rotation doesn't fit in place.
const KICKS: [i32; 3] = [0, -1, 1];

pub struct Session {
    pub board: Board,
    pub piece: Piece,
    pub score: u32,
    pub lines: u32,
    pub topped_out: bool,
    rng: StdRng,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let piece = Piece::spawn(Shape::random(&mut rng));
        Self {
            board: Board::new(),
            piece,
            score: 0,
            lines: 0,
            topped_out: false,
            rng,
        }
    }

    /// Bring in a fresh random piece. Returns false on top-out.
    pub fn spawn(&mut self) -> bool {
        let shape = Shape::random(&mut self.rng);
        self.spawn_shape(shape)
    }

    pub fn spawn_shape(&mut self, shape: Shape) -> bool {
        self.piece = Piece::spawn(shape);
        if !self.board.fits(&self.piece.cells, self.piece.x, self.piece.y) {
            self.topped_out = true;
            tracing::info!(score = self.score, lines = self.lines, "topped out");
        }
        !self.topped_out
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) -> MoveResult {
        let (x, y) = (self.piece.x + dx, self.piece.y + dy);
        if self.board.fits(&self.piece.cells, x, y) {
            self.piece.x = x;
            self.piece.y = y;
            MoveResult::Applied
        } else if dy > 0 {
            MoveResult::Locked(self.lock())
        } else {
            MoveResult::Blocked
        }
    }

    /// One gravity step; the same path as a soft drop.
    pub fn tick(&mut self) -> MoveResult {
        self.move_by(0, 1)
    }

    pub fn rotate(&mut self) -> RotateResult {
        if self.piece.shape == Shape::O {
            return RotateResult::Rejected;
        }
        let turned = self.piece.shape.rotate(&self.piece.cells);
        for dx in KICKS {
            if self.board.fits(&turned, self.piece.x + dx, self.piece.y) {
                self.piece.cells = turned;
                self.piece.x += dx;
                return if dx == 0 {
                    RotateResult::Rotated
                } else {
                    RotateResult::Kicked(dx)
                };
            }
        }
        tracing::debug!(shape = ?self.piece.shape, "rotation rejected");
        RotateResult::Rejected
    }

    /// Drop straight down and lock. Returns the rows fallen with the lock.
    pub fn hard_drop(&mut self) -> (u32, LockReport) {
        let mut rows = 0;
        while self.board.fits(&self.piece.cells, self.piece.x, self.piece.y + 1) {
            self.piece.y += 1;
            rows += 1;
        }
        (rows, self.lock())
    }

    fn lock(&mut self) -> LockReport {
        self.board.lock(&self.piece);
        let cleared = self.board.clear_lines();
        let points = LINE_SCORES[cleared.min(4)];
        self.score += points;
        self.lines += cleared as u32;
        if cleared > 0 {
            tracing::info!(cleared, points, lines = self.lines, "lines cleared");
        }
        let topped_out = !self.spawn();
        LockReport {
            cleared,
            points,
            topped_out,
        }
    }

    /// Piece position after a hard drop, for the landing preview.
    pub fn ghost_y(&self) -> i32 {
        let mut y = self.piece.y;
        while self.board.fits(&self.piece.cells, self.piece.x, y + 1) {
            y += 1;
        }
        y
    }
}

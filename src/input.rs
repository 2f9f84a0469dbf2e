//! Held-key and pointer state, sampled once per frame.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// Frames a press stays held when the terminal never reports releases.
/// About half a second at 16 ms frames, which outlasts a typical
/// auto-repeat delay.
const HOLD_FRAMES: u32 = 32;

/// What the simulation sees for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    /// Last known pointer cell (column, row) in terminal coordinates.
    pub pointer: Option<(u16, u16)>,
    /// The pointer moved since the previous frame.
    pub pointer_moved: bool,
}

#[derive(Debug, Clone, Copy, Default)]
enum Hold {
    #[default]
    Up,
    /// Held until an explicit release.
    Down,
    /// Held for this many more frames.
    Decaying(u32),
}

impl Hold {
    fn is_down(self) -> bool {
        !matches!(self, Hold::Up)
    }

    fn step(&mut self) {
        if let Hold::Decaying(n) = *self {
            *self = if n <= 1 { Hold::Up } else { Hold::Decaying(n - 1) };
        }
    }
}

pub struct InputCollector {
    release_events: bool,
    left: Hold,
    right: Hold,
    pointer: Option<(u16, u16)>,
    pointer_moved: bool,
}

impl InputCollector {
    /// `release_events` tells whether the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            left: Hold::Up,
            right: Hold::Up,
            pointer: None,
            pointer_moved: false,
        }
    }

    pub fn on_key(&mut self, key: &KeyEvent) {
        let slot = match key.code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &mut self.left,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &mut self.right,
            _ => return,
        };
        *slot = match key.kind {
            KeyEventKind::Release => Hold::Up,
            _ if self.release_events => Hold::Down,
            _ => Hold::Decaying(HOLD_FRAMES),
        };
    }

    pub fn on_mouse(&mut self, mouse: &MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            self.pointer = Some((mouse.column, mouse.row));
            self.pointer_moved = true;
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left.is_down(),
            right: self.right.is_down(),
            pointer: self.pointer,
            pointer_moved: self.pointer_moved,
        }
    }

    /// Consume the frame: decay timed holds and clear the pointer edge.
    pub fn end_frame(&mut self) {
        self.left.step();
        self.right.step();
        self.pointer_moved = false;
    }

    /// Drop every hold, e.g. when switching tabs.
    pub fn clear(&mut self) {
        self.left = Hold::Up;
        self.right = Hold::Up;
        self.pointer_moved = false;
    }
}

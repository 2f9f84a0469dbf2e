pub mod block_breaker;
pub mod tetris;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::input::InputSnapshot;

/// Input that would start a new round is ignored this long after one ends.
pub const END_COOLDOWN_MS: u64 = 500;

/// Round lifecycle shared by every game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Menu,
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }

    /// Menu and end screens both lead back into a round.
    pub fn can_start(self) -> bool {
        self != Phase::Playing
    }
}

/// Frames covering at least `ms`.
pub fn frames_for(ms: u64, frame_ms: u64) -> u32 {
    ms.div_ceil(frame_ms.max(1)) as u32
}

pub trait Game {
    /// Advance one frame.
    fn update(&mut self, input: &InputSnapshot);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    /// Back to the menu with a fresh round prepared.
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn phase(&self) -> Phase;

    fn is_game_over(&self) -> bool {
        self.phase().is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_rounds_up_to_whole_frames() {
        assert_eq!(frames_for(500, 16), 32);
        assert_eq!(frames_for(500, 20), 25);
        assert_eq!(frames_for(500, 0), 500);
    }

    #[test]
    fn only_playing_blocks_a_start() {
        assert!(Phase::Menu.can_start());
        assert!(Phase::Won.can_start());
        assert!(Phase::Lost.can_start());
        assert!(!Phase::Playing.can_start());
        assert!(!Phase::Menu.is_over());
    }
}

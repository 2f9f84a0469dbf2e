use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::BlockBreakerConfig;
use crate::timer::Countdown;

pub const WIDTH: f32 = 500.0;
pub const HEIGHT: f32 = 600.0;

pub const PADDLE_WIDTH: f32 = 80.0;
pub const PADDLE_HEIGHT: f32 = 12.0;
pub const PADDLE_Y: f32 = HEIGHT - 40.0;
pub const EXPAND_FACTOR: f32 = 1.5;

pub const BALL_SIZE: f32 = 10.0;
pub const BASE_SPEED: f32 = 5.0;
/// Floor on |dy| after a paddle hit so the ball never skims sideways.
pub const MIN_VERTICAL_SPEED: f32 = 2.0;
pub const TRAIL_LEN: usize = 5;
pub const LAUNCH_SPREAD_DEG: f32 = 45.0;
pub const MULTI_SPREAD_DEG: f32 = 60.0;
pub const PADDLE_MAX_ANGLE_DEG: f32 = 60.0;

pub const BLOCK_ROWS: usize = 6;
pub const BLOCK_COLS: usize = 10;
pub const BLOCK_WIDTH: f32 = 46.0;
pub const BLOCK_HEIGHT: f32 = 20.0;
pub const BLOCK_PADDING: f32 = 4.0;
pub const BLOCK_OFFSET_TOP: f32 = 80.0;
pub const BLOCK_OFFSET_LEFT: f32 = BLOCK_PADDING + 5.0;

pub const POWERUP_SIZE: f32 = 20.0;
pub const POWERUP_SPEED: f32 = 2.0;
pub const SLOW_MODIFIER: f32 = 0.6;
pub const FAST_MODIFIER: f32 = 1.5;

/// Axis-aligned box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Interiors intersect; touching edges don't count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    /// Like `overlaps`, but shared edges count as contact.
    pub fn touches(&self, other: &Bounds) -> bool {
        self.right() >= other.x
            && self.x <= other.right()
            && self.bottom() >= other.y
            && self.y <= other.bottom()
    }
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    /// Position before this frame's move.
    pub prev_x: f32,
    pub prev_y: f32,
    /// Recent positions, oldest first. Render only.
    pub trail: VecDeque<(f32, f32)>,
}

impl Ball {
    /// A ball heading upward at `angle_deg` from vertical, base speed.
    pub fn launched(x: f32, y: f32, angle_deg: f32) -> Self {
        let a = angle_deg.to_radians();
        Self::with_velocity(x, y, BASE_SPEED * a.sin(), -BASE_SPEED * a.cos())
    }

    pub fn with_velocity(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            prev_x: x,
            prev_y: y,
            trail: VecDeque::with_capacity(TRAIL_LEN + 1),
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, BALL_SIZE, BALL_SIZE)
    }

    pub fn prev_bounds(&self) -> Bounds {
        Bounds::new(self.prev_x, self.prev_y, BALL_SIZE, BALL_SIZE)
    }

    pub fn speed(&self) -> f32 {
        self.dx.hypot(self.dy)
    }

    pub(crate) fn record_trail(&mut self) {
        self.trail.push_back((self.x, self.y));
        if self.trail.len() > TRAIL_LEN {
            self.trail.pop_front();
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
}

impl Paddle {
    pub fn centered() -> Self {
        Self {
            x: WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
            width: PADDLE_WIDTH,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, PADDLE_Y, self.width, PADDLE_HEIGHT)
    }

    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn is_expanded(&self) -> bool {
        self.width > PADDLE_WIDTH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    Expand,
    Multi,
    Slow,
    Fast,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Expand,
        PowerupKind::Multi,
        PowerupKind::Slow,
        PowerupKind::Fast,
    ];

    pub fn symbol(self) -> char {
        match self {
            PowerupKind::Expand => '↔',
            PowerupKind::Multi => '∴',
            PowerupKind::Slow => '◷',
            PowerupKind::Fast => '⚡',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerupKind::Expand => "expand",
            PowerupKind::Multi => "multi",
            PowerupKind::Slow => "slow",
            PowerupKind::Fast => "fast",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    pub points: u32,
    pub visible: bool,
    pub powerup: Option<PowerupKind>,
}

impl Block {
    pub fn at(row: usize, col: usize, powerup: Option<PowerupKind>) -> Self {
        Self {
            row,
            col,
            x: col as f32 * (BLOCK_WIDTH + BLOCK_PADDING) + BLOCK_OFFSET_LEFT,
            y: row as f32 * (BLOCK_HEIGHT + BLOCK_PADDING) + BLOCK_OFFSET_TOP,
            points: (row as u32 + 1) * 10,
            visible: true,
            powerup,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, BLOCK_WIDTH, BLOCK_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Powerup {
    pub x: f32,
    pub y: f32,
    pub kind: PowerupKind,
}

impl Powerup {
    /// A pickup dropping from the middle of `block`.
    pub fn from_block(block: &Block, kind: PowerupKind) -> Self {
        Self {
            x: block.x + (BLOCK_WIDTH / 2.0).floor() - (POWERUP_SIZE / 2.0).floor(),
            y: block.y,
            kind,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, POWERUP_SIZE, POWERUP_SIZE)
    }
}

/// Everything one round mutates. Owned by the game, handed to the step
/// functions by `&mut`.
pub struct Session {
    pub balls: Vec<Ball>,
    pub paddle: Paddle,
    pub blocks: Vec<Block>,
    pub powerups: Vec<Powerup>,
    pub score: u32,
    pub lives: u32,
    pub speed_modifier: f32,
    pub expand_timer: Countdown,
    pub speed_timer: Countdown,
    /// Paddle follows the pointer until a steering key is pressed.
    pub use_pointer: bool,
    pub pointer_x: f32,
    pub settings: BlockBreakerConfig,
    pub rng: StdRng,
}

impl Session {
    pub fn new(settings: BlockBreakerConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let blocks = Self::build_blocks(&mut rng, settings.powerup_chance);
        let mut session = Self {
            balls: Vec::new(),
            paddle: Paddle::centered(),
            blocks,
            powerups: Vec::new(),
            score: 0,
            lives: settings.lives,
            speed_modifier: 1.0,
            expand_timer: Countdown::default(),
            speed_timer: Countdown::default(),
            use_pointer: true,
            pointer_x: WIDTH / 2.0,
            settings,
            rng,
        };
        session.serve();
        session
    }

    fn build_blocks(rng: &mut StdRng, powerup_chance: f64) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(BLOCK_ROWS * BLOCK_COLS);
        for row in 0..BLOCK_ROWS {
            for col in 0..BLOCK_COLS {
                let powerup = if rng.gen_bool(powerup_chance) {
                    PowerupKind::ALL.choose(rng).copied()
                } else {
                    None
                };
                blocks.push(Block::at(row, col, powerup));
            }
        }
        blocks
    }

    /// Replace the ball set with a single ball at the launch point.
    pub fn serve(&mut self) {
        let angle = self.rng.gen_range(-LAUNCH_SPREAD_DEG..=LAUNCH_SPREAD_DEG);
        let x = (WIDTH / 2.0).floor();
        let y = PADDLE_Y - BALL_SIZE - 10.0;
        self.balls = vec![Ball::launched(x, y, angle)];
    }

    pub fn blocks_left(&self) -> usize {
        self.blocks.iter().filter(|b| b.visible).count()
    }

    pub fn all_cleared(&self) -> bool {
        self.blocks.iter().all(|b| !b.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_up_launch() {
        let ball = Ball::launched(0.0, 0.0, 0.0);
        assert!(ball.dx.abs() < 1e-6);
        assert!((ball.dy + 5.0).abs() < 1e-6);
    }

    #[test]
    fn launch_keeps_base_speed() {
        for angle in [-45.0, -10.0, 30.0, 60.0] {
            let ball = Ball::launched(0.0, 0.0, angle);
            assert!((ball.speed() - BASE_SPEED).abs() < 1e-4);
            assert!(ball.dy < 0.0);
        }
    }

    #[test]
    fn block_grid_layout_and_points() {
        let session = Session::new(BlockBreakerConfig::default(), 7);
        assert_eq!(session.blocks.len(), BLOCK_ROWS * BLOCK_COLS);
        let first = &session.blocks[0];
        assert_eq!((first.x, first.y), (9.0, 80.0));
        assert_eq!(first.points, 10);
        let last = session.blocks.last().unwrap();
        assert_eq!(last.points, 60);
        assert_eq!(last.y, 80.0 + 5.0 * 24.0);
        assert!(session.blocks.iter().all(|b| b.visible));
    }

    #[test]
    fn powerup_chance_extremes() {
        let none = BlockBreakerConfig {
            powerup_chance: 0.0,
            ..Default::default()
        };
        let session = Session::new(none, 1);
        assert!(session.blocks.iter().all(|b| b.powerup.is_none()));

        let all = BlockBreakerConfig {
            powerup_chance: 1.0,
            ..Default::default()
        };
        let session = Session::new(all, 1);
        assert!(session.blocks.iter().all(|b| b.powerup.is_some()));
    }

    #[test]
    fn serve_places_one_ball_above_paddle() {
        let session = Session::new(BlockBreakerConfig::default(), 3);
        assert_eq!(session.balls.len(), 1);
        let ball = &session.balls[0];
        assert_eq!((ball.x, ball.y), (250.0, 540.0));
        assert!(ball.dy < 0.0);
        assert!(ball.dx.abs() <= BASE_SPEED * (45f32).to_radians().sin() + 1e-4);
    }

    #[test]
    fn trail_is_bounded() {
        let mut ball = Ball::launched(0.0, 0.0, 0.0);
        for i in 0..20 {
            ball.y = i as f32;
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), TRAIL_LEN);
        assert_eq!(ball.trail.front(), Some(&(0.0, 15.0)));
    }

    #[test]
    fn touching_edges_only_count_for_touch() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));
    }
}

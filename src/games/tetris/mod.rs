mod board;
mod piece;
mod render;
mod session;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;

use crate::config::{Config, TetrisConfig};
use crate::games::{frames_for, Game, Phase, END_COOLDOWN_MS};
use crate::input::InputSnapshot;
use crate::timer::{Countdown, Repeating};

use session::{LockReport, MoveResult, Session};

/// How long the points from a clear stay on screen.
const FLASH_MS: u64 = 600;

pub struct Tetris {
    phase: Phase,
    session: Session,
    settings: TetrisConfig,
    rng: StdRng,
    frame_ms: u64,
    drop_timer: Repeating,
    cooldown: Countdown,
    cooldown_frames: u32,
    flash: Countdown,
    flash_frames: u32,
    flash_points: u32,
    paused: bool,
}

impl Tetris {
    pub fn new(config: &Config, seed: u64) -> Self {
        let settings = config.tetris.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new(rng.gen());
        Self {
            phase: Phase::Menu,
            session,
            drop_timer: Repeating::new(settings.drop_interval_ms),
            settings,
            rng,
            frame_ms: config.frame_ms,
            cooldown: Countdown::default(),
            cooldown_frames: frames_for(END_COOLDOWN_MS, config.frame_ms),
            flash: Countdown::default(),
            flash_frames: frames_for(FLASH_MS, config.frame_ms),
            flash_points: 0,
            paused: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.session.lines / self.settings.lines_per_level + 1
    }

    /// Gravity period for the current line count.
    pub fn drop_interval(&self) -> u64 {
        let steps = u64::from(self.session.lines / self.settings.lines_per_level);
        self.settings
            .drop_interval_ms
            .saturating_sub(steps * self.settings.interval_step_ms)
            .max(self.settings.min_drop_interval_ms)
    }

    fn start_round(&mut self) {
        self.session = Session::new(self.rng.gen());
        self.drop_timer.set_interval(self.drop_interval());
        self.drop_timer.reset();
        self.flash.cancel();
        self.paused = false;
        self.phase = Phase::Playing;
        tracing::info!(shape = ?self.session.piece.shape, "tetris round started");
    }

    fn finish(&mut self) {
        self.phase = Phase::Lost;
        self.cooldown.start(self.cooldown_frames);
        tracing::info!(score = self.session.score, lines = self.session.lines, "tetris round over");
    }

    fn on_lock(&mut self, report: LockReport) {
        if report.cleared > 0 {
            self.flash_points = report.points;
            self.flash.start(self.flash_frames);
            let interval = self.drop_interval();
            if interval != self.drop_timer.interval_ms() {
                tracing::info!(level = self.level(), interval_ms = interval, "level up");
                self.drop_timer.set_interval(interval);
            }
        }
        if report.topped_out {
            self.finish();
        }
    }

    fn apply(&mut self, result: MoveResult) {
        if let MoveResult::Locked(report) = result {
            self.on_lock(report);
        }
    }

    fn play_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('P') => self.paused = !self.paused,
            KeyCode::Char('r') | KeyCode::Char('R') => self.start_round(),
            _ if self.paused => {}
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                let result = self.session.move_by(-1, 0);
                self.apply(result);
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                let result = self.session.move_by(1, 0);
                self.apply(result);
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                let result = self.session.move_by(0, 1);
                self.apply(result);
            }
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                self.session.rotate();
            }
            KeyCode::Char(' ') => {
                let (_, report) = self.session.hard_drop();
                self.on_lock(report);
            }
            _ => {}
        }
    }
}

impl Game for Tetris {
    fn update(&mut self, _input: &InputSnapshot) {
        self.cooldown.tick();
        self.flash.tick();
        if self.phase != Phase::Playing || self.paused {
            return;
        }
        for _ in 0..self.drop_timer.advance(self.frame_ms) {
            let result = self.session.tick();
            self.apply(result);
            if self.phase != Phase::Playing {
                break;
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if self.phase == Phase::Playing {
            self.play_key(key);
        } else if !self.cooldown.is_active() {
            self.start_round();
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let view = render::View {
            session: &self.session,
            phase: self.phase,
            paused: self.paused,
            level: self.level(),
            flash: self.flash.is_active().then_some(self.flash_points),
        };
        render::draw(frame, area, &view);
    }

    fn reset(&mut self) {
        self.session = Session::new(self.rng.gen());
        self.drop_timer = Repeating::new(self.settings.drop_interval_ms);
        self.phase = Phase::Menu;
        self.paused = false;
        self.cooldown.cancel();
        self.flash.cancel();
    }

    fn get_score(&self) -> u32 {
        self.session.score
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}

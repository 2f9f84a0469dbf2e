mod physics;
mod render;
mod state;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;

use crate::config::{BlockBreakerConfig, Config};
use crate::games::{frames_for, Game, Phase, END_COOLDOWN_MS};
use crate::input::InputSnapshot;
use crate::timer::Countdown;
use crate::ui::canvas::Canvas;

use physics::{Controls, StepOutcome};
use state::{Session, WIDTH};

pub struct BlockBreaker {
    phase: Phase,
    session: Session,
    settings: BlockBreakerConfig,
    /// Seeds each round's session.
    rng: StdRng,
    paused: bool,
    cooldown: Countdown,
    cooldown_frames: u32,
    /// Where the playfield was last drawn, for mapping the pointer.
    field: Option<Rect>,
}

impl BlockBreaker {
    pub fn new(config: &Config, seed: u64) -> Self {
        let settings = config.block_breaker.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let session = Session::new(settings.clone(), rng.gen());
        Self {
            phase: Phase::Menu,
            session,
            settings,
            rng,
            paused: false,
            cooldown: Countdown::default(),
            cooldown_frames: frames_for(END_COOLDOWN_MS, config.frame_ms),
            field: None,
        }
    }

    fn start_round(&mut self) {
        self.session = Session::new(self.settings.clone(), self.rng.gen());
        self.phase = Phase::Playing;
        self.paused = false;
        tracing::info!(lives = self.session.lives, "block breaker round started");
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.cooldown.start(self.cooldown_frames);
        tracing::info!(?phase, score = self.session.score, "block breaker round over");
    }

    fn controls(&self, input: &InputSnapshot) -> Controls {
        let pointer_x = match (input.pointer_moved, input.pointer, self.field) {
            (true, Some((column, _)), Some(area)) => Canvas::column_to_world(area, column, WIDTH),
            _ => None,
        };
        Controls {
            left: input.left,
            right: input.right,
            pointer_x,
        }
    }
}

impl Game for BlockBreaker {
    fn update(&mut self, input: &InputSnapshot) {
        self.cooldown.tick();
        if self.phase != Phase::Playing || self.paused {
            return;
        }
        let controls = self.controls(input);
        match physics::step(&mut self.session, &controls) {
            StepOutcome::Won => self.finish(Phase::Won),
            StepOutcome::Lost => self.finish(Phase::Lost),
            StepOutcome::LifeLost | StepOutcome::Continue => {}
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') if self.phase == Phase::Playing => {
                self.start_round();
            }
            KeyCode::Char('p') | KeyCode::Char('P') if self.phase == Phase::Playing => {
                self.paused = !self.paused;
            }
            KeyCode::Char(' ') | KeyCode::Enter
                if self.phase.can_start() && !self.cooldown.is_active() =>
            {
                self.start_round();
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.field = Some(render::draw(frame, area, &self.session, self.phase, self.paused));
    }

    fn reset(&mut self) {
        self.session = Session::new(self.settings.clone(), self.rng.gen());
        self.phase = Phase::Menu;
        self.paused = false;
        self.cooldown.cancel();
    }

    fn get_score(&self) -> u32 {
        self.session.score
    }

    fn phase(&self) -> Phase {
        self.phase
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent};

use crate::config::Config;
use crate::games::block_breaker::BlockBreaker;
use crate::games::tetris::Tetris;
use crate::games::{Game, Phase};
use crate::input::InputCollector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    BlockBreaker,
    Tetris,
}

/// Game tabs in home-screen order.
pub const GAMES: [Tab; 2] = [Tab::BlockBreaker, Tab::Tetris];

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::BlockBreaker, Tab::Tetris]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => " Home ",
            Tab::BlockBreaker => " Block Breaker ",
            Tab::Tetris => " Tetris ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::BlockBreaker => 1,
            Tab::Tetris => 2,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    /// Highlighted tile on the home screen, an index into `GAMES`.
    pub selected_game: usize,
    pub block_breaker: BlockBreaker,
    pub tetris: Tetris,
    input: InputCollector,
}

impl App {
    pub fn new(config: &Config, seed: u64, release_events: bool) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            block_breaker: BlockBreaker::new(config, seed),
            tetris: Tetris::new(config, seed.wrapping_add(1)),
            input: InputCollector::new(release_events),
        }
    }

    /// Phase of the game behind a tab; `None` for Home.
    pub fn phase_of(&self, tab: Tab) -> Option<Phase> {
        match tab {
            Tab::Home => None,
            Tab::BlockBreaker => Some(self.block_breaker.phase()),
            Tab::Tetris => Some(self.tetris.phase()),
        }
    }

    pub fn open(&mut self, tab: Tab) {
        if tab == self.current_tab {
            return;
        }
        if let Some(idx) = GAMES.iter().position(|&g| g == tab) {
            self.selected_game = idx;
        }
        tracing::debug!(from = ?self.current_tab, to = ?tab, "switching tab");
        // a finished round doesn't wait behind a hidden tab
        match self.current_tab {
            Tab::BlockBreaker if self.block_breaker.is_game_over() => self.block_breaker.reset(),
            Tab::Tetris if self.tetris.is_game_over() => self.tetris.reset(),
            _ => {}
        }
        self.current_tab = tab;
        self.input.clear();
    }

    /// Score of each game, in `GAMES` order.
    pub fn scores(&self) -> [u32; 2] {
        [self.block_breaker.get_score(), self.tetris.get_score()]
    }

    pub fn on_tick(&mut self) {
        let snapshot = self.input.snapshot();
        match self.current_tab {
            Tab::Home => {}
            Tab::BlockBreaker => self.block_breaker.update(&snapshot),
            Tab::Tetris => self.tetris.update(&snapshot),
        }
        self.input.end_frame();
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        self.input.on_mouse(&mouse);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        self.input.on_key(&key);
        if key.kind == KeyEventKind::Release {
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') if self.current_tab == Tab::Home => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc if self.current_tab != Tab::Home => {
                self.open(Tab::Home);
                return;
            }
            _ => {}
        }

        if self.current_tab == Tab::Home {
            self.home_key(key);
            return;
        }

        match self.current_tab {
            Tab::Home => {}
            Tab::BlockBreaker => self.block_breaker.handle_input(key),
            Tab::Tetris => self.tetris.handle_input(key),
        }
    }

    fn home_key(&mut self, key: KeyEvent) {
        if !key.modifiers.is_empty() {
            return;
        }
        match key.code {
            KeyCode::Char('1') => self.open(Tab::BlockBreaker),
            KeyCode::Char('2') => self.open(Tab::Tetris),
            KeyCode::Right | KeyCode::Down => {
                self.selected_game = (self.selected_game + 1) % GAMES.len();
            }
            KeyCode::Left | KeyCode::Up => {
                self.selected_game = (self.selected_game + GAMES.len() - 1) % GAMES.len();
            }
            KeyCode::Enter => self.open(GAMES[self.selected_game]),
            _ => {}
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.open(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

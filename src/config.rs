//! Startup tunables, optionally read from a JSON file.
//!
//! Every field has a default, so a config file only needs the keys it
//! wants to change.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame period of the host loop.
    pub frame_ms: u64,
    pub block_breaker: BlockBreakerConfig,
    pub tetris: TetrisConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlockBreakerConfig {
    pub lives: u32,
    /// Chance for each block to carry a powerup.
    pub powerup_chance: f64,
    /// How long Expand, Slow and Fast last.
    pub powerup_frames: u32,
    /// Paddle travel per frame under keyboard control.
    pub paddle_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    pub drop_interval_ms: u64,
    pub min_drop_interval_ms: u64,
    /// Taken off the drop interval each level.
    pub interval_step_ms: u64,
    pub lines_per_level: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            block_breaker: BlockBreakerConfig::default(),
            tetris: TetrisConfig::default(),
        }
    }
}

impl Default for BlockBreakerConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            powerup_chance: 0.15,
            powerup_frames: 300,
            paddle_speed: 8.0,
        }
    }
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            drop_interval_ms: 500,
            min_drop_interval_ms: 100,
            interval_step_ms: 50,
            lines_per_level: 10,
        }
    }
}

impl Config {
    /// Load from `path`, or fall back to the defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("loading config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.frame_ms > 0, "frame_ms must be positive");
        let bb = &self.block_breaker;
        ensure!(bb.lives > 0, "block_breaker.lives must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&bb.powerup_chance),
            "block_breaker.powerup_chance must be within [0, 1], got {}",
            bb.powerup_chance
        );
        ensure!(
            bb.paddle_speed.is_finite() && bb.paddle_speed > 0.0,
            "block_breaker.paddle_speed must be positive"
        );
        let t = &self.tetris;
        ensure!(t.lines_per_level > 0, "tetris.lines_per_level must be at least 1");
        ensure!(
            t.min_drop_interval_ms > 0 && t.min_drop_interval_ms <= t.drop_interval_ms,
            "tetris.min_drop_interval_ms must be in 1..=drop_interval_ms"
        );
        Ok(())
    }
}

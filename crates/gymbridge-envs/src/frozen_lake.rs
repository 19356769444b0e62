//! Grid-navigation environment over a tile map.
//!
//! States are flat row-major cell indices. An episode starts on a start
//! tile (`S`) and ends when the agent falls into a hole (`H`) or reaches
//! the goal (`G`). With slippery dynamics the executed move is drawn
//! uniformly from the intended direction and its two perpendiculars.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{EnvError, EnvResult};
use crate::render::RenderMode;
use crate::space::Space;

/// Default 4×4 layout.
pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

/// Built-in 8×8 layout.
pub const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF", "FFFHFFFG",
];

/// Steps before an episode is truncated.
const MAX_EPISODE_STEPS: u32 = 100;

const START: u8 = b'S';
const FROZEN: u8 = b'F';
const HOLE: u8 = b'H';
const GOAL: u8 = b'G';

/// Construction parameters for [`FrozenLake`].
#[derive(Debug, Clone, Default)]
pub struct FrozenLakeConfig {
    /// Render mode (recorded for diagnostics only).
    pub render_mode: RenderMode,
    /// Whether moves may slip perpendicular to the intended direction.
    pub is_slippery: bool,
    /// Custom layout rows; `None` selects the default 4×4 layout.
    pub layout: Option<Vec<String>>,
}

/// Outcome of a single grid step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStep {
    /// New cell index.
    pub observation: u32,
    /// `1.0` on reaching the goal, otherwise `0.0`.
    pub reward: f32,
    /// The agent entered a hole or the goal.
    pub terminated: bool,
    /// The episode hit its step limit.
    pub truncated: bool,
    /// Probability of the transition that was actually executed.
    pub prob: f32,
}

/// Grid-navigation environment.
#[derive(Debug, Clone)]
pub struct FrozenLake {
    rows: Vec<Vec<u8>>,
    ncols: u32,
    nrows: u32,
    is_slippery: bool,
    render_mode: RenderMode,
    state: u32,
    steps: u32,
    rng: StdRng,
}

impl FrozenLake {
    /// Action index: move left.
    pub const LEFT: u32 = 0;
    /// Action index: move down.
    pub const DOWN: u32 = 1;
    /// Action index: move right.
    pub const RIGHT: u32 = 2;
    /// Action index: move up.
    pub const UP: u32 = 3;

    /// Build an environment from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidLayout`] if a custom layout is empty,
    /// ragged, contains an unknown tile, or lacks a start or goal tile.
    pub fn new(config: FrozenLakeConfig) -> EnvResult<Self> {
        let rows: Vec<Vec<u8>> = config
            .layout
            .unwrap_or_else(|| MAP_4X4.iter().map(ToString::to_string).collect())
            .into_iter()
            .map(String::into_bytes)
            .collect();
        validate_layout(&rows)?;

        #[allow(clippy::cast_possible_truncation)]
        let (nrows, ncols) = (rows.len() as u32, rows[0].len() as u32);
        let mut env = Self {
            rows,
            ncols,
            nrows,
            is_slippery: config.is_slippery,
            render_mode: config.render_mode,
            state: 0,
            steps: 0,
            rng: StdRng::from_entropy(),
        };
        env.state = env.start_cells()[0];
        Ok(env)
    }

    /// The render mode this environment was created with.
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Whether slippery dynamics are enabled.
    #[must_use]
    pub fn is_slippery(&self) -> bool {
        self.is_slippery
    }

    /// Action space: the four move directions.
    #[must_use]
    pub fn action_space(&self) -> Space {
        Space::Discrete { n: 4 }
    }

    /// Observation space: one value per grid cell.
    #[must_use]
    pub fn observation_space(&self) -> Space {
        Space::Discrete {
            n: self.nrows * self.ncols,
        }
    }

    /// Reset to a start tile.
    ///
    /// A seed reseeds the RNG deterministically; no seed continues the
    /// current stream. Returns the initial observation and the
    /// probability of the drawn start cell.
    #[allow(clippy::cast_precision_loss)]
    pub fn reset(&mut self, seed: Option<u64>) -> (u32, f32) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let starts = self.start_cells();
        let index = if starts.len() == 1 {
            0
        } else {
            self.rng.gen_range(0..starts.len())
        };
        self.state = starts[index];
        self.steps = 0;
        (self.state, 1.0 / starts.len() as f32)
    }

    /// Advance one action.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionOutOfRange`] for actions outside `0..4`.
    pub fn step(&mut self, action: u32) -> EnvResult<GridStep> {
        if action >= 4 {
            return Err(EnvError::ActionOutOfRange { action, n: 4 });
        }
        let (executed, prob) = if self.is_slippery {
            // Intended direction or either perpendicular, 1/3 each.
            let candidates = [(action + 3) % 4, action, (action + 1) % 4];
            (candidates[self.rng.gen_range(0..3)], 1.0 / 3.0)
        } else {
            (action, 1.0)
        };
        self.state = self.neighbor(self.state, executed);
        self.steps += 1;

        let tile = self.tile(self.state);
        let terminated = tile == HOLE || tile == GOAL;
        let reward = if tile == GOAL { 1.0 } else { 0.0 };
        Ok(GridStep {
            observation: self.state,
            reward,
            terminated,
            truncated: self.steps >= MAX_EPISODE_STEPS,
            prob,
        })
    }

    fn tile(&self, cell: u32) -> u8 {
        self.rows[(cell / self.ncols) as usize][(cell % self.ncols) as usize]
    }

    #[allow(clippy::cast_possible_truncation)]
    fn start_cells(&self) -> Vec<u32> {
        self.rows
            .iter()
            .flatten()
            .enumerate()
            .filter(|&(_, &tile)| tile == START)
            .map(|(cell, _)| cell as u32)
            .collect()
    }

    fn neighbor(&self, cell: u32, action: u32) -> u32 {
        let (mut row, mut col) = (cell / self.ncols, cell % self.ncols);
        match action {
            Self::LEFT => col = col.saturating_sub(1),
            Self::DOWN => row = (row + 1).min(self.nrows - 1),
            Self::RIGHT => col = (col + 1).min(self.ncols - 1),
            _ => row = row.saturating_sub(1),
        }
        row * self.ncols + col
    }
}

fn validate_layout(rows: &[Vec<u8>]) -> EnvResult<()> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(EnvError::InvalidLayout("layout must be non-empty".into()));
    }
    let width = rows[0].len();
    if rows.iter().any(|row| row.len() != width) {
        return Err(EnvError::InvalidLayout(
            "all rows must have the same length".into(),
        ));
    }
    if let Some(&tile) = rows
        .iter()
        .flatten()
        .find(|&&tile| !matches!(tile, START | FROZEN | HOLE | GOAL))
    {
        return Err(EnvError::InvalidLayout(format!(
            "unknown tile {:?}",
            char::from(tile)
        )));
    }
    if !rows.iter().flatten().any(|&tile| tile == START) {
        return Err(EnvError::InvalidLayout("layout has no start tile".into()));
    }
    if !rows.iter().flatten().any(|&tile| tile == GOAL) {
        return Err(EnvError::InvalidLayout("layout has no goal tile".into()));
    }
    Ok(())
}

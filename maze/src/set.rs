//! Fixed collections of mazes shared by every agent run.

use std::{fmt::Display, sync::Arc};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{generate, goal_position, odd_dimension, shortest_path, Difficulty, Grid, Pos, Result};

/// Added to the running counter to obtain each maze seed
pub const SEED_OFFSET: u32 = 12345;

/// What the agent gets to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ObservationMode {
    /// A 5x5 window around the agent
    Local,
    /// The whole grid
    Global,
}

impl ObservationMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ObservationMode::Local => "local",
            ObservationMode::Global => "global",
        }
    }
}

impl Display for ObservationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of a benchmark table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkConfig {
    pub width: usize,
    pub height: usize,
    #[serde(alias = "complexity")]
    pub difficulty: Difficulty,
    #[serde(alias = "vision")]
    pub observation_mode: ObservationMode,
}

impl BenchmarkConfig {
    pub const fn new(
        width: usize,
        height: usize,
        difficulty: Difficulty,
        observation_mode: ObservationMode,
    ) -> Self {
        Self {
            width,
            height,
            difficulty,
            observation_mode,
        }
    }

    /// Dimensions of the generated grid
    #[must_use]
    pub const fn grid_shape(&self) -> [usize; 2] {
        [odd_dimension(self.width), odd_dimension(self.height)]
    }
}

/// The stock table: four sizes, three tiers, both observation modes
#[must_use]
pub fn default_configs() -> Vec<BenchmarkConfig> {
    let mut configs = Vec::with_capacity(24);
    for size in [5, 11, 21, 31] {
        for mode in [ObservationMode::Local, ObservationMode::Global] {
            for difficulty in [Difficulty::Simple, Difficulty::Complex, Difficulty::Extreme] {
                configs.push(BenchmarkConfig::new(size, size, difficulty, mode));
            }
        }
    }
    configs
}

/// A generated maze, ready to be run against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeRecord {
    /// Unique within a set, joins runs to mazes
    pub id: String,
    pub config: BenchmarkConfig,
    #[serde(rename = "maze")]
    pub grid: Arc<Grid>,
    pub seed: u32,
    /// Moves on a shortest path, `None` if the goal is unreachable
    pub optimal_path_length: Option<usize>,
}

impl MazeRecord {
    /// Generate the maze with the given counter and seed, and solve it
    pub fn generate(counter: usize, config: BenchmarkConfig, seed: u32) -> Result<Self> {
        let grid = generate(
            config.width,
            config.height,
            &config.difficulty.profile(),
            seed,
        )?;
        let optimal_path_length =
            shortest_path(&grid, Pos::START, Self::goal_of(&grid)).map(|p| p.len());
        if optimal_path_length.is_none() {
            log::warn!("Maze {counter} (seed {seed}) has no route to the goal");
        }
        Ok(Self {
            id: record_id(counter, &config, seed),
            config,
            grid: Arc::new(grid),
            seed,
            optimal_path_length,
        })
    }

    fn goal_of(grid: &Grid) -> Pos {
        goal_position(grid.width(), grid.height())
    }

    /// Where the agent has to go
    #[must_use]
    pub fn goal(&self) -> Pos {
        Self::goal_of(&self.grid)
    }
}

/// `maze_{counter}_{w}x{h}_{difficulty}_{mode}_seed{seed}`, with the requested sizes
#[must_use]
pub fn record_id(counter: usize, config: &BenchmarkConfig, seed: u32) -> String {
    format!(
        "maze_{counter}_{}x{}_{}_{}_seed{seed}",
        config.width, config.height, config.difficulty, config.observation_mode
    )
}

/// Seed of the `counter`-th maze of a set
#[inline]
#[must_use]
pub const fn seed_for(counter: usize) -> u32 {
    SEED_OFFSET.wrapping_add(counter as u32)
}

/// Counter, config and seed of every maze of a set, in output order
pub fn plan(
    configs: &[BenchmarkConfig],
    runs_per_config: usize,
) -> impl Iterator<Item = (usize, BenchmarkConfig, u32)> + '_ {
    configs
        .iter()
        .flat_map(move |cfg| std::iter::repeat(*cfg).take(runs_per_config))
        .enumerate()
        .map(|(counter, cfg)| (counter, cfg, seed_for(counter)))
}

/// Build every maze of a set
///
/// Replicas of a config are consecutive and configs keep their input order.
pub fn build_set(configs: &[BenchmarkConfig], runs_per_config: usize) -> Result<Vec<MazeRecord>> {
    let mazes = plan(configs, runs_per_config)
        .map(|(counter, cfg, seed)| MazeRecord::generate(counter, cfg, seed))
        .collect::<Result<Vec<_>>>()?;
    log::info!("Built {} mazes from {} configs", mazes.len(), configs.len());
    Ok(mazes)
}

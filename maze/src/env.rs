//! Step-by-step simulation of an agent inside a maze.
//!
//! Wall bumps cost a step, and moves after the goal was reached are no-ops.
//! The environment knows nothing about step budgets: whoever drives it
//! stops calling [`Environment::step`] when its budget runs out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Cell, Direction, Grid, MazeRecord, ObservationMode, Pos, Result};

/// Glyph marking the agent in observations
pub const AGENT_GLYPH: char = 'A';

/// Half side of the local observation window
pub const LOCAL_RADIUS: usize = 2;

/// What a move returns to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub observation: String,
    /// Whether this move reached the goal
    pub success: bool,
}

/// Final state of a run, to be paired with the optimal path length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunOutcome {
    pub steps: usize,
    pub success: bool,
}

/// `optimal / steps` for a successful run on a solvable maze, 0 otherwise
/// ```
/// use maze::{efficiency_score, RunOutcome};
///
/// let run = RunOutcome { steps: 10, success: true };
/// assert_eq!(efficiency_score(Some(8), run), 0.8);
/// assert_eq!(efficiency_score(None, run), 0.);
/// ```
#[must_use]
pub fn efficiency_score(optimal: Option<usize>, outcome: RunOutcome) -> f64 {
    match optimal {
        Some(optimal) if outcome.success && outcome.steps > 0 => {
            optimal as f64 / outcome.steps as f64
        }
        _ => 0.,
    }
}

/// A live run over one maze
#[derive(Debug, Clone)]
pub struct Environment {
    grid: Arc<Grid>,
    mode: ObservationMode,
    pos: Pos,
    steps: usize,
    done: bool,
    success: bool,
}

impl Environment {
    /// Fresh run on a benchmark maze
    pub fn new(record: &MazeRecord) -> Self {
        Self::from_grid(record.grid.clone(), record.config.observation_mode)
    }

    /// Fresh run on any grid, starting at (1,1)
    pub fn from_grid(grid: Arc<Grid>, mode: ObservationMode) -> Self {
        Self {
            grid,
            mode,
            pos: Pos::START,
            steps: 0,
            done: false,
            success: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Pos {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> ObservationMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            steps: self.steps,
            success: self.success,
        }
    }

    /// Apply one move
    ///
    /// After the goal is reached this only re-renders the observation and
    /// reports `success: false`, leaving the step count alone.
    pub fn step(&mut self, dir: Direction) -> MoveOutcome {
        if self.done {
            return MoveOutcome {
                observation: self.observe(),
                success: false,
            };
        }

        self.steps += 1;
        match self.pos.offset(dir, 1) {
            Some(next) if self.grid.is_passable(next) => self.pos = next,
            _ => log::trace!("Bumped into a wall at {} going {dir}", self.pos),
        }

        if self.grid.get(self.pos) == Some(Cell::Goal) {
            self.done = true;
            self.success = true;
            log::debug!("Goal reached in {} steps", self.steps);
        }

        MoveOutcome {
            observation: self.observe(),
            success: self.success,
        }
    }

    /// Apply a move given by name, failing on anything but up/down/left/right
    pub fn step_str(&mut self, dir: &str) -> Result<MoveOutcome> {
        Ok(self.step(dir.parse()?))
    }

    /// Render what the agent sees
    #[must_use]
    pub fn observe(&self) -> String {
        match self.mode {
            ObservationMode::Global => self.observe_global(),
            ObservationMode::Local => self.observe_local(),
        }
    }

    fn observe_global(&self) -> String {
        let mut out = String::with_capacity((self.grid.width() + 1) * self.grid.height());
        for (y, row) in self.grid.rows().enumerate() {
            if y > 0 {
                out.push('\n');
            }
            for (x, cell) in row.iter().enumerate() {
                out.push(if Pos::new(x, y) == self.pos {
                    AGENT_GLYPH
                } else {
                    cell.glyph()
                });
            }
        }
        out
    }

    fn observe_local(&self) -> String {
        let side = 2 * LOCAL_RADIUS + 1;
        let mut out = String::with_capacity((side + 1) * side);
        for dy in 0..side {
            if dy > 0 {
                out.push('\n');
            }
            for dx in 0..side {
                // out of bounds, including negative coordinates, renders as wall
                let cell = (self.pos.x + dx)
                    .checked_sub(LOCAL_RADIUS)
                    .zip((self.pos.y + dy).checked_sub(LOCAL_RADIUS))
                    .map(|(x, y)| Pos::new(x, y));
                out.push(match cell {
                    Some(p) if p == self.pos => AGENT_GLYPH,
                    Some(p) => self.grid.get(p).unwrap_or(Cell::Wall).glyph(),
                    None => Cell::Wall.glyph(),
                });
            }
        }
        out
    }
}

//! Breadth first shortest paths over the passable cells of a grid.
//!
//! The search expands neighbours in `Direction::ALL` order (up, right, down,
//! left) and each cell keeps the first cell that discovered it as parent.
//! Among several shortest paths the returned one is therefore the first one
//! found in that order. Nothing here depends on how the grid was produced, so
//! archived grids give the same answer as freshly generated ones.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{Direction, Grid, Pos};

/// A sequence of adjacent positions, from start to goal included
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Pos>);

impl Path {
    /// Number of moves, one less than the number of positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// A path of zero moves, where start and goal coincide
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Pos] {
        &self.0
    }

    /// The moves that walk this path
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.windows(2).filter_map(|w| w[0].direction_to(w[1]))
    }
}

impl From<Path> for Vec<Pos> {
    fn from(path: Path) -> Self {
        path.0
    }
}

/// Shortest path from `start` to `goal`, `None` if the goal cannot be reached
///
/// Runs in time and memory linear in the grid area. Start and goal outside
/// the grid are unreachable.
pub fn shortest_path(grid: &Grid, start: Pos, goal: Pos) -> Option<Path> {
    if !grid.contains(start) || !grid.contains(goal) {
        return None;
    }
    let [w, h] = grid.shape();
    let mut parents: Box<[Option<usize>]> = vec![None; w * h].into_boxed_slice();
    let mut visited = vec![false; w * h].into_boxed_slice();
    let mut frontier = VecDeque::new();

    visited[grid.index(start)] = true;
    frontier.push_back(start);

    while let Some(pos) = frontier.pop_front() {
        if pos == goal {
            let mut path = vec![pos];
            let mut cursor = grid.index(pos);
            while let Some(parent) = parents[cursor] {
                path.push(grid.pos(parent));
                cursor = parent;
            }
            path.reverse();
            log::trace!("Path {start} -> {goal}: {} moves", path.len() - 1);
            return Some(Path(path));
        }
        for next in grid.open_neighbours(pos) {
            let i = grid.index(next);
            if !visited[i] {
                visited[i] = true;
                parents[i] = Some(grid.index(pos));
                frontier.push_back(next);
            }
        }
    }

    log::trace!("Path {start} -> {goal}: unreachable");
    None
}

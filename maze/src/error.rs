use thiserror::Error;

/// Errors of the maze engine
///
/// Unreachable goals, wall bumps and moves after termination are regular
/// outcomes and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Requested dimensions cannot hold a start and a goal cell
    #[error("invalid maze dimensions {width}x{height}: both sides must be at least 3 after odd coercion")]
    InvalidDimensions { width: usize, height: usize },

    /// A direction string outside `up`/`down`/`left`/`right`
    #[error("invalid direction {0:?}: expected one of up, down, left, right")]
    InvalidDirection(String),

    /// A generation parameter outside [0, 1]
    #[error("invalid profile parameter {name} = {value}: must be within [0, 1]")]
    InvalidProfile { name: &'static str, value: f64 },

    /// Both secondary knobs were set on the same profile
    #[error("continuation bias and dead-end filling cannot be combined in one profile")]
    ConflictingShaping,

    /// Serialized rows that do not describe a rectangular grid of known glyphs
    #[error("malformed grid: {0}")]
    MalformedGrid(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

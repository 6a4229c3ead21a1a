use std::fmt::Display;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Named difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Simple,
    Normal,
    Complex,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Simple,
        Difficulty::Normal,
        Difficulty::Complex,
        Difficulty::Extreme,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Simple => "simple",
            Difficulty::Normal => "normal",
            Difficulty::Complex => "complex",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Generation parameters of the tier
    ///
    /// | tier    | loops | continuation bias |
    /// |---------|-------|-------------------|
    /// | simple  | 0.02  | 0.75              |
    /// | normal  | 0.01  | 0.50              |
    /// | complex | 0.005 | 0.25              |
    /// | extreme | 0     | 0                 |
    #[must_use]
    pub fn profile(self) -> Profile {
        match self {
            Difficulty::Simple => Profile {
                loop_density: 0.02,
                shaping: Shaping::ContinuationBias(0.75),
            },
            Difficulty::Normal => Profile {
                loop_density: 0.01,
                shaping: Shaping::ContinuationBias(0.5),
            },
            Difficulty::Complex => Profile {
                loop_density: 0.005,
                shaping: Shaping::ContinuationBias(0.25),
            },
            Difficulty::Extreme => Profile {
                loop_density: 0.,
                shaping: Shaping::ContinuationBias(0.),
            },
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Secondary knob of a profile
///
/// Both make a maze feel more or less open, by different means, so a profile
/// carries exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Shaping {
    /// Probability of carving on in the direction that reached the current cell.
    /// High values give long corridors, low values twisty ones.
    ContinuationBias(f64),
    /// Probability of sealing each dead end found after carving
    DeadEndFill(f64),
}

/// Numeric generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Loop attempts per grid cell
    pub loop_density: f64,
    pub shaping: Shaping,
}

impl Profile {
    /// Check that every parameter is a probability
    pub fn validate(&self) -> Result<()> {
        let (name, value) = match self.shaping {
            Shaping::ContinuationBias(v) => ("continuation_bias", v),
            Shaping::DeadEndFill(v) => ("dead_end_fill", v),
        };
        for (name, value) in [("loop_density", self.loop_density), (name, value)] {
            if !(0. ..=1.).contains(&value) {
                return Err(Error::InvalidProfile { name, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn continuation_bias(&self) -> f64 {
        match self.shaping {
            Shaping::ContinuationBias(b) => b,
            Shaping::DeadEndFill(_) => 0.,
        }
    }

    #[must_use]
    pub fn dead_end_fill(&self) -> f64 {
        match self.shaping {
            Shaping::DeadEndFill(r) => r,
            Shaping::ContinuationBias(_) => 0.,
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Difficulty::Normal.profile()
    }
}

impl From<Difficulty> for Profile {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.profile()
    }
}

/// Partial overrides on top of a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Args, Default)]
pub struct PartialProfile {
    /// Loop attempts per grid cell
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_density: Option<f64>,
    /// Probability of carving straight on
    #[clap(long, conflicts_with = "dead_end_fill")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_bias: Option<f64>,
    /// Probability of sealing each dead end
    #[clap(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_end_fill: Option<f64>,
}

impl PartialProfile {
    /// Overlay `other` on `self`, values in `other` win
    ///
    /// A secondary knob set in `other` replaces the one in `self`, so the
    /// result never carries both unless `other` itself does.
    pub fn merge(self, other: PartialProfile) -> Self {
        let secondary_overridden =
            other.continuation_bias.is_some() || other.dead_end_fill.is_some();
        Self {
            loop_density: other.loop_density.or(self.loop_density),
            continuation_bias: if secondary_overridden {
                other.continuation_bias
            } else {
                self.continuation_bias
            },
            dead_end_fill: if secondary_overridden {
                other.dead_end_fill
            } else {
                self.dead_end_fill
            },
        }
    }

    /// Fill in the gaps from a tier and validate the result
    pub fn resolve(self, difficulty: Difficulty) -> Result<Profile> {
        let base = difficulty.profile();
        let shaping = match (self.continuation_bias, self.dead_end_fill) {
            (Some(_), Some(_)) => return Err(Error::ConflictingShaping),
            (Some(bias), None) => Shaping::ContinuationBias(bias),
            (None, Some(ratio)) => Shaping::DeadEndFill(ratio),
            (None, None) => base.shaping,
        };
        let profile = Profile {
            loop_density: self.loop_density.unwrap_or(base.loop_density),
            shaping,
        };
        profile.validate()?;
        Ok(profile)
    }
}

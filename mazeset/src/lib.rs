//! Benchmark set files: building, archiving and re-analysing them.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    panic,
};

use serde::{Deserialize, Serialize};

use maze::{
    efficiency_score, set::plan, shortest_path, BenchmarkConfig, Difficulty, MazeRecord, Pos,
    RunOutcome,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A set of mazes, as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSet {
    /// Version of the tool that built the set
    pub version: String,
    pub runs_per_config: usize,
    pub mazes: Vec<MazeRecord>,
}

impl BenchmarkSet {
    pub fn build(configs: &[BenchmarkConfig], runs_per_config: usize) -> maze::Result<Self> {
        Ok(Self {
            version: VERSION.to_owned(),
            runs_per_config,
            mazes: maze::build_set(configs, runs_per_config)?,
        })
    }

    /// Same as [`BenchmarkSet::build`], with one task per maze
    pub async fn build_async(
        configs: &[BenchmarkConfig],
        runs_per_config: usize,
    ) -> maze::Result<Self> {
        let tasks: Vec<_> = plan(configs, runs_per_config)
            .map(|(counter, cfg, seed)| {
                tokio::spawn(async move {
                    log::debug!("Generating maze {counter}");
                    MazeRecord::generate(counter, cfg, seed)
                })
            })
            .collect();
        let mut mazes = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(res) => mazes.push(res?),
                Err(err) => panic::resume_unwind(err.into_panic()),
            }
        }
        log::info!("Built {} mazes from {} configs", mazes.len(), configs.len());
        Ok(Self {
            version: VERSION.to_owned(),
            runs_per_config,
            mazes,
        })
    }

    pub fn write(&self, writer: impl io::Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Buffered [`BenchmarkSet::write`], flushing before returning
    pub fn save(&self, writer: impl io::Write) -> io::Result<()> {
        let mut out = io::BufWriter::new(writer);
        self.write(&mut out)?;
        out.flush()
    }

    pub fn read(reader: impl io::Read) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    /// Records whose stored optimal length disagrees with a fresh search
    pub fn verify(&self) -> Vec<&MazeRecord> {
        self.mazes
            .iter()
            .filter(|m| {
                let found = shortest_path(&m.grid, Pos::START, m.goal()).map(|p| p.len());
                if found != m.optimal_path_length {
                    log::warn!(
                        "{}: stored {:?}, recomputed {:?}",
                        m.id,
                        m.optimal_path_length,
                        found
                    );
                }
                found != m.optimal_path_length
            })
            .collect()
    }

    /// Number of mazes per difficulty tier
    pub fn by_difficulty(&self) -> BTreeMap<Difficulty, usize> {
        let mut counts = BTreeMap::new();
        for m in &self.mazes {
            *counts.entry(m.config.difficulty).or_default() += 1;
        }
        counts
    }
}

/// Aggregate figures over a batch of runs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub runs: usize,
    pub successes: usize,
    /// In [0, 1]
    pub success_rate: f64,
    /// Over every run, failed ones included
    pub mean_steps: f64,
    /// Over successful runs with a positive score
    pub mean_efficiency: f64,
    /// `success_rate * mean_efficiency * 100`
    pub composite: f64,
}

impl Summary {
    /// Summarize runs given as (optimal path length, outcome) pairs
    /// ```
    /// use maze::RunOutcome;
    /// use mazeset::Summary;
    ///
    /// let runs = [
    ///     (Some(4), RunOutcome { steps: 8, success: true }),
    ///     (Some(4), RunOutcome { steps: 20, success: false }),
    /// ];
    /// let summary = Summary::from_runs(&runs);
    /// assert_eq!(summary.success_rate, 0.5);
    /// assert_eq!(summary.mean_steps, 14.);
    /// assert_eq!(summary.composite, 25.);
    /// ```
    pub fn from_runs(runs: &[(Option<usize>, RunOutcome)]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let successes = runs.iter().filter(|(_, o)| o.success).count();
        let total_steps: usize = runs.iter().map(|(_, o)| o.steps).sum();
        let scores: Vec<f64> = runs
            .iter()
            .filter(|(_, o)| o.success)
            .map(|(optimal, o)| efficiency_score(*optimal, *o))
            .filter(|s| *s > 0.)
            .collect();
        let mean_efficiency = if scores.is_empty() {
            0.
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let success_rate = successes as f64 / runs.len() as f64;
        Self {
            runs: runs.len(),
            successes,
            success_rate,
            mean_steps: total_steps as f64 / runs.len() as f64,
            mean_efficiency,
            composite: success_rate * mean_efficiency * 100.,
        }
    }
}

use std::{fs::read_to_string, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use simple_logger::SimpleLogger;

use maze::{generate, goal_position, shortest_path, Cell, Difficulty, PartialProfile, Pos};

#[derive(Debug, Parser)]
struct Args {
    /// Configuration file with profile overrides
    #[clap(short)]
    config: Option<PathBuf>,
    /// Width of the maze, rounded up to odd
    #[clap(short = 'W', long, default_value = "21")]
    width: usize,
    /// Height of the maze, rounded up to odd
    #[clap(short = 'H', long, default_value = "21")]
    height: usize,
    /// Difficulty tier the profile starts from
    #[clap(short, long, value_enum, default_value = "normal")]
    difficulty: Difficulty,
    /// Seed of the maze
    #[clap(short, long, default_value = "12345")]
    seed: u32,
    /// Overlay the shortest path
    #[clap(long)]
    solve: bool,
    /// Overrides on top of the config file
    #[clap(flatten)]
    profile: PartialProfile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Config {
    profile: PartialProfile,
}

const PATH_GLYPH: char = '.';

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .without_timestamps()
        .with_level(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .env()
        .init()
        .context("While initializing logging")?;

    let Args {
        config,
        width,
        height,
        difficulty,
        seed,
        solve,
        profile,
    } = Args::parse();
    let config: Config = config
        .map(|path| {
            read_to_string(path)
                .context("Cannot read config file")
                .and_then(|s| toml::from_str(&s).context("Cannot parse config file"))
        })
        .transpose()
        .context("While loading configs")?
        .unwrap_or_default();
    let profile = config
        .profile
        .merge(profile)
        .resolve(difficulty)
        .context("While resolving the profile")?;

    let grid = generate(width, height, &profile, seed).context("While generating the maze")?;
    let [w, h] = grid.shape();
    let path = shortest_path(&grid, Pos::START, goal_position(w, h));

    let mut rows: Vec<Vec<char>> = grid
        .rows()
        .map(|row| row.iter().map(|c| c.glyph()).collect())
        .collect();
    if solve {
        for pos in path.iter().flat_map(|p| p.positions()) {
            if grid.get(*pos) == Some(Cell::Floor) {
                rows[pos.y][pos.x] = PATH_GLYPH;
            }
        }
    }

    println!("{w}x{h} {difficulty} seed {seed} ({profile:?})");
    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }
    match path {
        Some(path) => println!("Shortest path: {} moves", path.len()),
        None => println!("Goal unreachable"),
    }
    Ok(())
}

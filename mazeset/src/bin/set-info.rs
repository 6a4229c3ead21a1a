use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter::Info;
use simple_logger::SimpleLogger;

use mazeset::BenchmarkSet;

#[derive(Parser)]
struct Args {
    /// File to show info for
    infile: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let Args { infile } = Args::parse();
    SimpleLogger::new()
        .without_timestamps()
        .with_level(Info)
        .env()
        .init()
        .context("While initializing logging")?;
    let set = BenchmarkSet::read(BufReader::new(
        File::open(&infile).context("Cannot open input file")?,
    ))
    .context("Cannot parse benchmark set")?;

    println!("File: {}", infile.to_string_lossy());
    println!("Built by version: {}", set.version);
    println!("Runs per config: {}", set.runs_per_config);
    println!("Total mazes: {}", set.mazes.len());
    for (difficulty, count) in set.by_difficulty() {
        println!("  {difficulty}: {count}");
    }
    let unreachable = set
        .mazes
        .iter()
        .filter(|m| m.optimal_path_length.is_none())
        .count();
    println!("Unreachable goals: {unreachable}");

    let mismatched = set.verify();
    if mismatched.is_empty() {
        println!("Optimal path lengths: verified");
    } else {
        println!("Optimal path lengths: {} mismatched", mismatched.len());
        for m in mismatched {
            println!("  {}", m.id);
        }
    }

    Ok(())
}

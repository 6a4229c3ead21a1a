use std::{
    fs::{read_to_string, File},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter::Info;
use serde::Deserialize;
use simple_logger::SimpleLogger;

use maze::{set::default_configs, BenchmarkConfig};
use mazeset::BenchmarkSet;

#[derive(Parser)]
struct Args {
    /// Mazes to generate for each config
    #[clap(long, short, default_value = "1")]
    runs: usize,
    /// TOML file with the list of configs, the stock table if missing
    #[clap(long, short)]
    config: Option<PathBuf>,
    /// Generate mazes on all cores
    #[clap(long, short)]
    parallel: bool,
    outfile: PathBuf,
}

#[derive(Deserialize)]
struct ConfigFile {
    configs: Vec<BenchmarkConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Args {
        runs,
        config,
        parallel,
        outfile,
    } = Args::parse();
    SimpleLogger::new()
        .without_timestamps()
        .with_level(Info)
        .env()
        .init()
        .context("While initializing logging")?;

    let configs = match config {
        Some(path) => {
            let src = read_to_string(&path)
                .with_context(|| format!("Cannot read {}", path.to_string_lossy()))?;
            toml::from_str::<ConfigFile>(&src)
                .context("Cannot parse config file")?
                .configs
        }
        None => default_configs(),
    };

    let set = if parallel {
        BenchmarkSet::build_async(&configs, runs).await
    } else {
        BenchmarkSet::build(&configs, runs)
    }
    .context("While building the set")?;

    set.save(File::create(&outfile).context("Cannot create output file")?)
        .context("While writing the set")?;
    log::info!(
        "Wrote {} mazes to {}",
        set.mazes.len(),
        outfile.to_string_lossy()
    );
    Ok(())
}

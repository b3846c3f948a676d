use anyhow::Context;
use clap::Parser;
use weather_aggregator::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("weather aggregation failed")
}

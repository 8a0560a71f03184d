use anyhow::Context;
use clap::Parser;
use station_loader::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("station-loader failed")
}

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "station-loader")]
#[command(about = "Load weather station observations into SQLite and summarize them by year")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Database file [default: <instance_dir>/<database> from settings]"
    )]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the station_data and station_summary tables
    InitDb,

    /// Load station observation files from a directory
    Ingest {
        #[arg(
            short,
            long,
            help = "Data directory to load from [default: ./data or settings data_dir]"
        )]
        dir: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Rows per merge statement [default: 999 or settings chunk_size]"
        )]
        chunk_size: Option<usize>,
    },

    /// Recompute yearly summaries from the loaded observations
    Summarize,

    /// List daily observations as JSON
    Weather {
        #[arg(short, long)]
        station_id: Option<String>,

        #[arg(short, long, help = "Observation date (YYYY-MM-DD)")]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// List yearly summaries as JSON
    Summary {
        #[arg(short, long)]
        station_id: Option<String>,

        #[arg(short, long)]
        year: Option<i32>,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(long, default_value = "0")]
        offset: u32,
    },
}

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::processors::{Ingestor, Summarizer};
use crate::settings::Settings;
use crate::store::{StationDataQuery, Store, SummaryQuery};
use crate::utils::progress::ProgressReporter;
use chrono::Utc;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    let settings = Settings::load()?;
    let database = match cli.database {
        Some(path) => path,
        None => settings.database_path()?,
    };

    match cli.command {
        Commands::InitDb => {
            println!("Creating database {}", database.display());
            Store::open_initialized(&database)?;
            println!("Database ready");
        }

        Commands::Ingest { dir, chunk_size } => {
            let dir = dir.unwrap_or_else(|| settings.data_dir.clone());
            let chunk_size = chunk_size.unwrap_or(settings.chunk_size);

            println!("Starting ingestion {}", Utc::now());
            println!("Data directory: {}", dir.display());
            println!("Chunk size: {}", chunk_size);

            let mut store = Store::open_initialized(&database)?;
            // Debug logging interleaves badly with the bar, so verbose runs go without it
            let progress = ProgressReporter::new(0, "Loading station files...", cli.verbose);

            let report = Ingestor::new()
                .with_chunk_size(chunk_size)
                .ingest_directory(&mut store, &dir, Some(&progress))?;

            progress.finish_with_message(&format!("Loaded {} files", report.files_loaded));

            println!("\n{}", report.summary());
            println!("Finished ingestion {}.", Utc::now());
            println!(
                "Touched {} rows in upsert. All rows may not be inserts",
                report.rows_touched
            );
        }

        Commands::Summarize => {
            println!("Starting summarizing at {}", Utc::now());

            let mut store = Store::open_initialized(&database)?;
            let progress = ProgressReporter::new_spinner("Summarizing stations...", cli.verbose);
            let touched = Summarizer::new()
                .with_chunk_size(settings.chunk_size)
                .summarize(&mut store)?;
            progress.finish_with_message("Summaries updated");

            println!("Finished summarizing at {}", Utc::now());
            println!("Touched {} rows.", touched);
        }

        Commands::Weather {
            station_id,
            date,
            limit,
            offset,
        } => {
            let store = Store::open_initialized(&database)?;
            let query = StationDataQuery {
                station_id,
                date,
                limit,
                offset,
            };
            let rows = store.list_station_data(&query)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }

        Commands::Summary {
            station_id,
            year,
            limit,
            offset,
        } => {
            let store = Store::open_initialized(&database)?;
            let query = SummaryQuery {
                station_id,
                year,
                limit,
                offset,
            };
            let rows = store.list_station_summaries(&query)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

/// Send `tracing` output to stderr, or to `log_file` when given.
fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // A subscriber may already be installed when run is called more than once
    let _ = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    Ok(())
}

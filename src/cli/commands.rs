use std::io::IsTerminal;
use std::path::Path;
use std::time::Instant;

use tracing::{error, info};

use crate::api::{self, AppState};
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::db::Database;
use crate::error::{PipelineError, Result};
use crate::processors::{StatsAggregator, WeatherIngestor, YieldIngestor};
use crate::utils::logging::{init_logging, LoggingOptions};
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(&LoggingOptions {
        verbose: cli.verbose,
        json: cli.json,
        log_file: cli.log_file.as_deref(),
    })?;

    let settings = Settings::load(cli.config.as_deref())?.with_database_url(cli.database_url);
    let silent = cli.json || !std::io::stderr().is_terminal();

    match cli.command {
        Commands::InitDb => {
            let db = open_database(&settings).await?;
            db.migrate().await?;
            db.close().await;
        }

        Commands::ResetDb => {
            let db = open_database(&settings).await?;
            db.reset().await?;
            db.close().await;
        }

        Commands::Ingest {
            wx_dir,
            yld_dir,
            reset,
        } => {
            ingest_all(&settings, &wx_dir, &yld_dir, reset, silent).await?;
        }

        Commands::IngestWeather { input_dir } => {
            let db = open_database(&settings).await?;
            db.migrate().await?;
            ingest_weather(&db, &settings, &input_dir, silent).await?;
            db.close().await;
        }

        Commands::IngestYield { input_dir } => {
            let db = open_database(&settings).await?;
            db.migrate().await?;
            ingest_yield(&db, &input_dir, silent).await?;
            db.close().await;
        }

        Commands::Analyze => {
            let db = open_database(&settings).await?;
            db.migrate().await?;
            analyze(&db, &settings).await?;
            db.close().await;
        }

        Commands::Serve { listen } => {
            let settings = settings.with_listen_addr(listen);
            let db = open_database(&settings).await?;
            db.migrate().await?;
            api::serve(AppState::new(db.clone()), &settings.listen_addr).await?;
            db.close().await;
        }

        Commands::Info => {
            let db = open_database(&settings).await?;
            db.migrate().await?;
            let summary = db.summary().await?;
            println!("Database: {}", settings.database_url);
            println!("{}", summary.summary());
            db.close().await;
        }
    }

    Ok(())
}

async fn open_database(settings: &Settings) -> Result<Database> {
    info!(database_url = %settings.database_url, "Opening database");
    Database::connect_with(&settings.database_url, settings.max_connections).await
}

/// Weather then crop yield. A failed stage is logged and the other still
/// runs; the command fails if either stage did.
async fn ingest_all(
    settings: &Settings,
    wx_dir: &Path,
    yld_dir: &Path,
    reset: bool,
    silent: bool,
) -> Result<()> {
    let start = Instant::now();
    info!(
        reset,
        wx_dir = %wx_dir.display(),
        yld_dir = %yld_dir.display(),
        "Data ingestion started"
    );

    let db = open_database(settings).await?;
    if reset {
        info!("Dropping existing tables (--reset)");
        db.reset().await?;
    } else {
        db.migrate().await?;
    }

    let mut failed = Vec::new();

    if let Err(e) = ingest_weather(&db, settings, wx_dir, silent).await {
        error!(error = %e, "Weather data ingestion failed");
        failed.push("weather");
    }

    if let Err(e) = ingest_yield(&db, yld_dir, silent).await {
        error!(error = %e, "Crop yield data ingestion failed");
        failed.push("crop yield");
    }

    db.close().await;
    let elapsed = start.elapsed().as_secs_f64();

    if failed.is_empty() {
        info!(duration_secs = elapsed, "Data ingestion completed successfully");
        Ok(())
    } else {
        error!(duration_secs = elapsed, "Data ingestion completed with errors");
        Err(PipelineError::IngestionFailed {
            stages: failed.join(", "),
        })
    }
}

async fn ingest_weather(
    db: &Database,
    settings: &Settings,
    input_dir: &Path,
    silent: bool,
) -> Result<()> {
    info!(input_dir = %input_dir.display(), "Ingesting weather data...");
    let start = Instant::now();
    let progress = ProgressReporter::new(0, "Ingesting weather stations...", silent);

    let report = WeatherIngestor::new(db.clone())
        .with_batch_size(settings.observation_batch_size)
        .ingest_directory(input_dir, Some(&progress))
        .await?;

    let elapsed = start.elapsed().as_secs_f64();
    info!(
        records = report.records_inserted,
        stations = report.stations_ingested,
        skipped = report.stations_skipped,
        rejected = report.files_rejected,
        malformed = report.malformed_lines,
        duration_secs = elapsed,
        "Weather data ingestion completed"
    );
    if report.records_inserted > 0 && elapsed > 0.0 {
        info!(
            "Rate: {:.0} records/second",
            report.records_inserted as f64 / elapsed
        );
    }
    progress.println(&report.summary());

    Ok(())
}

async fn ingest_yield(db: &Database, input_dir: &Path, silent: bool) -> Result<()> {
    info!(input_dir = %input_dir.display(), "Ingesting crop yield data...");
    let start = Instant::now();
    let progress = ProgressReporter::new(0, "Ingesting crop yield files...", silent);

    let report = YieldIngestor::new(db.clone())
        .ingest_directory(input_dir, Some(&progress))
        .await?;

    info!(
        records = report.records_inserted,
        duplicates = report.duplicates,
        malformed = report.malformed_lines,
        duration_secs = start.elapsed().as_secs_f64(),
        "Crop yield data ingestion completed"
    );
    progress.println(&report.summary());

    Ok(())
}

async fn analyze(db: &Database, settings: &Settings) -> Result<()> {
    info!("Computing yearly per-station statistics...");
    let start = Instant::now();

    let report = StatsAggregator::new(db.clone())
        .with_batch_size(settings.stats_batch_size)
        .run()
        .await?;

    info!(
        rows = report.rows_upserted,
        inserted = report.inserted,
        updated = report.updated,
        duration_secs = start.elapsed().as_secs_f64(),
        "Analysis complete"
    );

    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{DEFAULT_WX_DATA_DIR, DEFAULT_YLD_DATA_DIR};

#[derive(Parser)]
#[command(name = "weather-store")]
#[command(about = "Weather observation and crop-yield ingestion, yearly station statistics and read API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "DATABASE_URL",
        help = "Database connection string [default: sqlite://weather.db]"
    )]
    pub database_url: Option<String>,

    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create tables and indexes
    InitDb,

    /// Drop and recreate all tables
    ResetDb,

    /// Ingest weather and crop-yield data, weather first
    Ingest {
        #[arg(long, default_value = DEFAULT_WX_DATA_DIR, help = "Weather station files directory")]
        wx_dir: PathBuf,

        #[arg(long, default_value = DEFAULT_YLD_DATA_DIR, help = "Crop yield files directory")]
        yld_dir: PathBuf,

        #[arg(long, help = "Drop and recreate tables before ingesting")]
        reset: bool,
    },

    /// Ingest weather station files only
    IngestWeather {
        #[arg(short, long, default_value = DEFAULT_WX_DATA_DIR)]
        input_dir: PathBuf,
    },

    /// Ingest crop yield files only
    IngestYield {
        #[arg(short, long, default_value = DEFAULT_YLD_DATA_DIR)]
        input_dir: PathBuf,
    },

    /// Compute yearly per-station statistics
    Analyze,

    /// Serve the read API
    Serve {
        #[arg(short, long, help = "Listen address [default: 0.0.0.0:5000]")]
        listen: Option<String>,
    },

    /// Show row counts and observation date range
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ingest_defaults() {
        let cli = Cli::try_parse_from(["weather-store", "ingest", "--reset"]).unwrap();
        match cli.command {
            Commands::Ingest {
                wx_dir,
                yld_dir,
                reset,
            } => {
                assert_eq!(wx_dir, PathBuf::from("data/wx_data"));
                assert_eq!(yld_dir, PathBuf::from("data/yld_data"));
                assert!(reset);
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "weather-store",
            "serve",
            "--listen",
            "127.0.0.1:8080",
            "--database-url",
            "sqlite://test.db",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.database_url.as_deref(), Some("sqlite://test.db"));
        assert!(matches!(cli.command, Commands::Serve { listen: Some(_) }));
    }
}

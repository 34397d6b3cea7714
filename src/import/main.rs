//! Parking space import tool.
//!
//! Parses nodes marked as amenity=parking_space and hands them to the
//! graph correlation stage.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use parking_spaces::pipeline::process_parking_spaces_with_progress;
use parking_spaces::{Config, ExtractOutcome, SummaryCorrelator};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "import_parking_spaces", version, disable_version_flag = true)]
#[command(
    about = "Parse nodes marked as amenity=parking_space and correlate them to a routing graph"
)]
struct Args {
    /// Input OSM PBF file
    #[arg(value_name = "INPUT_OSM_FILE")]
    input: PathBuf,

    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inline JSON config
    #[arg(short, long)]
    inline_config: Option<String>,

    /// Print the version of this software
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn load_config(args: &Args) -> Result<Config> {
    match (&args.inline_config, &args.config) {
        (Some(json), _) => Config::from_inline_json(json),
        (None, Some(path)) => Config::load_from_file(path),
        (None, None) => anyhow::bail!("Configuration is required: use --config or --inline-config"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.mjolnir.logging.level))
        .context("Invalid log level")?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Parking space import");
    info!("File: {}", args.input.display());

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} nodes ({per_sec})")?,
    );
    progress.enable_steady_tick(Duration::from_millis(200));

    let outcome =
        process_parking_spaces_with_progress(&config, &args.input, &SummaryCorrelator, &progress)?;

    match outcome {
        ExtractOutcome::Empty { sequence } => {
            info!("Left empty sequence at {}", sequence.display());
        }
        ExtractOutcome::Correlated { sequence, count } => {
            info!(
                "Handed {} parking spaces in {} to the correlator",
                count,
                sequence.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_version_flags() {
        for flag in ["-v", "--version"] {
            let err = Args::try_parse_from(["import_parking_spaces", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayVersion, "flag {}", flag);
        }
    }

    #[test]
    fn test_parse_options() {
        let args = Args::try_parse_from([
            "import_parking_spaces",
            "-c",
            "valhalla.json",
            "-i",
            r#"{"mjolnir":{"tile_dir":"/tmp/tiles"}}"#,
            "map.osm.pbf",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("map.osm.pbf"));

        // inline config wins over the file
        let config = load_config(&args).unwrap();
        assert_eq!(config.tile_dir().unwrap(), std::path::Path::new("/tmp/tiles"));
    }

    #[test]
    fn test_config_required() {
        let args = Args::try_parse_from(["import_parking_spaces", "map.osm.pbf"]).unwrap();
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["import_parking_spaces"]).is_err());
    }
}

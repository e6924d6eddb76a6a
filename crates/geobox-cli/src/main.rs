//! Command line front-end for geobox grid algebra.
//!
//! Every subcommand prints JSON on stdout; logs go to stderr.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{parse_pair, Reconcile};
use geobox::ReprojectOptions;

#[derive(Parser, Debug)]
#[command(name = "geobox")]
#[command(about = "Build, reconcile and reproject georeferenced pixel grids", long_about = None)]
struct Cli {
    /// Log filter directive (e.g. debug, geobox=trace)
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the smallest grid covering a GeoJSON geometry
    FromGeojson {
        /// GeoJSON geometry or feature file
        #[arg(short, long)]
        input: PathBuf,

        /// CRS of the input coordinates
        #[arg(long, env = "GEOBOX_CRS", default_value = "EPSG:4326")]
        crs: String,

        /// Pixel size as Y,X (Y usually negative)
        #[arg(short, long, value_parser = parse_pair, allow_hyphen_values = true)]
        resolution: (f64, f64),

        /// Build the grid in this CRS instead of the input CRS
        #[arg(long)]
        to_crs: Option<String>,

        /// Sub-pixel alignment as Y,X, each in [0, |res|]
        #[arg(long, value_parser = parse_pair)]
        align: Option<(f64, f64)>,
    },

    /// Smallest grid covering all grids in a YAML list
    Union {
        /// YAML file with a list of {width, height, affine, crs}
        #[arg(short, long)]
        grids: PathBuf,
    },

    /// Largest grid contained in all grids of a YAML list
    Intersect {
        /// YAML file with a list of {width, height, affine, crs}
        #[arg(short, long)]
        grids: PathBuf,
    },

    /// Reproject a GeoJSON geometry
    Reproject {
        /// GeoJSON geometry or feature file
        #[arg(short, long)]
        input: PathBuf,

        /// Source CRS
        #[arg(long, default_value = "EPSG:4326")]
        from: String,

        /// Target CRS
        #[arg(long)]
        to: String,

        /// Maximum edge length in source units before transforming
        #[arg(long)]
        resolution: Option<f64>,

        /// Split at the antimeridian when the target is geographic
        #[arg(long)]
        wrap_dateline: bool,
    },
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(command = ?cli.command, "Running");

    let output = match cli.command {
        Commands::FromGeojson {
            input,
            crs,
            resolution,
            to_crs,
            align,
        } => {
            let spec =
                commands::from_geojson(&input, &crs, resolution, to_crs.as_deref(), align)?;
            serde_json::to_value(spec)?
        }
        Commands::Union { grids } => {
            let grids = commands::load_grids(&grids)?;
            serde_json::to_value(commands::reconcile(&grids, Reconcile::Union)?)?
        }
        Commands::Intersect { grids } => {
            let grids = commands::load_grids(&grids)?;
            serde_json::to_value(commands::reconcile(&grids, Reconcile::Intersection)?)?
        }
        Commands::Reproject {
            input,
            from,
            to,
            resolution,
            wrap_dateline,
        } => {
            let options = ReprojectOptions {
                resolution,
                wrap_dateline,
            };
            commands::reproject(&input, &from, &to, &options)?
        }
    };

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output);
    }
    Ok(())
}

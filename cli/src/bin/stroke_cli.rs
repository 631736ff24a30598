use clap::{Parser, Subcommand};
use cli::{RunConfig, trace_file};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace a stroke image into polygons
    Trace {
        /// Path to the input PNG
        #[arg(short, long)]
        input: PathBuf,
        /// Directory for the GeoJSON and images
        #[arg(short, long)]
        output_dir: PathBuf,
        /// TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write the polygon debug view
        #[arg(long)]
        debug_polygons: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Trace {
            input,
            output_dir,
            config,
            debug_polygons,
        } => {
            trace(input, output_dir, config.as_deref(), *debug_polygons)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&RunConfig::schema())?);
        }
    }

    Ok(())
}

fn trace(input: &Path, output_dir: &Path, config_path: Option<&Path>, debug_polygons: bool) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    config.output.debug_polygons |= debug_polygons;

    info!("Tracing {:?}", input);
    let report = trace_file(input, output_dir, &config)?;
    let summary = report.summary;

    if summary.polygons() == 0 {
        warn!("No polygons found in {:?}", input);
    }
    info!(
        outer = summary.outer,
        holes = summary.holes,
        discarded_regions = summary.discarded_regions,
        spur_cells = summary.spur_cells,
        lowest_row = ?summary.lowest_row,
        vertices = report.outline.vertex_count(),
        "Stroke traced"
    );
    Ok(())
}

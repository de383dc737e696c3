mod analysis;
mod conditions;
mod report;

use std::error::Error;
use std::path::PathBuf;

use analysis::run_analysis;
use clap::Parser;
use conditions::{demo_triangle, load_model};
use log::info;
use report::render_summary;
use truss2d::SolverOptions;

/// Analyse a plane pin-jointed truss.
#[derive(Debug, Parser)]
#[command(name = "truss2d", version, about)]
struct Cli {
    /// JSON model to analyse; the demonstration triangle is used when omitted.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Print the full results as JSON instead of a text report.
    #[arg(long)]
    json: bool,
    /// Relative LU pivot below which the structure is reported as unstable.
    #[arg(long, default_value_t = SolverOptions::default().pivot_tolerance)]
    pivot_tolerance: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let model = match &cli.model {
        Some(path) => {
            info!("reading model from {}", path.display());
            load_model(path)?
        }
        None => demo_triangle()?,
    };

    let options = SolverOptions {
        pivot_tolerance: cli.pivot_tolerance,
    };
    let summary = run_analysis(&model, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary.results)?);
    } else {
        println!("{}", render_summary(&summary));
    }

    Ok(())
}

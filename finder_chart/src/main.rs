use anyhow::{Context, Result};
use clap::Parser;

use finder_chart::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve().context("Failed to resolve chart configuration")?;

    common::setup_logging(&config.log_level, config.log_dir.as_deref())?;
    tracing::info!(
        "Finder chart for {} ({}' field, {})",
        config.target,
        config.fov_arcmin,
        config.survey
    );

    let summary = finder_chart::run(&config)
        .with_context(|| format!("Failed to build chart {}", config.output.display()))?;

    tracing::info!(
        "Saved {} ({}x{} px, {} RA / {} Dec ticks)",
        summary.output.display(),
        summary.canvas_size.0,
        summary.canvas_size.1,
        summary.x_tick_count,
        summary.y_tick_count
    );

    Ok(())
}

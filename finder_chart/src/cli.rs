use std::path::PathBuf;

use clap::Parser;

use crate::config::{ChartConfig, Projection};
use crate::error::Result;

/// Render an inverted sky survey finder chart.
#[derive(Debug, Default, Parser)]
#[command(name = "finder-chart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render an inverted DSS finder chart with RA/Dec labels and a compass")]
pub struct Cli {
    /// YAML or JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chart centre, e.g. "02h20m30s +57d07m00s" or "35.125 57.1167"
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Field of view in arcminutes
    #[arg(long)]
    pub fov_arcmin: Option<f64>,

    /// SkyView survey name
    #[arg(long)]
    pub survey: Option<String>,

    /// Cutout size in pixels per axis
    #[arg(long)]
    pub pixels: Option<u32>,

    /// Read the cutout from a local FITS file instead of SkyView
    #[arg(long)]
    pub input_fits: Option<PathBuf>,

    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    /// How tick positions map to sky coordinates
    #[arg(long, value_enum)]
    pub projection: Option<Projection>,

    /// HTTP timeout for the survey request
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log filter, e.g. "info" or "finder_chart=debug"; RUST_LOG takes precedence
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: flags, then the config file, then defaults.
    ///
    /// Validation runs once, after flags are applied, so a flag can replace
    /// an invalid value from the file.
    pub fn resolve(&self) -> Result<ChartConfig> {
        let base: ChartConfig = match &self.config {
            Some(path) => common::load_from_file(path)?,
            None => ChartConfig::default(),
        };

        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, mut config: ChartConfig) -> ChartConfig {
        if let Some(target) = &self.target {
            config.target = target.clone();
        }
        if let Some(fov) = self.fov_arcmin {
            config.fov_arcmin = fov;
        }
        if let Some(survey) = &self.survey {
            config.survey = survey.clone();
        }
        if let Some(pixels) = self.pixels {
            config.pixels = pixels;
        }
        if let Some(path) = &self.input_fits {
            config.input_fits = Some(path.clone());
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(projection) = self.projection {
            config.projection = projection;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

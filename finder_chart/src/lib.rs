//! Finder charts from sky survey cutouts.
//!
//! A cutout is fetched (or read from disk), photometrically inverted so that
//! stars are dark on a light sky, and drawn with sexagesimal RA/Dec tick
//! labels, a N/E compass and a field-of-view caption. The figure is trimmed
//! to its content and saved as a PNG.

pub mod cli;
pub mod config;
mod error;
pub mod layout;
pub mod mapping;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod ticks;

pub use cli::Cli;
pub use config::{ChartConfig, FigureConfig, Projection};
pub use error::{ChartError, Result};
pub use pipeline::{ChartSummary, PreparedChart, prepare, run, run_with_source};

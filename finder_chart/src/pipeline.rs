//! Fetch, invert, lay out, render and save a finder chart.

use std::path::PathBuf;
use std::time::Instant;

use skysurvey::{FitsFileSource, ImageSource, IntensityGrid, SkyViewClient, SurveyImage};

use crate::config::ChartConfig;
use crate::error::Result;
use crate::layout::{ChartContent, ChartLayout, LayoutStyle, TextMeasure, fit_axes};
use crate::mapping::CoordinateMapping;
use crate::output::write_png;
use crate::render::{FontMeasure, render_chart};
use crate::ticks::{TickLocator, X_LABEL_FACTOR, Y_LABEL_FACTOR, dec_ticks, ra_ticks};

/// Everything needed to draw the chart, before any pixel is touched.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub inverted: IntensityGrid,
    /// Upper end of the display stretch; the lower end is 0
    pub vmax: f64,
    pub mapping: CoordinateMapping,
    pub layout: ChartLayout,
    pub x_tick_count: usize,
    pub y_tick_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSummary {
    pub output: PathBuf,
    pub image_size: (usize, usize),
    pub canvas_size: (u32, u32),
    pub x_tick_count: usize,
    pub y_tick_count: usize,
}

/// Invert the cutout and compute the full chart layout.
pub fn prepare(
    config: &ChartConfig,
    image: &SurveyImage,
    measure: &dyn TextMeasure,
) -> Result<PreparedChart> {
    let center = config.target()?;
    let fov = config.field_of_view()?;
    let (width, height) = (image.grid.width(), image.grid.height());

    let inverted = image.grid.inverted();
    let vmax = inverted.extrema().map_or(0.0, |(_, max)| max);
    match image.grid.extrema() {
        Some((min, max)) => tracing::info!(
            "Intensity range [{}, {}], display stretch [0, {}]",
            min,
            max,
            vmax
        ),
        None => tracing::warn!("Cutout has no finite pixels"),
    }

    let mapping = CoordinateMapping::for_image(config.projection, image, center, fov);

    let style = LayoutStyle::for_figure(&config.figure);
    let axes = fit_axes(&config.figure, width, height);
    let x_locator = TickLocator::for_axis(axes.width(), style.tick_font_px, X_LABEL_FACTOR);
    let y_locator = TickLocator::for_axis(axes.height(), style.tick_font_px, Y_LABEL_FACTOR);

    let content = ChartContent {
        x_ticks: ra_ticks(&x_locator, &mapping, width),
        y_ticks: dec_ticks(&y_locator, &mapping, height),
        title: config.title.clone(),
        caption: fov.caption(),
    };
    tracing::info!(
        "Placed {} RA and {} Dec ticks",
        content.x_ticks.len(),
        content.y_ticks.len()
    );

    let layout = ChartLayout::build(&config.figure, axes, (width, height), &content, measure)?;
    tracing::debug!(
        "Axes {:.1}x{:.1} px, trimmed canvas {}x{}",
        layout.axes.width(),
        layout.axes.height(),
        layout.canvas_size.0,
        layout.canvas_size.1
    );

    Ok(PreparedChart {
        inverted,
        vmax,
        mapping,
        layout,
        x_tick_count: content.x_ticks.len(),
        y_tick_count: content.y_ticks.len(),
    })
}

/// Prepare, render and write a chart for an already fetched cutout.
pub fn render_to_file(
    config: &ChartConfig,
    image: &SurveyImage,
    measure: &dyn TextMeasure,
) -> Result<ChartSummary> {
    let prepared = prepare(config, image, measure)?;
    let chart = render_chart(&prepared.layout, &prepared.inverted, prepared.vmax)?;
    write_png(&config.output, &chart, config.figure.dpi)?;

    Ok(ChartSummary {
        output: config.output.clone(),
        image_size: (image.grid.width(), image.grid.height()),
        canvas_size: (chart.width, chart.height),
        x_tick_count: prepared.x_tick_count,
        y_tick_count: prepared.y_tick_count,
    })
}

/// Fetch a cutout from `source` and write the chart.
pub fn run_with_source(config: &ChartConfig, source: &dyn ImageSource) -> Result<ChartSummary> {
    config.validate()?;
    let request = config.cutout_request()?;

    let started = Instant::now();
    let image = source.fetch(&request)?;
    tracing::info!(
        "Fetched {}x{} cutout in {:.2?}",
        image.grid.width(),
        image.grid.height(),
        started.elapsed()
    );

    render_to_file(config, &image, &FontMeasure)
}

/// Build the chart described by `config`: from `input_fits` when set,
/// otherwise from SkyView.
pub fn run(config: &ChartConfig) -> Result<ChartSummary> {
    match &config.input_fits {
        Some(path) => run_with_source(config, &FitsFileSource::new(path)),
        None => {
            let client = SkyViewClient::new(config.timeout())?;
            run_with_source(config, &client)
        }
    }
}

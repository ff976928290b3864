use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{ChartError, Result};
use crate::render::RenderedChart;

const METERS_PER_INCH: f64 = 0.0254;

/// Pixels per metre for a resolution in dots per inch.
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Write the chart as an RGB8 PNG tagged with `dpi`.
///
/// An existing file is overwritten. Nothing is cleaned up on failure.
pub fn write_png(path: &Path, chart: &RenderedChart, dpi: u32) -> Result<()> {
    let io_error = |source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let ppm = pixels_per_meter(dpi);

    let mut encoder = png::Encoder::new(BufWriter::new(file), chart.width, chart.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&chart.pixels)?;
    writer.finish()?;

    tracing::info!(
        "Wrote {}x{} chart to {}",
        chart.width,
        chart.height,
        path.display()
    );

    Ok(())
}

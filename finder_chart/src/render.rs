//! Draws a laid-out chart into an RGB buffer.

use glam::DVec2;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use skysurvey::IntensityGrid;

use crate::error::{ChartError, Result};
use crate::layout::{ChartLayout, TextMeasure};

const FONT_FAMILY: &str = "sans-serif";
const CHANNELS: usize = 3;

/// Measures text with the same font backend used for drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMeasure;

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str, size_px: f64) -> Result<(f64, f64)> {
        let (w, h) = (FONT_FAMILY, size_px)
            .into_font()
            .box_size(text)
            .map_err(|e| ChartError::Render(format!("Failed to measure '{}': {}", text, e)))?;
        Ok((w as f64, h as f64))
    }
}

/// An 8-bit RGB image, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RenderedChart {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }
}

/// Grayscale level of `value` on a `[0, vmax]` stretch. NaN is white.
pub fn gray_level(value: f64, vmax: f64) -> u8 {
    if value.is_nan() {
        return 255;
    }
    if vmax.is_nan() || vmax <= 0.0 {
        return 0;
    }
    ((value / vmax).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Paint `grid` into the axes box of `pixels` by nearest-neighbour sampling.
///
/// Grid row 0 lands at the bottom of the axes.
pub fn rasterize(layout: &ChartLayout, grid: &IntensityGrid, vmax: f64, pixels: &mut [u8]) {
    let (canvas_w, canvas_h) = layout.canvas_size;
    let axes = layout.axes;
    let (grid_w, grid_h) = (grid.width(), grid.height());

    let x0 = axes.min.x.round().max(0.0) as u32;
    let x1 = (axes.max.x.round() as u32).min(canvas_w);
    let y0 = axes.min.y.round().max(0.0) as u32;
    let y1 = (axes.max.y.round() as u32).min(canvas_h);

    for py in y0..y1 {
        let fy = (axes.max.y - (py as f64 + 0.5)) / axes.height();
        let row = ((fy * grid_h as f64).floor().max(0.0) as usize).min(grid_h - 1);

        for px in x0..x1 {
            let fx = (px as f64 + 0.5 - axes.min.x) / axes.width();
            let col = ((fx * grid_w as f64).floor().max(0.0) as usize).min(grid_w - 1);

            let level = gray_level(grid.get(col, row), vmax);
            let idx = (py as usize * canvas_w as usize + px as usize) * CHANNELS;
            pixels[idx..idx + CHANNELS].fill(level);
        }
    }
}

fn to_point(p: DVec2) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn render_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Render the raster, then axes, ticks, text and compass on top.
pub fn render_chart(layout: &ChartLayout, grid: &IntensityGrid, vmax: f64) -> Result<RenderedChart> {
    let (width, height) = layout.canvas_size;
    if width == 0 || height == 0 {
        return Err(ChartError::Render(format!(
            "empty canvas {}x{}",
            width, height
        )));
    }

    let mut pixels = vec![255u8; width as usize * height as usize * CHANNELS];
    rasterize(layout, grid, vmax, &mut pixels);

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();

        root.draw(&Rectangle::new(
            [to_point(layout.axes.min), to_point(layout.axes.max)],
            BLACK.stroke_width(1),
        ))
        .map_err(render_error)?;

        for [a, b] in &layout.tick_marks {
            root.draw(&PathElement::new(
                vec![to_point(*a), to_point(*b)],
                BLACK.stroke_width(1),
            ))
            .map_err(render_error)?;
        }

        for item in &layout.texts {
            let mut style = (FONT_FAMILY, item.size_px)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            if item.rotated {
                style = style.transform(FontTransform::Rotate270);
            }
            root.draw(&Text::new(
                item.text.as_str(),
                to_point(item.bounds.center()),
                style,
            ))
            .map_err(render_error)?;
        }

        for arrow in &layout.arrows {
            root.draw(&PathElement::new(
                vec![to_point(arrow.start), to_point(arrow.shaft_end)],
                BLACK.stroke_width(1),
            ))
            .map_err(render_error)?;
            root.draw(&Polygon::new(
                arrow.head.iter().map(|p| to_point(*p)).collect::<Vec<_>>(),
                BLACK.filled(),
            ))
            .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }

    tracing::debug!("Rendered {}x{} canvas", width, height);

    Ok(RenderedChart {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigureConfig;
    use crate::layout::{ChartContent, FixedMeasure, fit_axes};

    fn layout_for(width: usize, height: usize) -> ChartLayout {
        let figure = FigureConfig::default();
        let axes = fit_axes(&figure, width, height);
        let content = ChartContent {
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            title: "Test".to_string(),
            caption: "(45' x 45')".to_string(),
        };
        ChartLayout::build(&figure, axes, (width, height), &content, &FixedMeasure).unwrap()
    }

    #[test]
    fn gray_levels() {
        assert_eq!(gray_level(0.0, 10.0), 0);
        assert_eq!(gray_level(10.0, 10.0), 255);
        assert_eq!(gray_level(5.0, 10.0), 128);
        assert_eq!(gray_level(f64::NAN, 10.0), 255);
        // A flat inverted image is all zeros with vmax 0
        assert_eq!(gray_level(0.0, 0.0), 0);
    }

    #[test]
    fn raster_origin_is_lower_left() {
        // Bottom row dark, top row bright
        let grid = IntensityGrid::new(2, 2, vec![0.0, 0.0, 1.0, 1.0]);
        let layout = layout_for(2, 2);
        let (w, h) = layout.canvas_size;
        let mut pixels = vec![7u8; w as usize * h as usize * CHANNELS];

        rasterize(&layout, &grid, 1.0, &mut pixels);

        let chart = RenderedChart {
            width: w,
            height: h,
            pixels,
        };
        let axes = layout.axes;
        let inset = 3.0;
        let top = chart.pixel(
            (axes.min.x + inset) as u32,
            (axes.min.y + inset) as u32,
        );
        let bottom = chart.pixel(
            (axes.max.x - inset) as u32,
            (axes.max.y - inset) as u32,
        );
        assert_eq!(top, [255, 255, 255]);
        assert_eq!(bottom, [0, 0, 0]);

        // Outside the axes stays untouched
        assert_eq!(chart.pixel(0, 0), [7, 7, 7]);
    }

    #[test]
    fn nan_pixels_render_white() {
        let grid = IntensityGrid::new(1, 1, vec![f64::NAN]);
        let layout = layout_for(1, 1);
        let (w, h) = layout.canvas_size;
        let mut pixels = vec![0u8; w as usize * h as usize * CHANNELS];

        rasterize(&layout, &grid, 0.0, &mut pixels);

        let center = layout.axes.center();
        let idx = (center.y as usize * w as usize + center.x as usize) * CHANNELS;
        assert_eq!(&pixels[idx..idx + CHANNELS], &[255, 255, 255]);
    }

    #[test]
    #[ignore] // Requires system fonts
    fn renders_full_chart() {
        let grid = IntensityGrid::new(4, 4, (0..16).map(|v| v as f64).collect());
        let figure = FigureConfig::default();
        let axes = fit_axes(&figure, 4, 4);
        let content = ChartContent {
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            title: "NGC 884 and NGC 869".to_string(),
            caption: "(45' x 45')".to_string(),
        };
        let layout = ChartLayout::build(&figure, axes, (4, 4), &content, &FontMeasure).unwrap();

        let chart = render_chart(&layout, &grid, 15.0).unwrap();
        assert_eq!((chart.width, chart.height), layout.canvas_size);
        assert_eq!(
            chart.pixels.len(),
            (chart.width * chart.height) as usize * CHANNELS
        );
    }
}

//! Figure geometry: axes placement, decorations and the tight trim.
//!
//! Everything here is in pixels with y pointing down. Layout is computed
//! once, then handed to the renderer as plain rectangles and polygons.

use glam::DVec2;

use crate::config::FigureConfig;
use crate::error::Result;
use crate::ticks::Tick;

const TICK_FONT_PT: f64 = 10.0;
const LABEL_FONT_PT: f64 = 10.0;
const TITLE_FONT_PT: f64 = 12.0;
const ANNOTATION_FONT_PT: f64 = 14.0;
const TICK_LENGTH_PT: f64 = 3.5;
const TICK_PAD_PT: f64 = 3.5;
const LABEL_PAD_PT: f64 = 4.0;
const TITLE_PAD_PT: f64 = 6.0;

// Compass and caption placement, in axes fractions (origin lower-left)
const NORTH_TEXT_AT: DVec2 = DVec2::new(0.05, 0.94);
const EAST_TEXT_AT: DVec2 = DVec2::new(0.10, 0.88);
const ARROW_ORIGIN: DVec2 = DVec2::new(0.05, 0.85);
const ARROW_LENGTH: f64 = 0.05;
const ARROW_HEAD_WIDTH: f64 = 0.02;
const ARROW_HEAD_LENGTH: f64 = 1.5 * ARROW_HEAD_WIDTH;
const CAPTION_AT: DVec2 = DVec2::new(0.95, 0.91);

pub const X_AXIS_LABEL: &str = "RA (J2000)";
pub const Y_AXIS_LABEL: &str = "Dec (J2000)";

/// Measures text extents for layout.
pub trait TextMeasure {
    /// Width and height in pixels of `text` drawn unrotated at `size_px`.
    fn measure(&self, text: &str, size_px: f64) -> Result<(f64, f64)>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: DVec2, size: DVec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        Self::from_min_size(center - size / 2.0, size)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn include_point(&self, point: DVec2) -> Rect {
        Rect::new(self.min.min(point), self.max.max(point))
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.min.x >= self.min.x - EPS
            && other.min.y >= self.min.y - EPS
            && other.max.x <= self.max.x + EPS
            && other.max.y <= self.max.y + EPS
    }

    pub fn translated(&self, offset: DVec2) -> Rect {
        Rect::new(self.min + offset, self.max + offset)
    }
}

/// Largest box with the image's aspect ratio that fits the figure, centred.
pub fn fit_axes(figure: &FigureConfig, image_width: usize, image_height: usize) -> Rect {
    assert!(image_width >= 1 && image_height >= 1, "Image must not be empty");

    let figure_size = DVec2::new(figure.width_px as f64, figure.height_px as f64);
    let scale = (figure_size.x / image_width as f64).min(figure_size.y / image_height as f64);
    let size = DVec2::new(image_width as f64, image_height as f64) * scale;

    Rect::from_center_size(figure_size / 2.0, size)
}

/// Font sizes and paddings in pixels for a figure's DPI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutStyle {
    pub tick_font_px: f64,
    pub label_font_px: f64,
    pub title_font_px: f64,
    pub annotation_font_px: f64,
    pub tick_length_px: f64,
    pub tick_pad_px: f64,
    pub label_pad_px: f64,
    pub title_pad_px: f64,
}

impl LayoutStyle {
    pub fn for_figure(figure: &FigureConfig) -> Self {
        Self {
            tick_font_px: figure.points_to_px(TICK_FONT_PT),
            label_font_px: figure.points_to_px(LABEL_FONT_PT),
            title_font_px: figure.points_to_px(TITLE_FONT_PT),
            annotation_font_px: figure.points_to_px(ANNOTATION_FONT_PT),
            tick_length_px: figure.points_to_px(TICK_LENGTH_PT),
            tick_pad_px: figure.points_to_px(TICK_PAD_PT),
            label_pad_px: figure.points_to_px(LABEL_PAD_PT),
            title_pad_px: figure.points_to_px(TITLE_PAD_PT),
        }
    }
}

/// Text to place around and inside the axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartContent {
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub title: String,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    TickLabel,
    AxisLabel,
    Title,
    Annotation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub size_px: f64,
    pub role: TextRole,
    /// Drawn rotated 90 degrees counter-clockwise
    pub rotated: bool,
    /// Box occupied on the canvas, after rotation
    pub bounds: Rect,
}

/// A straight shaft with a triangular head beyond its end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub start: DVec2,
    pub shaft_end: DVec2,
    /// Tip, then the two base corners
    pub head: [DVec2; 3],
}

impl Arrow {
    fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        [self.start, self.shaft_end].into_iter().chain(self.head)
    }

    fn translated(&self, offset: DVec2) -> Arrow {
        Arrow {
            start: self.start + offset,
            shaft_end: self.shaft_end + offset,
            head: self.head.map(|p| p + offset),
        }
    }
}

/// The trimmed figure, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Figure size before trimming
    pub figure_size: (u32, u32),
    pub canvas_size: (u32, u32),
    pub axes: Rect,
    /// Raster extent, `[0, width] x [0, height]`
    pub data_extent: DVec2,
    pub tick_marks: Vec<[DVec2; 2]>,
    pub texts: Vec<TextItem>,
    pub arrows: Vec<Arrow>,
}

impl ChartLayout {
    pub fn build(
        figure: &FigureConfig,
        axes: Rect,
        image_size: (usize, usize),
        content: &ChartContent,
        measure: &dyn TextMeasure,
    ) -> Result<Self> {
        let style = LayoutStyle::for_figure(figure);
        let data_extent = DVec2::new(image_size.0 as f64, image_size.1 as f64);
        let to_canvas = |x: f64, y: f64| data_to_canvas(&axes, data_extent, x, y);
        let fraction = |p: DVec2| {
            DVec2::new(
                axes.min.x + p.x * axes.width(),
                axes.max.y - p.y * axes.height(),
            )
        };

        let mut tick_marks = Vec::with_capacity(content.x_ticks.len() + content.y_ticks.len());
        let mut texts = TextPlacer {
            measure,
            items: Vec::new(),
        };

        // X ticks below the axes
        let x_label_top = axes.max.y + style.tick_length_px + style.tick_pad_px;
        let mut below_ticks = axes.max.y + style.tick_length_px;
        for tick in &content.x_ticks {
            let sx = to_canvas(tick.position, 0.0).x;
            tick_marks.push([
                DVec2::new(sx, axes.max.y),
                DVec2::new(sx, axes.max.y + style.tick_length_px),
            ]);
            let bounds = texts.place(
                &tick.label,
                style.tick_font_px,
                TextRole::TickLabel,
                false,
                |size| Rect::from_min_size(DVec2::new(sx - size.x / 2.0, x_label_top), size),
            )?;
            below_ticks = below_ticks.max(bounds.max.y);
        }

        // Y ticks left of the axes, labels right-aligned
        let y_label_right = axes.min.x - style.tick_length_px - style.tick_pad_px;
        let mut left_of_ticks = axes.min.x - style.tick_length_px;
        for tick in &content.y_ticks {
            let sy = to_canvas(0.0, tick.position).y;
            tick_marks.push([
                DVec2::new(axes.min.x - style.tick_length_px, sy),
                DVec2::new(axes.min.x, sy),
            ]);
            let bounds = texts.place(
                &tick.label,
                style.tick_font_px,
                TextRole::TickLabel,
                false,
                |size| Rect::from_min_size(DVec2::new(y_label_right - size.x, sy - size.y / 2.0), size),
            )?;
            left_of_ticks = left_of_ticks.min(bounds.min.x);
        }

        let axes_center = axes.center();
        texts.place(
            X_AXIS_LABEL,
            style.label_font_px,
            TextRole::AxisLabel,
            false,
            |size| {
                Rect::from_min_size(
                    DVec2::new(axes_center.x - size.x / 2.0, below_ticks + style.label_pad_px),
                    size,
                )
            },
        )?;
        texts.place(
            Y_AXIS_LABEL,
            style.label_font_px,
            TextRole::AxisLabel,
            true,
            |size| {
                Rect::from_min_size(
                    DVec2::new(
                        left_of_ticks - style.label_pad_px - size.x,
                        axes_center.y - size.y / 2.0,
                    ),
                    size,
                )
            },
        )?;
        texts.place(
            &content.title,
            style.title_font_px,
            TextRole::Title,
            false,
            |size| {
                Rect::from_min_size(
                    DVec2::new(
                        axes_center.x - size.x / 2.0,
                        axes.min.y - style.title_pad_px - size.y,
                    ),
                    size,
                )
            },
        )?;

        // Compass letters and caption sit on their anchor's baseline
        for (letter, at) in [("N", NORTH_TEXT_AT), ("E", EAST_TEXT_AT)] {
            let anchor = fraction(at);
            texts.place(
                letter,
                style.annotation_font_px,
                TextRole::Annotation,
                false,
                |size| Rect::from_min_size(DVec2::new(anchor.x, anchor.y - size.y), size),
            )?;
        }
        let caption_anchor = fraction(CAPTION_AT);
        texts.place(
            &content.caption,
            style.annotation_font_px,
            TextRole::Annotation,
            false,
            |size| Rect::new(caption_anchor - size, caption_anchor),
        )?;
        let texts = texts.items;

        let arrows: Vec<Arrow> = [DVec2::Y, DVec2::X]
            .into_iter()
            .map(|direction| {
                let shaft_end = ARROW_ORIGIN + direction * ARROW_LENGTH;
                let side = direction.perp() * (ARROW_HEAD_WIDTH / 2.0);
                Arrow {
                    start: fraction(ARROW_ORIGIN),
                    shaft_end: fraction(shaft_end),
                    head: [
                        fraction(shaft_end + direction * ARROW_HEAD_LENGTH),
                        fraction(shaft_end + side),
                        fraction(shaft_end - side),
                    ],
                }
            })
            .collect();

        let mut bbox = axes;
        for item in &texts {
            bbox = bbox.union(&item.bounds);
        }
        for point in tick_marks.iter().flatten() {
            bbox = bbox.include_point(*point);
        }
        for point in arrows.iter().flat_map(Arrow::points) {
            bbox = bbox.include_point(point);
        }

        let origin = bbox.min.floor();
        let end = bbox.max.ceil();
        let offset = -origin;
        let canvas = end - origin;

        Ok(Self {
            figure_size: (figure.width_px, figure.height_px),
            canvas_size: (canvas.x as u32, canvas.y as u32),
            axes: axes.translated(offset),
            data_extent,
            tick_marks: tick_marks
                .into_iter()
                .map(|[a, b]| [a + offset, b + offset])
                .collect(),
            texts: texts
                .into_iter()
                .map(|item| TextItem {
                    bounds: item.bounds.translated(offset),
                    ..item
                })
                .collect(),
            arrows: arrows.iter().map(|arrow| arrow.translated(offset)).collect(),
        })
    }

    /// Raster extent coordinates to canvas pixels.
    pub fn data_to_canvas(&self, x: f64, y: f64) -> DVec2 {
        data_to_canvas(&self.axes, self.data_extent, x, y)
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::new(
            DVec2::ZERO,
            DVec2::new(self.canvas_size.0 as f64, self.canvas_size.1 as f64),
        )
    }
}

struct TextPlacer<'a> {
    measure: &'a dyn TextMeasure,
    items: Vec<TextItem>,
}

impl TextPlacer<'_> {
    /// Measure `text`, let `place` position its (rotated) extent, and record it.
    fn place(
        &mut self,
        text: &str,
        size_px: f64,
        role: TextRole,
        rotated: bool,
        place: impl FnOnce(DVec2) -> Rect,
    ) -> Result<Rect> {
        let (w, h) = self.measure.measure(text, size_px)?;
        let extent = if rotated {
            DVec2::new(h, w)
        } else {
            DVec2::new(w, h)
        };
        let bounds = place(extent);
        self.items.push(TextItem {
            text: text.to_string(),
            size_px,
            role,
            rotated,
            bounds,
        });
        Ok(bounds)
    }
}

fn data_to_canvas(axes: &Rect, extent: DVec2, x: f64, y: f64) -> DVec2 {
    DVec2::new(
        axes.min.x + x / extent.x * axes.width(),
        axes.max.y - y / extent.y * axes.height(),
    )
}

/// Monospace metrics for layout tests.
#[cfg(test)]
pub(crate) struct FixedMeasure;

#[cfg(test)]
impl TextMeasure for FixedMeasure {
    fn measure(&self, text: &str, size_px: f64) -> Result<(f64, f64)> {
        Ok((0.6 * size_px * text.chars().count() as f64, size_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(positions: &[f64], label: &str) -> Vec<Tick> {
        positions
            .iter()
            .map(|&position| Tick {
                position,
                label: label.to_string(),
            })
            .collect()
    }

    fn cluster_content() -> ChartContent {
        let positions = [0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0];
        ChartContent {
            x_ticks: ticks(&positions, "02h 20m"),
            y_ticks: ticks(&positions, "57° 07'"),
            title: "NGC 884 and NGC 869".to_string(),
            caption: "(45' x 45')".to_string(),
        }
    }

    fn cluster_layout() -> ChartLayout {
        let figure = FigureConfig::default();
        let axes = fit_axes(&figure, 300, 300);
        ChartLayout::build(&figure, axes, (300, 300), &cluster_content(), &FixedMeasure).unwrap()
    }

    #[test]
    fn axes_keep_image_aspect() {
        let figure = FigureConfig::default();

        let square = fit_axes(&figure, 300, 300);
        assert_eq!(square.size(), DVec2::new(570.0, 570.0));
        assert_eq!(square.min, DVec2::new(150.0, 0.0));

        let wide = fit_axes(&figure, 400, 100);
        assert!((wide.width() / wide.height() - 4.0).abs() < 1e-12);
        assert!((wide.width() - 870.0).abs() < 1e-9);
        assert!((wide.center() - DVec2::new(435.0, 285.0)).length() < 1e-9);
    }

    #[test]
    fn trim_encloses_every_decoration() {
        let layout = cluster_layout();
        let canvas = layout.canvas_rect();

        assert!(canvas.contains_rect(&layout.axes));
        for item in &layout.texts {
            assert!(canvas.contains_rect(&item.bounds), "{} escapes the canvas", item.text);
        }
        for [a, b] in &layout.tick_marks {
            assert!(canvas.contains_rect(&Rect::new(a.min(*b), a.max(*b))));
        }
        for arrow in &layout.arrows {
            assert!(arrow.points().all(|p| layout.axes.contains_rect(&Rect::new(p, p))));
        }
    }

    #[test]
    fn trim_is_tight() {
        let layout = cluster_layout();
        let canvas = layout.canvas_rect();

        let mut content = layout.axes;
        for item in &layout.texts {
            content = content.union(&item.bounds);
        }
        // Outward rounding leaves less than a pixel on each side
        assert!(content.min.x >= 0.0 && content.min.x < 1.0);
        assert!(content.min.y >= 0.0 && content.min.y < 1.0);
        assert!(canvas.max.x - content.max.x < 1.0 + 1e-9);
        assert!(canvas.max.y - content.max.y < 1.0 + 1e-9);
    }

    #[test]
    fn decorations_sit_outside_the_axes() {
        let layout = cluster_layout();
        let axes = layout.axes;

        let title = layout.texts.iter().find(|t| t.role == TextRole::Title).unwrap();
        assert!(title.bounds.max.y <= axes.min.y);

        let y_label = layout.texts.iter().find(|t| t.text == Y_AXIS_LABEL).unwrap();
        assert!(y_label.rotated);
        assert!(y_label.bounds.height() > y_label.bounds.width());
        assert!(y_label.bounds.max.x < axes.min.x);

        let x_label = layout.texts.iter().find(|t| t.text == X_AXIS_LABEL).unwrap();
        assert!(x_label.bounds.min.y > axes.max.y);

        for item in layout.texts.iter().filter(|t| t.role == TextRole::TickLabel) {
            assert!(
                item.bounds.min.y >= axes.max.y || item.bounds.max.x <= axes.min.x,
                "tick label {:?} overlaps the axes",
                item.bounds
            );
        }
    }

    #[test]
    fn canvas_grows_past_the_figure_for_decorations() {
        let layout = cluster_layout();
        assert_eq!(layout.figure_size, (870, 570));
        assert_eq!(layout.axes.size(), DVec2::new(570.0, 570.0));
        // Title above and tick labels below push the height past 570
        assert!(layout.canvas_size.1 > 570);
        // Unused figure width either side of a square axes box is trimmed
        assert!(layout.canvas_size.0 < 870);
    }

    #[test]
    fn data_corners_map_to_axes_corners() {
        let layout = cluster_layout();
        let axes = layout.axes;
        assert!((layout.data_to_canvas(0.0, 0.0) - DVec2::new(axes.min.x, axes.max.y)).length() < 1e-9);
        assert!(
            (layout.data_to_canvas(300.0, 300.0) - DVec2::new(axes.max.x, axes.min.y)).length()
                < 1e-9
        );
    }

    #[test]
    fn compass_arrows_point_north_and_east() {
        let layout = cluster_layout();
        let [north, east] = [layout.arrows[0], layout.arrows[1]];

        // Canvas y grows downward
        assert!(north.shaft_end.y < north.start.y);
        assert!((north.shaft_end.x - north.start.x).abs() < 1e-9);
        assert!(north.head[0].y < north.shaft_end.y);

        assert!(east.shaft_end.x > east.start.x);
        assert!(east.head[0].x > east.shaft_end.x);

        // 0.05 of a 570 px axes box
        assert!(((north.start - north.shaft_end).length() - 28.5).abs() < 1e-9);
        assert!(((east.head[1] - east.head[2]).length() - 0.02 * 570.0).abs() < 1e-9);
    }

    #[test]
    fn caption_is_right_aligned() {
        let layout = cluster_layout();
        let caption = layout.texts.iter().find(|t| t.text == "(45' x 45')").unwrap();
        let anchor_x = layout.axes.min.x + 0.95 * layout.axes.width();
        assert!((caption.bounds.max.x - anchor_x).abs() < 1e-9);
    }
}

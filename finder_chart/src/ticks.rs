//! Automatic tick placement and sexagesimal tick labels.

use skysurvey::{format_dec_label, format_ra_label};

use crate::mapping::CoordinateMapping;

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const MAX_BINS: usize = 9;

/// Horizontal labels are wide, so the x axis gets fewer bins per font height.
pub const X_LABEL_FACTOR: f64 = 3.0;
pub const Y_LABEL_FACTOR: f64 = 2.0;

/// A tick at `position` (raster extent units) with its formatted sky label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Places at most `max_bins` intervals at "nice" multiples of 1, 2, 2.5 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickLocator {
    max_bins: usize,
}

impl TickLocator {
    pub fn new(max_bins: usize) -> Self {
        Self {
            max_bins: max_bins.clamp(1, MAX_BINS),
        }
    }

    /// Bin count for an axis `axis_len_px` long labelled in `font_px` text.
    pub fn for_axis(axis_len_px: f64, font_px: f64, label_factor: f64) -> Self {
        let per_bin = (font_px * label_factor).max(1.0);
        let bins = (axis_len_px / per_bin).floor();
        let bins = if bins.is_finite() && bins > 0.0 {
            bins as usize
        } else {
            1
        };
        Self::new(bins)
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn step(&self, lo: f64, hi: f64) -> f64 {
        let span = hi - lo;
        if !span.is_finite() || span <= 0.0 {
            return 1.0;
        }

        let raw = span / self.max_bins as f64;
        let scale = 10f64.powf(raw.log10().floor());

        for nice in NICE_STEPS {
            let step = nice * scale;
            // Tolerate float noise when the span is an exact multiple
            let first = (lo / step + 1e-9).floor();
            let last = (hi / step - 1e-9).ceil();
            if step >= raw * (1.0 - 1e-9) && (last - first) as usize <= self.max_bins {
                return step;
            }
        }

        10.0 * scale
    }

    /// Tick values inside `[lo, hi]`, ascending.
    pub fn locate(&self, lo: f64, hi: f64) -> Vec<f64> {
        let step = self.step(lo, hi);
        let eps = step * 1e-9;
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;

        let mut ticks: Vec<f64> = (first - 1..=last + 1)
            .map(|k| k as f64 * step)
            .filter(|&v| v >= lo - eps && v <= hi + eps)
            .map(|v| if v == 0.0 { 0.0 } else { v })
            .collect();
        ticks.dedup();
        ticks
    }
}

/// RA ticks along the x axis of a `width`-pixel raster.
pub fn ra_ticks(locator: &TickLocator, mapping: &CoordinateMapping, width: usize) -> Vec<Tick> {
    locator
        .locate(0.0, width as f64)
        .into_iter()
        .map(|position| Tick {
            position,
            label: format_ra_label(mapping.ra_at(position)),
        })
        .collect()
}

/// Dec ticks along the y axis of a `height`-pixel raster.
pub fn dec_ticks(locator: &TickLocator, mapping: &CoordinateMapping, height: usize) -> Vec<Tick> {
    locator
        .locate(0.0, height as f64)
        .into_iter()
        .map(|position| Tick {
            position,
            label: format_dec_label(mapping.dec_at(position)),
        })
        .collect()
}

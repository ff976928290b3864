//! Pixel-extent positions to sky coordinates for axis labels.
//!
//! Positions are in raster extent units: `0..width` along x and `0..height`
//! along y, with pixel `i` spanning `[i, i + 1)`.

use skysurvey::{FieldOfView, SkyCoord, SurveyImage, Wcs};

use crate::config::Projection;

/// Small-angle linear map around the chart centre.
///
/// `value = center + (pixel - dim / 2) * (fov / dim)`. This is an
/// approximation, not an astrometric projection: it ignores the
/// `cos(dec)` stretch of RA and the sky's curvature, and it puts RA
/// increasing to the right. It is only reasonable for small fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMapping {
    center: SkyCoord,
    fov_deg: f64,
    width: usize,
    height: usize,
}

impl LinearMapping {
    pub fn new(center: SkyCoord, fov: FieldOfView, width: usize, height: usize) -> Self {
        assert!(width >= 1, "Image width must be at least 1");
        assert!(height >= 1, "Image height must be at least 1");
        Self {
            center,
            fov_deg: fov.degrees(),
            width,
            height,
        }
    }

    pub fn ra_at(&self, x: f64) -> f64 {
        let w = self.width as f64;
        self.center.ra_deg() + (x - w / 2.0) * (self.fov_deg / w)
    }

    pub fn dec_at(&self, y: f64) -> f64 {
        let h = self.height as f64;
        self.center.dec_deg() + (y - h / 2.0) * (self.fov_deg / h)
    }
}

/// TAN projection through the cutout's WCS.
///
/// RA ticks are read along the middle row, Dec ticks along the middle column.
#[derive(Debug, Clone, PartialEq)]
pub struct WcsMapping {
    wcs: Wcs,
    width: usize,
    height: usize,
}

impl WcsMapping {
    pub fn new(wcs: Wcs, width: usize, height: usize) -> Self {
        Self { wcs, width, height }
    }

    pub fn ra_at(&self, x: f64) -> f64 {
        let mid_row = self.height as f64 / 2.0 - 0.5;
        self.wcs.pixel_to_sky(x - 0.5, mid_row).0
    }

    pub fn dec_at(&self, y: f64) -> f64 {
        let mid_col = self.width as f64 / 2.0 - 0.5;
        self.wcs.pixel_to_sky(mid_col, y - 0.5).1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateMapping {
    Linear(LinearMapping),
    Wcs(WcsMapping),
}

impl CoordinateMapping {
    /// Pick the mapping for an image. A `Wcs` request on an image without a
    /// usable WCS falls back to the linear map.
    pub fn for_image(
        projection: Projection,
        image: &SurveyImage,
        center: SkyCoord,
        fov: FieldOfView,
    ) -> Self {
        let (width, height) = (image.grid.width(), image.grid.height());

        match (projection, &image.wcs) {
            (Projection::Wcs, Some(wcs)) => Self::Wcs(WcsMapping::new(wcs.clone(), width, height)),
            (Projection::Wcs, None) => {
                tracing::warn!("Cutout has no usable TAN WCS, falling back to linear labels");
                Self::Linear(LinearMapping::new(center, fov, width, height))
            }
            (Projection::Linear, _) => {
                Self::Linear(LinearMapping::new(center, fov, width, height))
            }
        }
    }

    pub fn ra_at(&self, x: f64) -> f64 {
        match self {
            Self::Linear(mapping) => mapping.ra_at(x),
            Self::Wcs(mapping) => mapping.ra_at(x),
        }
    }

    pub fn dec_at(&self, y: f64) -> f64 {
        match self {
            Self::Linear(mapping) => mapping.dec_at(y),
            Self::Wcs(mapping) => mapping.dec_at(y),
        }
    }
}

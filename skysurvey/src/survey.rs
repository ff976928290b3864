//! Cutout requests and the sources that can satisfy them.

use std::path::{Path, PathBuf};

use crate::coord::{FieldOfView, SkyCoord};
use crate::error::{Error, Result};
use crate::fits::{FitsHeader, FitsImage, decode_primary_image, read_primary_image};
use crate::grid::IntensityGrid;
use crate::wcs::Wcs;

pub const DEFAULT_SURVEY: &str = "DSS2 Red";
pub const DEFAULT_PIXELS: u32 = 300;

/// A square cutout centred on a target.
#[derive(Debug, Clone, PartialEq)]
pub struct CutoutRequest {
    pub center: SkyCoord,
    pub fov: FieldOfView,
    pub survey: String,
    /// Pixels along each axis
    pub pixels: u32,
}

impl CutoutRequest {
    pub fn new(center: SkyCoord, fov: FieldOfView) -> Self {
        Self {
            center,
            fov,
            survey: DEFAULT_SURVEY.to_string(),
            pixels: DEFAULT_PIXELS,
        }
    }
}

/// A decoded cutout with whatever header metadata came with it.
#[derive(Debug, Clone)]
pub struct SurveyImage {
    pub grid: IntensityGrid,
    pub header: FitsHeader,
    pub wcs: Option<Wcs>,
}

impl SurveyImage {
    pub fn from_grid(grid: IntensityGrid) -> Self {
        Self {
            grid,
            header: FitsHeader::default(),
            wcs: None,
        }
    }

    pub fn from_fits_bytes(bytes: &[u8]) -> Result<Self> {
        decode_primary_image(bytes).map(Self::from_fits_image)
    }

    pub fn from_fits_file(path: &Path) -> Result<Self> {
        read_primary_image(path).map(Self::from_fits_image)
    }

    fn from_fits_image(image: FitsImage) -> Self {
        let wcs = Wcs::from_header(&image.header);
        let grid = IntensityGrid::new(image.width, image.height, image.pixels);

        tracing::debug!(
            "Decoded {:?} cutout {}x{}, {} header keywords, WCS {}",
            image.bitpix,
            grid.width(),
            grid.height(),
            image.header.len(),
            if wcs.is_some() { "present" } else { "absent" }
        );

        Self {
            grid,
            header: image.header,
            wcs,
        }
    }
}

/// Anything that can turn a cutout request into pixels.
pub trait ImageSource {
    fn fetch(&self, request: &CutoutRequest) -> Result<SurveyImage>;
}

/// Serves a cutout from a FITS file already on disk.
#[derive(Debug, Clone)]
pub struct FitsFileSource {
    path: PathBuf,
}

impl FitsFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FitsFileSource {
    fn fetch(&self, request: &CutoutRequest) -> Result<SurveyImage> {
        tracing::info!(
            "Reading cutout for {} from {}",
            request.center,
            self.path.display()
        );

        // Missing files are I/O errors, not cfitsio statuses
        std::fs::metadata(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        SurveyImage::from_fits_file(&self.path)
    }
}

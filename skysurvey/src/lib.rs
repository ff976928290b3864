//! Skysurvey - sky positions and survey cutouts.
//!
//! This library covers everything up to the pixels of a finder chart:
//! - Parsing and formatting ICRS coordinates in sexagesimal notation
//! - Decoding FITS primary images and their TAN WCS
//! - Requesting cutouts from NASA SkyView
//! - Photometric inversion of the returned intensities
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skysurvey::{CutoutRequest, FieldOfView, ImageSource, SkyCoord, SkyViewClient};
//!
//! let center = SkyCoord::parse("02h20m30s +57d07m00s")?;
//! let request = CutoutRequest::new(center, FieldOfView::from_arcmin(45.0)?);
//! let image = SkyViewClient::new(skysurvey::DEFAULT_TIMEOUT)?.fetch(&request)?;
//! let inverted = image.grid.inverted();
//! ```

mod coord;
mod error;
pub mod fits;
mod grid;
pub mod sexagesimal;
mod skyview;
mod survey;
mod wcs;

pub use coord::{FieldOfView, SkyCoord};
pub use error::{Error, Result};
pub use fits::{BitPix, FitsHeader, FitsImage, HeaderValue};
pub use grid::IntensityGrid;
pub use sexagesimal::{Sexagesimal, format_dec_label, format_ra_label};
pub use skyview::{DEFAULT_TIMEOUT, SKYVIEW_URL, SkyViewClient};
pub use survey::{
    CutoutRequest, DEFAULT_PIXELS, DEFAULT_SURVEY, FitsFileSource, ImageSource, SurveyImage,
};
pub use wcs::Wcs;

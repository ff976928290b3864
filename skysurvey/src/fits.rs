//! Primary-HDU FITS reading through cfitsio.
//!
//! Only what a survey cutout needs: a handful of header keywords and the
//! first image plane, with BSCALE/BZERO applied and BLANK mapped to NaN.

use std::io::Write;
use std::path::Path;

use fitsio::FitsFile;
use fitsio::hdu::{FitsHdu, HduInfo};

use crate::error::{Error, Result};

pub const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

/// Keywords copied into [`FitsHeader`] when an image is read.
const HEADER_KEYWORDS: &[&str] = &[
    "OBJECT", "SURVEY", "PLATEID", "DATE-OBS", "EXPTIME", "EQUINOX", "RADESYS", "CTYPE1",
    "CTYPE2", "CRPIX1", "CRPIX2", "CRVAL1", "CRVAL2", "CDELT1", "CDELT2", "CROTA2", "CD1_1",
    "CD1_2", "CD2_1", "CD2_2", "BSCALE", "BZERO", "BLANK",
];

/// FITS BITPIX values representing pixel data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitPix {
    /// 8-bit unsigned integer (BITPIX = 8)
    UInt8,
    /// 16-bit signed integer (BITPIX = 16)
    Int16,
    /// 32-bit signed integer (BITPIX = 32)
    Int32,
    /// 64-bit signed integer (BITPIX = 64)
    Int64,
    /// 32-bit floating point (BITPIX = -32)
    Float32,
    /// 64-bit floating point (BITPIX = -64)
    Float64,
}

impl BitPix {
    pub fn from_fits_value(value: i64) -> Option<Self> {
        match value {
            8 => Some(BitPix::UInt8),
            16 => Some(BitPix::Int16),
            32 => Some(BitPix::Int32),
            64 => Some(BitPix::Int64),
            -32 => Some(BitPix::Float32),
            -64 => Some(BitPix::Float64),
            _ => None,
        }
    }

    pub fn to_fits_value(self) -> i64 {
        match self {
            BitPix::UInt8 => 8,
            BitPix::Int16 => 16,
            BitPix::Int32 => 32,
            BitPix::Int64 => 64,
            BitPix::Float32 => -32,
            BitPix::Float64 => -64,
        }
    }

    pub fn is_integer(self) -> bool {
        self.to_fits_value() > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Number(f64),
    Text(String),
}

/// The keywords of interest found in a primary header, in lookup order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    cards: Vec<(String, HeaderValue)>,
}

impl FitsHeader {
    fn read(hdu: &FitsHdu, fptr: &mut FitsFile) -> Self {
        let mut cards = Vec::new();
        for &key in HEADER_KEYWORDS {
            // Numeric reads fail on quoted values, which then come back as text
            let value = match hdu.read_key::<f64>(fptr, key) {
                Ok(number) => HeaderValue::Number(number),
                Err(_) => match hdu.read_key::<String>(fptr, key) {
                    Ok(text) => HeaderValue::Text(text),
                    Err(_) => continue,
                },
            };
            cards.push((key.to_string(), value));
        }
        Self { cards }
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            HeaderValue::Number(v) => Some(*v),
            HeaderValue::Text(_) => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            HeaderValue::Text(v) => Some(v.as_str()),
            HeaderValue::Number(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Decoded primary image. Row 0 is the first row in the file, which FITS
/// places at the bottom of the image.
#[derive(Debug, Clone)]
pub struct FitsImage {
    pub header: FitsHeader,
    pub bitpix: BitPix,
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<f64>,
}

pub fn is_fits(bytes: &[u8]) -> bool {
    bytes.len() >= CARD_SIZE && bytes.starts_with(b"SIMPLE  =")
}

/// Decode the primary HDU image from a complete FITS byte stream.
///
/// cfitsio reads from files, so the stream is staged in a temporary file.
pub fn decode_primary_image(bytes: &[u8]) -> Result<FitsImage> {
    if !is_fits(bytes) {
        return Err(Error::MalformedFits(
            "missing SIMPLE card at start of stream".to_string(),
        ));
    }

    let mut staged = tempfile::Builder::new()
        .prefix("cutout-")
        .suffix(".fits")
        .tempfile()
        .map_err(|source| Error::Io {
            path: std::env::temp_dir(),
            source,
        })?;
    if let Err(source) = staged.write_all(bytes).and_then(|()| staged.flush()) {
        return Err(Error::Io {
            path: staged.path().to_path_buf(),
            source,
        });
    }

    read_primary_image(staged.path())
}

/// Read the primary HDU image of a FITS file.
pub fn read_primary_image(path: &Path) -> Result<FitsImage> {
    let fits_error = |err: fitsio::errors::Error| Error::Fits {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut fptr = FitsFile::open(path).map_err(fits_error)?;
    let hdu = fptr.primary_hdu().map_err(fits_error)?;

    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        HduInfo::TableInfo { .. } => {
            return Err(Error::MalformedFits(
                "primary HDU is a table, not an image".to_string(),
            ));
        }
        HduInfo::AnyInfo => {
            return Err(Error::MalformedFits("unknown primary HDU type".to_string()));
        }
    };
    let (width, height, plane_len) = plane_dimensions(&shape)?;

    // cfitsio reports the scaled type, the stored one decides BLANK handling
    let bitpix_value: i64 = hdu.read_key(&mut fptr, "BITPIX").map_err(fits_error)?;
    let bitpix = BitPix::from_fits_value(bitpix_value)
        .ok_or_else(|| Error::MalformedFits(format!("unsupported BITPIX {}", bitpix_value)))?;

    let mut pixels: Vec<f64> = hdu
        .read_section(&mut fptr, 0, plane_len)
        .map_err(fits_error)?;

    let header = FitsHeader::read(&hdu, &mut fptr);
    if bitpix.is_integer() {
        mask_blank(&mut pixels, &header);
    }

    Ok(FitsImage {
        header,
        bitpix,
        width,
        height,
        pixels,
    })
}

/// Width, height and pixel count of the first plane. `shape` is in cfitsio
/// order, slowest axis first, so NAXIS1 is last.
fn plane_dimensions(shape: &[usize]) -> Result<(usize, usize, usize)> {
    let [.., height, width] = shape else {
        return Err(Error::MalformedFits(format!(
            "primary HDU has NAXIS = {}, expected an image",
            shape.len()
        )));
    };
    let (width, height) = (*width, *height);

    if width == 0 || height == 0 {
        return Err(Error::MalformedFits(format!(
            "image is empty ({}x{})",
            width, height
        )));
    }

    let plane_len = width.checked_mul(height).ok_or_else(|| {
        Error::MalformedFits(format!("image too large ({}x{})", width, height))
    })?;
    Ok((width, height, plane_len))
}

/// cfitsio applies BSCALE/BZERO but leaves BLANK pixels as scaled numbers.
fn mask_blank(pixels: &mut [f64], header: &FitsHeader) {
    let Some(blank) = header.get_f64("BLANK") else {
        return;
    };
    let bscale = header.get_f64("BSCALE").unwrap_or(1.0);
    let bzero = header.get_f64("BZERO").unwrap_or(0.0);
    let scaled_blank = blank * bscale + bzero;

    pixels
        .iter_mut()
        .filter(|p| **p == scaled_blank)
        .for_each(|p| *p = f64::NAN);
}

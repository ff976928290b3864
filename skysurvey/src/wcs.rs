//! TAN (gnomonic) world coordinate system read from FITS headers.

use crate::fits::FitsHeader;

/// Linear part plus reference point of a TAN projection.
///
/// Pixel coordinates are 0-indexed pixel centres.
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    /// Reference pixel X (0-indexed)
    pub crpix1: f64,
    /// Reference pixel Y (0-indexed)
    pub crpix2: f64,
    /// RA at the reference pixel (degrees)
    pub crval1: f64,
    /// Dec at the reference pixel (degrees)
    pub crval2: f64,
    /// CD matrix, degrees per pixel
    pub cd1_1: f64,
    pub cd1_2: f64,
    pub cd2_1: f64,
    pub cd2_2: f64,
}

impl Wcs {
    /// Build a WCS from header keywords.
    ///
    /// Needs CRPIX1/2 and CRVAL1/2, plus either a full CD matrix or the
    /// CDELT/CROTA2 convention. Returns `None` when the reference keywords are
    /// missing, the projection is not TAN, or the matrix is singular.
    pub fn from_header(header: &FitsHeader) -> Option<Self> {
        for key in ["CTYPE1", "CTYPE2"] {
            if let Some(ctype) = header.get_str(key)
                && !ctype.trim_end().ends_with("-TAN")
            {
                return None;
            }
        }

        Self::from_keywords(|key| header.get_f64(key))
    }

    pub fn from_keywords<F>(mut get_keyword: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<f64>,
    {
        let crpix1 = get_keyword("CRPIX1")? - 1.0;
        let crpix2 = get_keyword("CRPIX2")? - 1.0;
        let crval1 = get_keyword("CRVAL1")?;
        let crval2 = get_keyword("CRVAL2")?;

        let (cd1_1, cd1_2, cd2_1, cd2_2) =
            if let (Some(cd1_1), Some(cd1_2), Some(cd2_1), Some(cd2_2)) = (
                get_keyword("CD1_1"),
                get_keyword("CD1_2"),
                get_keyword("CD2_1"),
                get_keyword("CD2_2"),
            ) {
                (cd1_1, cd1_2, cd2_1, cd2_2)
            } else {
                let cdelt1 = get_keyword("CDELT1")?;
                let cdelt2 = get_keyword("CDELT2")?;
                let crota2 = get_keyword("CROTA2").unwrap_or(0.0).to_radians();

                let cos_r = crota2.cos();
                let sin_r = crota2.sin();

                (
                    cdelt1 * cos_r,
                    -cdelt2 * sin_r,
                    cdelt1 * sin_r,
                    cdelt2 * cos_r,
                )
            };

        let det = cd1_1 * cd2_2 - cd1_2 * cd2_1;
        if !det.is_finite() || det.abs() < 1e-15 {
            return None;
        }

        Some(Self {
            crpix1,
            crpix2,
            crval1,
            crval2,
            cd1_1,
            cd1_2,
            cd2_1,
            cd2_2,
        })
    }

    /// Pixel to (RA, Dec) in degrees. RA is normalized to `[0, 360)`.
    pub fn pixel_to_sky(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.crpix1;
        let dy = y - self.crpix2;

        // Intermediate world coordinates
        let xi_rad = (self.cd1_1 * dx + self.cd1_2 * dy).to_radians();
        let eta_rad = (self.cd2_1 * dx + self.cd2_2 * dy).to_radians();
        let ra0_rad = self.crval1.to_radians();
        let dec0_rad = self.crval2.to_radians();

        let rho = (xi_rad * xi_rad + eta_rad * eta_rad).sqrt();

        let (ra, dec) = if rho < 1e-10 {
            (self.crval1, self.crval2)
        } else {
            let c = rho.atan();
            let sin_c = c.sin();
            let cos_c = c.cos();

            let dec_rad = (cos_c * dec0_rad.sin() + eta_rad * sin_c * dec0_rad.cos() / rho).asin();
            let ra_rad = ra0_rad
                + (xi_rad * sin_c)
                    .atan2(rho * dec0_rad.cos() * cos_c - eta_rad * dec0_rad.sin() * sin_c);

            (ra_rad.to_degrees(), dec_rad.to_degrees())
        };

        (ra.rem_euclid(360.0), dec)
    }
}

//! ICRS sky positions and angular field sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sexagesimal::{format_dec_dms, format_ra_hms};

/// A position on the sky in the ICRS frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoord {
    ra_deg: f64,
    dec_deg: f64,
}

impl SkyCoord {
    /// Create a coordinate from decimal degrees.
    ///
    /// RA must lie in `[0, 360)` and Dec in `[-90, 90]`.
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Result<Self> {
        let input = format!("{} {}", ra_deg, dec_deg);
        if !ra_deg.is_finite() || !(0.0..360.0).contains(&ra_deg) {
            return Err(Error::coordinate(&input, "RA out of range [0, 360)"));
        }
        if !dec_deg.is_finite() || !(-90.0..=90.0).contains(&dec_deg) {
            return Err(Error::coordinate(&input, "Dec out of range [-90, 90]"));
        }
        Ok(Self { ra_deg, dec_deg })
    }

    /// Parse a coordinate string.
    ///
    /// Accepted forms:
    /// - `02h20m30s +57d07m00s`
    /// - `02:20:30 +57:07:00`
    /// - `02 20 30 +57 07 00`
    /// - `35.125 57.1167` (decimal degrees)
    ///
    /// A comma may separate RA from Dec. A sexagesimal RA is read as hours
    /// unless it is marked with `d`.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.replace(',', " ");
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let (ra_text, dec_text) = match tokens.len() {
            2 => (tokens[0].to_string(), tokens[1].to_string()),
            6 => (tokens[..3].join(":"), tokens[3..].join(":")),
            n => {
                return Err(Error::coordinate(
                    input,
                    format!("expected RA and Dec, found {} components", n),
                ));
            }
        };

        let ra = parse_angle(&ra_text).ok_or_else(|| Error::coordinate(input, "invalid RA"))?;
        let dec = parse_angle(&dec_text).ok_or_else(|| Error::coordinate(input, "invalid Dec"))?;

        if ra.negative {
            return Err(Error::coordinate(input, "RA cannot be negative"));
        }
        if dec.hour_marked {
            return Err(Error::coordinate(input, "Dec cannot be given in hours"));
        }

        let ra_is_hours = ra.hour_marked || (!ra.degree_marked && ra.parts > 1);
        let ra_deg = if ra_is_hours {
            if ra.value >= 24.0 {
                return Err(Error::coordinate(input, "RA out of range [0h, 24h)"));
            }
            ra.value * 15.0
        } else {
            ra.value
        };

        Self::from_degrees(ra_deg, dec.signed())
            .map_err(|_| Error::coordinate(input, "coordinate out of range"))
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }
}

impl FromStr for SkyCoord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SkyCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            format_ra_hms(self.ra_deg),
            format_dec_dms(self.dec_deg)
        )
    }
}

#[derive(Debug)]
struct ParsedAngle {
    negative: bool,
    value: f64,
    parts: usize,
    hour_marked: bool,
    degree_marked: bool,
}

impl ParsedAngle {
    fn signed(&self) -> f64 {
        if self.negative { -self.value } else { self.value }
    }
}

/// Parse `[+-]W[h|d|:]M[m|:]S[s]` or a plain decimal.
///
/// Minutes and seconds must be below 60. The sign is read from the text so
/// that `-00d30m` keeps its sign.
fn parse_angle(text: &str) -> Option<ParsedAngle> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let hour_marked = body.contains(['h', 'H']);
    let degree_marked = body.contains(['d', 'D', '°']);

    let parts = body
        .split(['h', 'H', 'd', 'D', '°', 'm', '\'', 's', '"', ':'])
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<Vec<f64>>>()?;

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    if parts[1..].iter().any(|v| *v >= 60.0) {
        return None;
    }

    let value: f64 = parts
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(v, div)| v / div)
        .sum();

    Some(ParsedAngle {
        negative,
        value,
        parts: parts.len(),
        hour_marked,
        degree_marked,
    })
}

/// Angular width (and height) of a square cutout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FieldOfView {
    arcmin: f64,
}

impl FieldOfView {
    pub fn from_arcmin(arcmin: f64) -> Result<Self> {
        if !arcmin.is_finite() || arcmin <= 0.0 {
            return Err(Error::InvalidFieldOfView { arcmin });
        }
        Ok(Self { arcmin })
    }

    pub fn arcmin(&self) -> f64 {
        self.arcmin
    }

    pub fn degrees(&self) -> f64 {
        self.arcmin / 60.0
    }

    /// Caption text such as `(45' x 45')`.
    pub fn caption(&self) -> String {
        let value = format_arcmin(self.arcmin);
        format!("({}' x {}')", value, value)
    }
}

impl TryFrom<f64> for FieldOfView {
    type Error = Error;

    fn try_from(arcmin: f64) -> Result<Self> {
        Self::from_arcmin(arcmin)
    }
}

impl From<FieldOfView> for f64 {
    fn from(fov: FieldOfView) -> Self {
        fov.arcmin
    }
}

fn format_arcmin(arcmin: f64) -> String {
    let text = format!("{:.4}", arcmin);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FloatExt;

    const CENTER_RA: f64 = 35.125;
    const CENTER_DEC: f64 = 57.0 + 7.0 / 60.0;

    fn assert_center(coord: SkyCoord) {
        assert!(
            coord.ra_deg().approximately_eq(CENTER_RA),
            "ra = {}",
            coord.ra_deg()
        );
        assert!(
            coord.dec_deg().approximately_eq(CENTER_DEC),
            "dec = {}",
            coord.dec_deg()
        );
    }

    #[test]
    fn parse_unit_marked() {
        assert_center(SkyCoord::parse("02h20m30s +57d07m00s").unwrap());
    }

    #[test]
    fn parse_colon_separated() {
        assert_center(SkyCoord::parse("02:20:30 +57:07:00").unwrap());
        assert_center(SkyCoord::parse("02:20:30, 57:07:00").unwrap());
    }

    #[test]
    fn parse_space_separated() {
        assert_center(SkyCoord::parse("02 20 30 +57 07 00").unwrap());
    }

    #[test]
    fn parse_decimal_degrees() {
        let coord = SkyCoord::parse("35.125 57.116666667").unwrap();
        assert_center(coord);
    }

    #[test]
    fn parse_degree_marked_ra() {
        let coord = SkyCoord::parse("35d07m30s +57d07m00s").unwrap();
        assert_center(coord);
    }

    #[test]
    fn negative_zero_declination_keeps_sign() {
        let coord = SkyCoord::parse("10h00m00s -00d30m00s").unwrap();
        assert!(coord.dec_deg().approximately_eq(-0.5));
        assert!(coord.ra_deg().approximately_eq(150.0));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(SkyCoord::parse("24h00m00s +10d00m00s").is_err());
        assert!(SkyCoord::parse("02h20m30s +91d00m00s").is_err());
        assert!(SkyCoord::parse("360.0 10.0").is_err());
        assert!(SkyCoord::parse("02h61m00s +10d00m00s").is_err());
        assert!(SkyCoord::parse("-02h20m30s +10d00m00s").is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(SkyCoord::parse("").is_err());
        assert!(SkyCoord::parse("02h20m30s").is_err());
        assert!(SkyCoord::parse("abc def").is_err());
        assert!(SkyCoord::parse("02h20m30s +5h00m00s").is_err());
        assert!(SkyCoord::parse("1:2:3:4 +5").is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let coord = SkyCoord::parse("02h20m30s +57d07m00s").unwrap();
        assert_eq!(coord.to_string(), "02h20m30.00s +57d07m00.00s");
        assert_center(coord.to_string().parse().unwrap());
    }

    #[test]
    fn field_of_view_conversions() {
        let fov = FieldOfView::from_arcmin(45.0).unwrap();
        assert!(fov.degrees().approximately_eq(0.75));
        assert_eq!(fov.caption(), "(45' x 45')");
        assert_eq!(FieldOfView::from_arcmin(7.5).unwrap().caption(), "(7.5' x 7.5')");
        assert_eq!(FieldOfView::from_arcmin(7.25).unwrap().caption(), "(7.25' x 7.25')");
        assert_eq!(FieldOfView::from_arcmin(120.0).unwrap().caption(), "(120' x 120')");
        assert_eq!(FieldOfView::from_arcmin(1.0 / 3.0).unwrap().caption(), "(0.3333' x 0.3333')");
    }

    #[test]
    fn field_of_view_rejects_non_positive() {
        assert!(FieldOfView::from_arcmin(0.0).is_err());
        assert!(FieldOfView::from_arcmin(-1.0).is_err());
        assert!(FieldOfView::from_arcmin(f64::NAN).is_err());
        assert!(FieldOfView::from_arcmin(1e-9).is_ok());
    }
}

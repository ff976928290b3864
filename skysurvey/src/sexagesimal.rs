//! Base-60 splitting and the label formats used on chart axes.

use std::fmt;

const CENTI_PER_MINUTE: u64 = 60 * 100;
const CENTI_PER_UNIT: u64 = 60 * CENTI_PER_MINUTE;

/// An angle split into whole units, minutes and hundredths of a second.
///
/// The unit is whatever the caller passed in (hours or degrees). Rounding to
/// hundredths happens before the split, so a value like 2h 59m 59.999s
/// carries over to 3h 00m 00.00s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sexagesimal {
    pub negative: bool,
    pub whole: u64,
    pub minutes: u64,
    pub centiseconds: u64,
}

impl Sexagesimal {
    pub fn from_value(value: f64) -> Self {
        let total = (value.abs() * CENTI_PER_UNIT as f64).round() as u64;

        Self {
            negative: value < 0.0 && total > 0,
            whole: total / CENTI_PER_UNIT,
            minutes: (total / CENTI_PER_MINUTE) % 60,
            centiseconds: total % CENTI_PER_MINUTE,
        }
    }

    pub fn seconds(&self) -> f64 {
        self.centiseconds as f64 / 100.0
    }

    fn sign(&self) -> &'static str {
        if self.negative { "-" } else { "" }
    }
}

impl fmt::Display for Sexagesimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}:{:02}:{:05.2}",
            self.sign(),
            self.whole,
            self.minutes,
            self.seconds()
        )
    }
}

/// Wraps a right ascension into `[0, 360)` and converts it to hours.
fn ra_hours(ra_deg: f64) -> Sexagesimal {
    let mut sexa = Sexagesimal::from_value(ra_deg.rem_euclid(360.0) / 15.0);
    sexa.whole %= 24;
    sexa
}

/// Right ascension as `HHh MMm`, seconds dropped.
pub fn format_ra_label(ra_deg: f64) -> String {
    let sexa = ra_hours(ra_deg);
    format!("{:02}h {:02}m", sexa.whole, sexa.minutes)
}

/// Declination as `±DD° MM'`, seconds dropped. Positive values carry no sign.
pub fn format_dec_label(dec_deg: f64) -> String {
    let sexa = Sexagesimal::from_value(dec_deg);
    format!("{}{:02}° {:02}'", sexa.sign(), sexa.whole, sexa.minutes)
}

/// Full-precision right ascension, e.g. `02h20m30.00s`.
pub fn format_ra_hms(ra_deg: f64) -> String {
    let sexa = ra_hours(ra_deg);
    format!(
        "{:02}h{:02}m{:05.2}s",
        sexa.whole,
        sexa.minutes,
        sexa.seconds()
    )
}

/// Full-precision declination, e.g. `+57d07m00.00s`.
pub fn format_dec_dms(dec_deg: f64) -> String {
    let sexa = Sexagesimal::from_value(dec_deg);
    let sign = if sexa.negative { '-' } else { '+' };
    format!(
        "{}{:02}d{:02}m{:05.2}s",
        sign,
        sexa.whole,
        sexa.minutes,
        sexa.seconds()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_exact_value() {
        // 57d07m00s = 57 + 7/60
        let sexa = Sexagesimal::from_value(57.0 + 7.0 / 60.0);
        assert_eq!(sexa.whole, 57);
        assert_eq!(sexa.minutes, 7);
        assert_eq!(sexa.centiseconds, 0);
        assert!(!sexa.negative);
    }

    #[test]
    fn rounding_carries_into_minutes() {
        // 59.999s rounds to 60.00s and must carry
        let value = 1.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        let sexa = Sexagesimal::from_value(value);
        assert_eq!(sexa.whole, 2);
        assert_eq!(sexa.minutes, 0);
        assert_eq!(sexa.centiseconds, 0);
    }

    #[test]
    fn ra_label_of_cluster_center() {
        // 02h20m30s = 35.125 deg
        assert_eq!(format_ra_label(35.125), "02h 20m");
        assert_eq!(format_ra_hms(35.125), "02h20m30.00s");
    }

    #[test]
    fn ra_label_wraps_around_zero() {
        // -0.25 deg is 359.75 deg = 23h59m
        assert_eq!(format_ra_label(-0.25), "23h 59m");
        assert_eq!(format_ra_label(360.0), "00h 00m");
        // 359.99999999 deg rounds up to 24h, which wraps to 0h
        assert_eq!(format_ra_label(359.999_999_99), "00h 00m");
    }

    #[test]
    fn dec_labels() {
        assert_eq!(format_dec_label(57.0 + 7.0 / 60.0), "57° 07'");
        assert_eq!(format_dec_label(-0.5), "-00° 30'");
        assert_eq!(format_dec_label(5.999_999_999), "06° 00'");
        assert_eq!(format_dec_dms(-12.5), "-12d30m00.00s");
        assert_eq!(format_dec_dms(57.0 + 7.0 / 60.0), "+57d07m00.00s");
    }

    #[test]
    fn tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(format_dec_label(-1e-9), "00° 00'");
    }

    #[test]
    fn display_uses_colons() {
        let sexa = Sexagesimal::from_value(-(10.0 + 5.0 / 60.0 + 3.25 / 3600.0));
        assert_eq!(sexa.to_string(), "-10:05:03.25");
    }
}

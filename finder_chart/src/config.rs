use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skysurvey::{CutoutRequest, FieldOfView, SkyCoord};

use crate::error::{ChartError, Result};

pub const DEFAULT_TARGET: &str = "02h20m30s +57d07m00s";
pub const DEFAULT_FOV_ARCMIN: f64 = 45.0;
pub const DEFAULT_OUTPUT: &str = "ngc_884_869_image.png";
pub const DEFAULT_TITLE: &str = "NGC 884 and NGC 869";

/// How tick positions are turned into sky coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Small-angle approximation around the centre. Degrades away from the
    /// centre and with large fields.
    #[default]
    Linear,
    /// TAN projection from the cutout's FITS header.
    Wcs,
}

/// Canvas size before trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width_px: 870,
            height_px: 570,
            dpi: 100,
        }
    }
}

impl FigureConfig {
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn size_inches(&self) -> (f64, f64) {
        (
            self.width_px as f64 / self.dpi as f64,
            self.height_px as f64 / self.dpi as f64,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart centre, sexagesimal or decimal degrees
    pub target: String,
    pub fov_arcmin: f64,
    pub survey: String,
    pub pixels: u32,
    pub timeout_secs: u64,
    /// Read the cutout from this FITS file instead of querying SkyView
    pub input_fits: Option<PathBuf>,
    pub output: PathBuf,
    pub title: String,
    pub projection: Projection,
    pub figure: FigureConfig,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            fov_arcmin: DEFAULT_FOV_ARCMIN,
            survey: skysurvey::DEFAULT_SURVEY.to_string(),
            pixels: skysurvey::DEFAULT_PIXELS,
            timeout_secs: skysurvey::DEFAULT_TIMEOUT.as_secs(),
            input_fits: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            projection: Projection::default(),
            figure: FigureConfig::default(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl ChartConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = common::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cutout_request()?;

        if self.pixels == 0 {
            return Err(ChartError::Config("pixels must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ChartError::Config(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        let figure = &self.figure;
        if figure.width_px == 0 || figure.height_px == 0 || figure.dpi == 0 {
            return Err(ChartError::Config(format!(
                "figure must have non-zero size and dpi, got {}x{} at {} dpi",
                figure.width_px, figure.height_px, figure.dpi
            )));
        }
        Ok(())
    }

    pub fn target(&self) -> Result<SkyCoord> {
        Ok(SkyCoord::parse(&self.target)?)
    }

    pub fn field_of_view(&self) -> Result<FieldOfView> {
        Ok(FieldOfView::from_arcmin(self.fov_arcmin)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cutout_request(&self) -> Result<CutoutRequest> {
        Ok(CutoutRequest {
            center: self.target()?,
            fov: self.field_of_view()?,
            survey: self.survey.clone(),
            pixels: self.pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_double_cluster_chart() {
        let config = ChartConfig::default();
        config.validate().unwrap();

        let request = config.cutout_request().unwrap();
        assert!((request.center.ra_deg() - 35.125).abs() < 1e-9);
        assert!((request.fov.degrees() - 0.75).abs() < 1e-12);
        assert_eq!(request.survey, "DSS2 Red");
        assert_eq!(config.output, PathBuf::from("ngc_884_869_image.png"));
        assert_eq!(config.projection, Projection::Linear);
        assert_eq!(config.figure.size_inches(), (8.7, 5.7));
    }

    #[test]
    fn points_convert_at_figure_dpi() {
        let figure = FigureConfig::default();
        assert!((figure.points_to_px(72.0) - 100.0).abs() < 1e-12);
        assert!((figure.points_to_px(14.0) - 19.444_444).abs() < 1e-5);
    }

    #[test]
    fn load_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.yaml");
        std::fs::write(
            &path,
            "target: \"05h35m17s -05d23m28s\"\nfov_arcmin: 30\nprojection: wcs\nfigure:\n  dpi: 150\n",
        )
        .unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert_eq!(config.fov_arcmin, 30.0);
        assert_eq!(config.projection, Projection::Wcs);
        assert_eq!(config.figure.dpi, 150);
        assert_eq!(config.figure.width_px, 870);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(config.target().unwrap().dec_deg() < -5.0);
    }

    #[test]
    fn load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, r#"{"title": "M45", "pixels": 600}"#).unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert_eq!(config.title, "M45");
        assert_eq!(config.pixels, 600);
    }

    #[test]
    fn validation_failures() {
        let bad_target = ChartConfig {
            target: "nowhere".to_string(),
            ..ChartConfig::default()
        };
        assert!(matches!(
            bad_target.validate(),
            Err(ChartError::Survey(skysurvey::Error::CoordinateParse { .. }))
        ));

        let bad_fov = ChartConfig {
            fov_arcmin: 0.0,
            ..ChartConfig::default()
        };
        assert!(bad_fov.validate().is_err());

        let bad_figure = ChartConfig {
            figure: FigureConfig {
                dpi: 0,
                ..FigureConfig::default()
            },
            ..ChartConfig::default()
        };
        assert!(matches!(bad_figure.validate(), Err(ChartError::Config(_))));

        let bad_pixels = ChartConfig {
            pixels: 0,
            ..ChartConfig::default()
        };
        assert!(matches!(bad_pixels.validate(), Err(ChartError::Config(_))));
    }
}

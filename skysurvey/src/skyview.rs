//! NASA SkyView cutout client.
//!
//! One blocking GET against `runquery.pl` returning a FITS primary HDU. There
//! is no cache and no retry; any failure is returned to the caller.

use std::time::Duration;

use reqwest::Url;

use crate::error::{Error, Result};
use crate::fits::is_fits;
use crate::survey::{CutoutRequest, ImageSource, SurveyImage};

pub const SKYVIEW_URL: &str = "https://skyview.gsfc.nasa.gov/current/cgi/runquery.pl";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug)]
pub struct SkyViewClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl SkyViewClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(SKYVIEW_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("finder-chart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| Error::Http {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { base_url, client })
    }

    /// Query parameters for a cutout. Sizes are in degrees.
    pub fn query_params(request: &CutoutRequest) -> Vec<(&'static str, String)> {
        let size = request.fov.degrees();
        vec![
            (
                "Position",
                format!("{},{}", request.center.ra_deg(), request.center.dec_deg()),
            ),
            ("Survey", request.survey.clone()),
            ("Coordinates", "J2000".to_string()),
            ("Projection", "Tan".to_string()),
            ("Pixels", format!("{},{}", request.pixels, request.pixels)),
            ("Size", format!("{},{}", size, size)),
            ("Return", "FITS".to_string()),
        ]
    }

    pub fn request_url(&self, request: &CutoutRequest) -> Result<Url> {
        Url::parse_with_params(&self.base_url, Self::query_params(request))
            .map_err(|_| Error::InvalidUrl(self.base_url.clone()))
    }

    fn download(&self, request: &CutoutRequest) -> Result<Vec<u8>> {
        let url = self.request_url(request)?;
        tracing::info!("Requesting {} cutout from {}", request.survey, url);

        let http_error = |source| Error::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().map_err(http_error)?;

        if !response.status().is_success() {
            return Err(Error::ServiceStatus {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().map_err(http_error)?;
        tracing::debug!("Received {} bytes from SkyView", bytes.len());

        if !is_fits(&bytes) {
            // SkyView reports bad surveys and positions as HTML with a 200 status
            let preview: String = String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
                .chars()
                .filter(|c| !c.is_control())
                .collect();
            return Err(Error::MalformedFits(format!(
                "service did not return FITS data: {}",
                preview
            )));
        }

        Ok(bytes.to_vec())
    }
}

impl ImageSource for SkyViewClient {
    fn fetch(&self, request: &CutoutRequest) -> Result<SurveyImage> {
        let bytes = self.download(request)?;
        SurveyImage::from_fits_bytes(&bytes)
    }
}

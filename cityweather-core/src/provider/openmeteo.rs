use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    model::{CurrentWeather, GeocodeResult},
};

use super::{Geocoder, WeatherSource};

/// Candidates requested per lookup.
const CANDIDATE_COUNT: &str = "5";
/// Language of place names in geocoding results.
const LANGUAGE: &str = "en";
/// Unit of `windspeed` in current conditions, pinned so the rendered label holds.
const WINDSPEED_UNIT: &str = "kmh";

/// Open-Meteo geocoding + forecast APIs. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            geocoding_url: config.geocoding.base_url.clone(),
            forecast_url: config.forecast.base_url.clone(),
            http,
        })
    }

    /// GETs `url` and decodes the body as `T`.
    ///
    /// A literal `null` body decodes to `None`. An error status whose body is
    /// still well-formed JSON is decoded like a success, so an
    /// `{"error": true, ...}` answer reads as "nothing found" rather than as a
    /// transport failure; only an error status with an undecodable body fails.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<Option<T>> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        debug!(%status, bytes = body.len(), "{what} response");

        match serde_json::from_str::<Option<T>>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    warn!(
                        %status,
                        body = %truncate_body(&body),
                        "Open-Meteo {what} answered with an error status"
                    );
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            )),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
}

#[async_trait]
impl Geocoder for OpenMeteoProvider {
    #[instrument(level = "debug", skip(self))]
    async fn lookup(&self, query: &str) -> Result<Vec<GeocodeResult>> {
        let parsed: Option<OmGeocodeResponse> = self
            .get_json(
                &self.geocoding_url,
                &[("name", query), ("count", CANDIDATE_COUNT), ("language", LANGUAGE)],
                "geocoding",
            )
            .await?;

        let results = parsed.and_then(|p| p.results).unwrap_or_default();
        debug!(candidates = results.len(), "geocoding candidates");
        Ok(results)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    #[instrument(level = "debug", skip(self))]
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Option<CurrentWeather>> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let parsed: Option<OmForecastResponse> = self
            .get_json(
                &self.forecast_url,
                &[
                    ("latitude", latitude.as_str()),
                    ("longitude", longitude.as_str()),
                    ("current_weather", "true"),
                    ("windspeed_unit", WINDSPEED_UNIT),
                    ("timezone", "auto"),
                ],
                "forecast",
            )
            .await?;

        Ok(parsed.and_then(|p| p.current_weather))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

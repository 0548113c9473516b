use serde::{Deserialize, Serialize};

/// One candidate location returned by the geocoding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub name: String,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeResult {
    /// Human-readable label: name, region and country joined with ", ",
    /// skipping whichever of the optional parts are absent or blank.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(
            [self.admin1.as_deref(), self.country.as_deref()]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty()),
        );
        parts.join(", ")
    }
}

/// Current conditions exactly as the provider reported them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    pub windspeed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winddirection: Option<f64>,
    pub time: String,
}

/// Outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub display_name: String,
    pub weather: CurrentWeather,
}

use crate::model::{CurrentWeather, GeocodeResult};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Resolves free text to candidate locations, in the provider's order.
///
/// `Ok(vec![])` means the lookup worked but nothing matched; `Err` is reserved
/// for transport-level failures.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn lookup(&self, query: &str) -> anyhow::Result<Vec<GeocodeResult>>;
}

/// Fetches current conditions for a coordinate.
///
/// `Ok(None)` means the provider answered without a current-conditions block.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current(&self, latitude: f64, longitude: f64)
    -> anyhow::Result<Option<CurrentWeather>>;
}

/// Picks the location to use out of the geocoder's candidates.
pub trait LocationSelector: Send + Sync + Debug {
    fn select<'a>(&self, candidates: &'a [GeocodeResult]) -> Option<&'a GeocodeResult>;
}

/// Takes whatever the provider listed first. There is no scoring or
/// disambiguation: "Springfield" resolves to the provider's top hit, which may
/// not be the one the user meant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl LocationSelector for FirstCandidate {
    fn select<'a>(&self, candidates: &'a [GeocodeResult]) -> Option<&'a GeocodeResult> {
        candidates.first()
    }
}

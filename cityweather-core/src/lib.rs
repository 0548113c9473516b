//! Core library for the `city-weather` tool.
//!
//! This crate defines:
//! - The search orchestrator: city name -> geocoding -> current conditions
//! - Observable search state for front-ends to render
//! - Abstraction over the geocoding and weather providers (Open-Meteo by default)
//! - Configuration handling
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;

pub use config::Config;
pub use error::{ErrorKind, SearchError};
pub use model::{CurrentWeather, GeocodeResult, WeatherReport};
pub use provider::{FirstCandidate, Geocoder, LocationSelector, OpenMeteoProvider, WeatherSource};
pub use search::{SearchPhase, SearchState, WeatherSearch};

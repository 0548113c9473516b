use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a search ended without a report.
///
/// Each kind maps to one fixed, user-facing message; no other detail leaves
/// the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptyQuery,
    LocationNotFound,
    WeatherUnavailable,
    Transport,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::EmptyQuery => "Please enter a city name.",
            ErrorKind::LocationNotFound => "City not found. Try a different name or spelling.",
            ErrorKind::WeatherUnavailable => "Weather data not available for this location.",
            ErrorKind::Transport => {
                "Something went wrong while fetching data. Check your connection."
            }
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{}", ErrorKind::EmptyQuery)]
    EmptyQuery,

    #[error("{}", ErrorKind::LocationNotFound)]
    LocationNotFound,

    #[error("{}", ErrorKind::WeatherUnavailable)]
    WeatherUnavailable,

    /// Network failure, bad status, unparseable body or timeout. The cause is
    /// kept for logs only.
    #[error("{}", ErrorKind::Transport)]
    Transport(#[source] anyhow::Error),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::EmptyQuery => ErrorKind::EmptyQuery,
            SearchError::LocationNotFound => ErrorKind::LocationNotFound,
            SearchError::WeatherUnavailable => ErrorKind::WeatherUnavailable,
            SearchError::Transport(_) => ErrorKind::Transport,
        }
    }
}

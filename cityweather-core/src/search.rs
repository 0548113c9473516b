//! The search orchestrator: query guard, geocode step, weather step, and the
//! observable [`SearchState`] they drive.

use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{ErrorKind, SearchError},
    model::WeatherReport,
    provider::{FirstCandidate, Geocoder, LocationSelector, OpenMeteoProvider, WeatherSource},
};

/// Where the most recent search stands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Succeeded(WeatherReport),
    Failed(ErrorKind),
}

/// Snapshot published to subscribers after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    #[serde(skip)]
    generation: u64,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Loading)
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self.phase {
            SearchPhase::Failed(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&WeatherReport> {
        match &self.phase {
            SearchPhase::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    /// Number of searches started so far, the empty-query ones included.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Drives a city lookup through the geocoder and the weather source.
///
/// Cloning is cheap and clones share state. Every call to [`search`] starts a
/// new generation; when an older call finishes after a newer one began, its
/// outcome is still returned to its caller but never written to the shared
/// state.
///
/// [`search`]: WeatherSearch::search
#[derive(Debug, Clone)]
pub struct WeatherSearch {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherSource>,
    selector: Arc<dyn LocationSelector>,
    timeout: Option<Duration>,
    state: Arc<watch::Sender<SearchState>>,
}

impl WeatherSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherSource>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            geocoder,
            weather,
            selector: Arc::new(FirstCandidate),
            timeout: None,
            state: Arc::new(state),
        }
    }

    /// Open-Meteo for both steps, with endpoints and timeout from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = Arc::new(OpenMeteoProvider::new(config)?);
        Ok(Self::new(provider.clone(), provider).with_timeout(config.timeout()))
    }

    pub fn with_selector(mut self, selector: Arc<dyn LocationSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Bound for the geocode and weather steps together. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub async fn search(&self, query: &str) -> Result<WeatherReport, SearchError> {
        let trimmed = query.trim();

        if trimmed.is_empty() {
            self.state.send_modify(|state| {
                state.generation += 1;
                state.query = query.to_string();
                state.phase = SearchPhase::Failed(ErrorKind::EmptyQuery);
            });
            return Err(SearchError::EmptyQuery);
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.query = query.to_string();
            state.phase = SearchPhase::Loading;
            generation = state.generation;
        });
        let guard = LoadingGuard { state: &self.state, generation, settled: false };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(trimmed))
                .await
                .unwrap_or_else(|_| {
                    Err(SearchError::Transport(anyhow!("search timed out after {limit:?}")))
                }),
            None => self.run(trimmed).await,
        };

        if let Err(SearchError::Transport(cause)) = &outcome {
            warn!(query = trimmed, error = %format!("{cause:#}"), "weather search failed");
        }

        let phase = match &outcome {
            Ok(report) => SearchPhase::Succeeded(report.clone()),
            Err(err) => SearchPhase::Failed(err.kind()),
        };
        guard.settle(phase);

        outcome
    }

    async fn run(&self, query: &str) -> Result<WeatherReport, SearchError> {
        let candidates = self.geocoder.lookup(query).await.map_err(SearchError::Transport)?;

        let place = self.selector.select(&candidates).ok_or(SearchError::LocationNotFound)?;
        let display_name = place.display_name();
        debug!(
            candidates = candidates.len(),
            chosen = %display_name,
            latitude = place.latitude,
            longitude = place.longitude,
            "location resolved"
        );

        let weather = self
            .weather
            .current(place.latitude, place.longitude)
            .await
            .map_err(SearchError::Transport)?
            .ok_or(SearchError::WeatherUnavailable)?;

        Ok(WeatherReport { display_name, weather })
    }
}

/// Owns the `Loading` phase of one generation and makes sure it ends, whether
/// the search settles normally, its future is dropped, or a collaborator
/// panics.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SearchState>,
    generation: u64,
    settled: bool,
}

impl LoadingGuard<'_> {
    fn settle(mut self, phase: SearchPhase) {
        self.write(phase);
        self.settled = true;
    }

    fn write(&self, phase: SearchPhase) {
        let generation = self.generation;
        let written = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.phase = phase;
            true
        });
        if !written {
            debug!(generation, "discarding outcome of superseded search");
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if std::thread::panicking() {
            self.write(SearchPhase::Failed(ErrorKind::Transport));
        } else {
            self.write(SearchPhase::Idle);
        }
    }
}

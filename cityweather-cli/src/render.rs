use cityweather_core::{SearchPhase, SearchState, WeatherReport};

pub const IDLE_HINT: &str = "Search any city to view weather details.";
pub const LOADING: &str = "...";

/// Result block: place, temperature, wind, optional direction, timestamp.
/// Numbers are printed as the provider sent them.
pub fn report(report: &WeatherReport) -> String {
    let w = &report.weather;
    let mut lines = vec![
        report.display_name.clone(),
        format!("{}°C", w.temperature),
        format!("Wind: {} km/h", w.windspeed),
    ];
    if let Some(direction) = w.winddirection {
        lines.push(format!("Direction: {direction}°"));
    }
    lines.push(format!("Time: {}", w.time));
    lines.join("\n")
}

pub fn state(state: &SearchState) -> String {
    match &state.phase {
        SearchPhase::Idle => IDLE_HINT.to_string(),
        SearchPhase::Loading => LOADING.to_string(),
        SearchPhase::Succeeded(r) => report(r),
        SearchPhase::Failed(kind) => kind.message().to_string(),
    }
}

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use cityweather_core::{Config, WeatherSearch};
use inquire::{CustomType, InquireError, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "city-weather", version, about = "Current weather for any city")]
pub struct Cli {
    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for city names until Esc or Ctrl-C.
    Interactive,

    /// Show current weather for one city and exit.
    Show {
        /// City name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Edit endpoints and timeout interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let search = WeatherSearch::from_config(&Config::load()?)?;
                let report = search
                    .search(&city.join(" "))
                    .await
                    .map_err(|err| anyhow!(err.kind().message()))?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", render::report(&report));
                }
                Ok(())
            }
            Command::Interactive => {
                let search = WeatherSearch::from_config(&Config::load()?)?;
                interactive(&search).await
            }
        }
    }
}

async fn interactive(search: &WeatherSearch) -> anyhow::Result<()> {
    println!("{}", render::IDLE_HINT);

    loop {
        let query = match Text::new("City:").with_placeholder("Search any city...").prompt() {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        search_with_indicator(search, &query).await;
        println!("{}", render::state(&search.state()));
    }

    Ok(())
}

/// Runs one search, printing the loading marker when the state enters `Loading`.
async fn search_with_indicator(search: &WeatherSearch, query: &str) {
    let mut updates = search.subscribe();
    let mut pending = std::pin::pin!(search.search(query));

    loop {
        tokio::select! {
            _ = &mut pending => return,
            Ok(()) = updates.changed() => {
                if updates.borrow_and_update().is_loading() {
                    eprintln!("{}", render::LOADING);
                }
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    cfg.geocoding.base_url =
        Text::new("Geocoding endpoint:").with_default(&cfg.geocoding.base_url).prompt()?;
    cfg.forecast.base_url =
        Text::new("Forecast endpoint:").with_default(&cfg.forecast.base_url).prompt()?;
    cfg.timeout_secs = CustomType::<u64>::new("Timeout in seconds (0 disables):")
        .with_default(cfg.timeout_secs)
        .prompt()?;

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["city-weather"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_joins_words_of_the_city() {
        let cli = Cli::try_parse_from(["city-weather", "-v", "show", "New", "York", "--json"])
            .expect("parses");

        match cli.command {
            Some(Command::Show { city, json }) => {
                assert_eq!(city.join(" "), "New York");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["city-weather", "show"]).is_err());
    }
}

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use skyglass_core::{
    Config, FileStore, LookupOutcome, RecentSearchLedger, SessionController, UnitPreference,
    location::geolocator_from_config, provider::fetcher_from_config,
};

use crate::terminal::{TerminalDisplay, print_recent};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyglass", version, about = "Current weather at a glance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, default city and temperature unit.
    Configure,

    /// Show weather for a city; without one, for the current location.
    Show {
        /// City name, e.g. "Benoni".
        city: Option<String>,

        /// Temperature unit for this lookup: celsius or fahrenheit.
        #[arg(long)]
        unit: Option<UnitPreference>,
    },

    /// Show weather for the current location.
    Here {
        #[arg(long)]
        unit: Option<UnitPreference>,
    },

    /// List recent searches.
    Recent {
        /// Choose one and look it up.
        #[arg(long)]
        pick: bool,
    },

    /// Look up cities interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => {
                configure(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, unit } => {
                let session = build_session(&config, unit, false)?;
                let outcome = match city {
                    Some(city) => session.lookup_by_city(&city).await,
                    None => session.initialize().await,
                };
                Ok(exit_code(&outcome))
            }
            Command::Here { unit } => {
                let session = build_session(&config, unit, false)?;
                Ok(exit_code(&session.lookup_by_current_location().await))
            }
            Command::Recent { pick: false } => {
                let store = Arc::new(FileStore::new(Config::store_file_path()?));
                print_recent(RecentSearchLedger::load(store).entries());
                Ok(ExitCode::SUCCESS)
            }
            Command::Recent { pick: true } => {
                let session = build_session(&config, None, false)?;
                match pick_recent(&session)? {
                    Some(index) => Ok(exit_code(&session.lookup_recent(index).await)),
                    None => Ok(ExitCode::SUCCESS),
                }
            }
            Command::Interactive => {
                let session = build_session(&config, None, true)?;
                interactive(&session).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_session(
    config: &Config,
    unit: Option<UnitPreference>,
    show_recent: bool,
) -> anyhow::Result<SessionController> {
    let fetcher = fetcher_from_config(config)?;
    let geolocator = geolocator_from_config(config)?;
    let store = Arc::new(FileStore::new(Config::store_file_path()?));

    let mut settings = config.session_settings();
    if let Some(unit) = unit {
        settings.unit = unit;
    }

    Ok(SessionController::new(
        fetcher,
        geolocator,
        store,
        Arc::new(TerminalDisplay::new(show_recent)),
        settings,
    ))
}

fn exit_code(outcome: &LookupOutcome) -> ExitCode {
    if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let current_city = config.default_city().to_string();
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let units = vec![UnitPreference::Celsius, UnitPreference::Fahrenheit];
    let cursor = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read temperature unit")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Index of the chosen recent search, or `None` if there is nothing to pick
/// or the prompt was dismissed.
fn pick_recent(session: &SessionController) -> anyhow::Result<Option<usize>> {
    let recent = session.recent_searches();
    if recent.is_empty() {
        println!("No recent searches.");
        return Ok(None);
    }

    match Select::new("Recent searches:", recent).raw_prompt() {
        Ok(choice) => Ok(Some(choice.index)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read selection"),
    }
}

const INTERACTIVE_HELP: &str = ":c / :f set units, :u toggles, :here, :recent, :quit";

async fn interactive(session: &SessionController) -> anyhow::Result<()> {
    session.initialize().await;

    loop {
        let input = match Text::new("City:")
            .with_help_message(INTERACTIVE_HELP)
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match input.trim() {
            ":q" | ":quit" => break,
            ":c" => session.change_unit(UnitPreference::Celsius),
            ":f" => session.change_unit(UnitPreference::Fahrenheit),
            ":u" => session.change_unit(session.unit().toggled()),
            ":here" => {
                session.lookup_by_current_location().await;
            }
            ":recent" => {
                if let Some(index) = pick_recent(session)? {
                    session.lookup_recent(index).await;
                }
            }
            city => {
                session.lookup_by_city(city).await;
            }
        }
    }

    Ok(())
}

use std::{future::Future, time::Duration};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, MultiSelect, Password, PasswordDisplayMode, Text};
use meteo_core::{
    AlertKind, Config, NotificationPreferences, ScreenState,
    clock::{format_clock, local_now, spawn_clock},
    preferences::FilePreferenceStore,
    provider::provider_from_config,
    view::{load_current_screen, load_forecast_screen},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather for your city")]
pub struct Cli {
    /// Debug-level logging on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the city to show.
    Configure,

    /// Current weather.
    Today,

    /// 5-day forecast in 3-hour steps.
    Forecast,

    /// Show or change weather-alert toggles.
    Alerts {
        #[command(subcommand)]
        action: Option<AlertsAction>,
    },

    /// Show the current date and time, refreshed periodically, until Ctrl-C.
    Clock,
}

#[derive(Debug, Subcommand)]
pub enum AlertsAction {
    /// Print every toggle.
    List,

    /// Flip one toggle.
    Toggle {
        /// rain, storm, snow, temperature or wind.
        kind: String,
    },

    /// Set one toggle explicitly.
    Set {
        /// rain, storm, snow, temperature or wind.
        kind: String,

        /// on/off.
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("expected on/off, got '{value}'")),
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Today => today(&Config::load()?).await,
            Command::Forecast => forecast(&Config::load()?).await,
            Command::Alerts { action } => alerts(action),
            Command::Clock => clock(&Config::load()?).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    let location = Text::new("City:").with_default(&config.location).prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.location = location.trim().to_string();
    config.save()?;

    info!(path = %Config::config_file_path()?.display(), "Configuration saved");
    println!("Configuration saved. City: {}", config.location);
    Ok(())
}

async fn today(config: &Config) -> Result<()> {
    let api_key = config.api_key()?;
    let provider = provider_from_config(config)?;

    let provider = &*provider;
    let location = config.location.as_str();
    let api_key = api_key.as_str();

    let loaded = run_screen(render::LOADING_WEATHER, move || {
        load_current_screen(provider, location, api_key)
    })
    .await?;

    if let Some(view) = loaded {
        print!("{}", render::current(&view, &format_clock(local_now())));
    }
    Ok(())
}

async fn forecast(config: &Config) -> Result<()> {
    let api_key = config.api_key()?;
    let provider = provider_from_config(config)?;

    let provider = &*provider;
    let location = config.location.as_str();
    let api_key = api_key.as_str();

    let loaded = run_screen(render::LOADING_FORECAST, move || {
        load_forecast_screen(provider, location, api_key)
    })
    .await?;

    if let Some(view) = loaded {
        print!("{}", render::forecast(&view));
    }
    Ok(())
}

/// Loads a screen, offering a retry after every failure. `None` when the
/// user gives up.
async fn run_screen<T, F, Fut>(loading_text: &str, mut load: F) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScreenState<T>>,
{
    loop {
        eprintln!("{loading_text}");

        match load().await {
            ScreenState::Ready(view) => return Ok(Some(view)),
            ScreenState::Failed(message) => {
                println!("{message}");
                if !ask_retry()? {
                    return Ok(None);
                }
                debug!("Retrying screen load");
            }
            ScreenState::Loading => {
                return Err(anyhow!("Screen loader finished without a result"));
            }
        }
    }
}

fn ask_retry() -> Result<bool> {
    match Confirm::new("Повторить?").with_default(true).prompt() {
        Ok(answer) => Ok(answer),
        // Piped or scripted use: nobody to ask.
        Err(InquireError::NotTTY) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn alerts(action: Option<AlertsAction>) -> Result<()> {
    let mut store = FilePreferenceStore::open_default()?;
    let mut prefs = NotificationPreferences::load(&store)?;
    debug!(path = %store.path().display(), "Notification preferences loaded");

    match action {
        Some(AlertsAction::List) => {}
        Some(AlertsAction::Toggle { kind }) => {
            let kind = AlertKind::try_from(kind.as_str())?;
            prefs.toggle(kind, &mut store)?;
        }
        Some(AlertsAction::Set { kind, enabled }) => {
            let kind = AlertKind::try_from(kind.as_str())?;
            prefs.set(kind, enabled, &mut store)?;
        }
        None => edit_alerts(&mut prefs, &mut store)?,
    }

    print!("{}", render::alerts(&prefs));
    Ok(())
}

/// Interactive multi-select; every changed toggle is written as it is applied.
fn edit_alerts(
    prefs: &mut NotificationPreferences,
    store: &mut FilePreferenceStore,
) -> Result<()> {
    let options: Vec<AlertOption> = AlertKind::all().iter().copied().map(AlertOption).collect();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| prefs.is_enabled(o.0))
        .map(|(i, _)| i)
        .collect();

    let selected = MultiSelect::new("Настройка уведомлений", options)
        .with_default(&defaults)
        .prompt()?;

    for kind in AlertKind::all() {
        let enabled = selected.iter().any(|o| o.0 == *kind);
        if prefs.is_enabled(*kind) != enabled {
            prefs.set(*kind, enabled, store)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct AlertOption(AlertKind);

impl std::fmt::Display for AlertOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.0.emoji(), self.0.title(), self.0.subtitle())
    }
}

async fn clock(config: &Config) -> Result<()> {
    let cancel = CancellationToken::new();
    let mut handle =
        spawn_clock(Duration::from_secs(config.clock_refresh_secs), cancel.clone(), local_now);

    println!("{}", handle.display.borrow_and_update().as_str());

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                cancel.cancel();
                break;
            }
            changed = handle.display.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", handle.display.borrow_and_update().as_str());
            }
        }
    }

    handle.task.await.context("Clock task failed")?;
    Ok(())
}

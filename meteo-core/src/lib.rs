//! Core library for the `meteo` weather display.
//!
//! This crate defines:
//! - The OpenWeather client (current conditions + 5-day forecast)
//! - Pure mappings from provider fields to display values
//! - Screen models and their load state
//! - Notification preferences and their persistence
//! - Configuration handling and the refreshing clock
//!
//! It is used by `meteo-cli`, but any front-end can drive it.

pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod preferences;
pub mod presentation;
pub mod provider;
pub mod view;

pub use config::Config;
pub use error::WeatherError;
pub use model::{ConditionEntry, ForecastEntry, ForecastList, WeatherSnapshot};
pub use preferences::{AlertKind, NotificationPreferences, PreferenceStore};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
pub use view::{CurrentView, ForecastView, ScreenState};

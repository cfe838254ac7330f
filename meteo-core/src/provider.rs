use crate::{
    Config, WeatherError,
    model::{ForecastList, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// A source of current conditions and forecasts.
///
/// Every call is one independent request: implementations keep no state
/// between calls beyond their transport configuration.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &str, api_key: &str) -> Result<WeatherSnapshot, WeatherError>;

    async fn forecast(&self, location: &str, api_key: &str) -> Result<ForecastList, WeatherError>;
}

/// Construct the OpenWeather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let client = OpenWeatherClient::new(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Box::new(client))
}

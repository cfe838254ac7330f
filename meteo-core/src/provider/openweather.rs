use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    WeatherError,
    model::{ConditionEntry, ForecastEntry, ForecastList, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "data/2.5/weather";
const FORECAST_PATH: &str = "data/2.5/forecast";

/// Client for the OpenWeather 2.5 `weather` and `forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, api_key))]
    pub async fn fetch_current(
        &self,
        location: &str,
        api_key: &str,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json(CURRENT_PATH, location, api_key).await?;
        let snapshot = parsed.into_snapshot()?;

        debug!(
            location = %snapshot.location_name,
            temperature_c = snapshot.temperature_c,
            humidity_pct = snapshot.humidity_pct,
            pressure_hpa = snapshot.pressure_hpa,
            wind_speed = snapshot.wind_speed,
            "Received current weather"
        );

        Ok(snapshot)
    }

    #[instrument(skip(self, api_key))]
    pub async fn fetch_forecast(
        &self,
        location: &str,
        api_key: &str,
    ) -> Result<ForecastList, WeatherError> {
        let parsed: OwForecastResponse = self.get_json(FORECAST_PATH, location, api_key).await?;

        let entries = parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_entry)
            .collect::<Result<ForecastList, _>>()?;

        debug!(entries = entries.len(), "Received forecast");

        Ok(entries)
    }

    /// One GET against `path`; classifies failures at the transport layer.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        location: &str,
        api_key: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            // the URL carries the API key in its query string
            .map_err(|e| WeatherError::from(e.without_url()))
            .inspect_err(|e| warn!(error = %e, url = %url, "OpenWeather request failed"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::from(e.without_url()))?;

        if !status.is_success() {
            let err = WeatherError::Provider {
                status: status.as_u16(),
                message: provider_message(&body),
            };
            warn!(error = %err, url = %url, "OpenWeather returned an error status");
            return Err(err);
        }

        serde_json::from_str(&body)
            .map_err(WeatherError::from)
            .inspect_err(|e| warn!(error = %e, url = %url, "Unexpected OpenWeather response"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, location: &str, api_key: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(location, api_key).await
    }

    async fn forecast(&self, location: &str, api_key: &str) -> Result<ForecastList, WeatherError> {
        self.fetch_forecast(location, api_key).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    pressure: i32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    wind: Option<OwWind>,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    wind: Option<OwWind>,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherError> {
        Ok(WeatherSnapshot {
            location_name: self.name,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            wind_speed: wind_speed(self.wind.as_ref()),
            pressure_hpa: self.main.pressure,
            conditions: conditions(self.weather)?,
        })
    }
}

impl OwForecastEntry {
    fn into_entry(self) -> Result<ForecastEntry, WeatherError> {
        Ok(ForecastEntry {
            wind_speed: wind_speed(self.wind.as_ref()),
            conditions: conditions(self.weather)?,
            timestamp: self.dt_txt,
            temperature_c: self.main.temp,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
        })
    }
}

fn conditions(weather: Vec<OwWeather>) -> Result<Vec<ConditionEntry>, WeatherError> {
    if weather.is_empty() {
        return Err(WeatherError::Decode("response contained no weather conditions".to_string()));
    }

    Ok(weather
        .into_iter()
        .map(|w| ConditionEntry { description: w.description, icon_code: w.icon })
        .collect())
}

// Float-to-int `as` saturates, so negative or NaN speeds become 0.
fn wind_speed(wind: Option<&OwWind>) -> u32 {
    wind.map(|w| w.speed.trunc() as u32).unwrap_or(0)
}

/// The provider's own `message` when the body carries one, else the raw body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

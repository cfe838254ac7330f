//! Display-ready screen models and the per-screen load state.

use tracing::info;

use crate::{
    WeatherError,
    model::{ForecastEntry, WeatherSnapshot},
    presentation::{
        Background, DEFAULT_EMOJI, background_for, emoji_for, format_forecast_timestamp,
        format_humidity, format_pressure, format_temperature, format_wind,
        translate_description, translate_location_name,
    },
    provider::WeatherProvider,
};

/// State of one screen. Retrying means running the loader again.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Loading,
    Ready(T),
    /// User-facing error text.
    Failed(String),
}

impl<T> Default for ScreenState<T> {
    fn default() -> Self {
        ScreenState::Loading
    }
}

impl<T> ScreenState<T> {
    pub fn from_result(result: Result<T, WeatherError>) -> Self {
        match result {
            Ok(value) => ScreenState::Ready(value),
            Err(err) => ScreenState::Failed(err.user_message()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }
}

/// The "today" screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub location: String,
    pub description: String,
    pub emoji: &'static str,
    pub background: Background,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
}

impl CurrentView {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let condition = snapshot.primary_condition();

        Self {
            location: translate_location_name(&snapshot.location_name),
            description: condition
                .map(|c| translate_description(&c.description))
                .unwrap_or_default(),
            emoji: condition.map(|c| emoji_for(&c.description)).unwrap_or(DEFAULT_EMOJI),
            background: condition.map(|c| background_for(&c.description)).unwrap_or_default(),
            temperature: format_temperature(snapshot.temperature_c),
            humidity: format_humidity(snapshot.humidity_pct),
            wind: format_wind(snapshot.wind_speed),
            pressure: format_pressure(snapshot.pressure_hpa),
        }
    }
}

/// One line of the forecast list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    pub when: String,
    pub emoji: &'static str,
    pub description: String,
    pub temperature: String,
}

impl ForecastRow {
    pub fn from_entry(entry: &ForecastEntry) -> Result<Self, WeatherError> {
        let condition = entry.primary_condition();

        Ok(Self {
            when: format_forecast_timestamp(&entry.timestamp)?,
            emoji: condition.map(|c| emoji_for(&c.description)).unwrap_or(DEFAULT_EMOJI),
            description: condition
                .map(|c| translate_description(&c.description))
                .unwrap_or_default(),
            temperature: format_temperature(entry.temperature_c),
        })
    }
}

/// The forecast screen: background from the first entry, one row per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastView {
    pub background: Background,
    pub rows: Vec<ForecastRow>,
}

impl ForecastView {
    pub fn from_entries(entries: &[ForecastEntry]) -> Result<Self, WeatherError> {
        let background = entries
            .first()
            .and_then(ForecastEntry::primary_condition)
            .map(|c| background_for(&c.description))
            .unwrap_or_default();

        let rows = entries.iter().map(ForecastRow::from_entry).collect::<Result<_, _>>()?;

        Ok(Self { background, rows })
    }
}

/// Fetches current conditions once and folds the outcome into a screen state.
pub async fn load_current_screen(
    provider: &dyn WeatherProvider,
    location: &str,
    api_key: &str,
) -> ScreenState<CurrentView> {
    let result = provider.current(location, api_key).await.map(|s| CurrentView::from_snapshot(&s));
    log_outcome("today", &result);
    ScreenState::from_result(result)
}

/// Fetches the forecast once and folds the outcome into a screen state.
pub async fn load_forecast_screen(
    provider: &dyn WeatherProvider,
    location: &str,
    api_key: &str,
) -> ScreenState<ForecastView> {
    let result = provider
        .forecast(location, api_key)
        .await
        .and_then(|entries| ForecastView::from_entries(&entries));
    log_outcome("forecast", &result);
    ScreenState::from_result(result)
}

fn log_outcome<T>(screen: &str, result: &Result<T, WeatherError>) {
    match result {
        Ok(_) => info!(screen, "Screen loaded"),
        Err(err) => info!(screen, network = err.is_network(), error = %err, "Screen failed to load"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionEntry, ForecastList};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn condition(description: &str) -> ConditionEntry {
        ConditionEntry { description: description.to_string(), icon_code: "01d".to_string() }
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Yoshkar-Ola".to_string(),
            temperature_c: -7.6,
            humidity_pct: 81,
            wind_speed: 5,
            pressure_hpa: 1013,
            conditions: vec![condition("light snow")],
        }
    }

    fn entry(timestamp: &str, description: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: timestamp.to_string(),
            temperature_c: temp,
            humidity_pct: 60,
            wind_speed: 2,
            pressure_hpa: 1000,
            conditions: vec![condition(description)],
        }
    }

    #[derive(Debug, Default)]
    struct FakeProvider {
        fail_network: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, _: &str, _: &str) -> Result<WeatherSnapshot, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_network {
                return Err(WeatherError::Network("dns error".into()));
            }
            Ok(snapshot())
        }

        async fn forecast(&self, _: &str, _: &str) -> Result<ForecastList, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_network {
                return Err(WeatherError::Network("dns error".into()));
            }
            Ok(vec![
                entry("2024-05-01 15:00:00", "rain", 12.3),
                entry("2024-05-01 18:00:00", "clear sky", 9.8),
            ])
        }
    }

    #[test]
    fn current_view_from_snapshot() {
        let view = CurrentView::from_snapshot(&snapshot());

        assert_eq!(view.location, "Йошкар-Ола");
        assert_eq!(view.description, "Небольшой снег");
        assert_eq!(view.emoji, "🌨");
        assert_eq!(view.background, Background::Default);
        assert_eq!(view.temperature, "-7°C");
        assert_eq!(view.humidity, "81%");
        assert_eq!(view.wind, "5 м/с");
        assert_eq!(view.pressure, "759 мм");
    }

    #[test]
    fn current_view_without_conditions_uses_defaults() {
        let mut snap = snapshot();
        snap.conditions.clear();

        let view = CurrentView::from_snapshot(&snap);
        assert_eq!(view.emoji, DEFAULT_EMOJI);
        assert_eq!(view.background, Background::Default);
        assert_eq!(view.description, "");
    }

    #[test]
    fn forecast_view_keeps_provider_order() {
        let view = ForecastView::from_entries(&[
            entry("2024-05-01 15:00:00", "rain", 12.3),
            entry("2024-05-01 18:00:00", "clear sky", 9.8),
        ])
        .unwrap();

        assert_eq!(view.background, Background::Rainy);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].when, "01.05 15:00");
        assert_eq!(view.rows[0].description, "Дождь");
        assert_eq!(view.rows[0].emoji, "🌧");
        assert_eq!(view.rows[1].when, "01.05 18:00");
        assert_eq!(view.rows[1].temperature, "9°C");
    }

    #[test]
    fn forecast_view_of_empty_list() {
        let view = ForecastView::from_entries(&[]).unwrap();
        assert_eq!(view.background, Background::Default);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn forecast_view_rejects_malformed_timestamp() {
        let err = ForecastView::from_entries(&[entry("yesterday", "rain", 1.0)]).unwrap_err();
        assert!(matches!(err, WeatherError::Format { .. }));
    }

    #[test]
    fn screen_state_defaults_to_loading() {
        let state: ScreenState<CurrentView> = ScreenState::default();
        assert!(state.is_loading());
        assert!(state.ready().is_none());
        assert!(state.error_message().is_none());
    }

    #[tokio::test]
    async fn load_current_screen_ready() {
        let provider = FakeProvider::default();
        let state = load_current_screen(&provider, "Yoshkar-Ola", "KEY").await;

        assert_eq!(state.ready().unwrap().location, "Йошкар-Ола");
    }

    #[tokio::test]
    async fn network_failure_then_retry_reissues_fetch() {
        let provider = FakeProvider { fail_network: true, ..Default::default() };

        let first = load_forecast_screen(&provider, "Yoshkar-Ola", "KEY").await;
        assert_eq!(first.error_message(), Some(crate::error::NO_CONNECTION_MESSAGE));

        let retry = load_forecast_screen(&provider, "Yoshkar-Ola", "KEY").await;
        assert!(retry.error_message().is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn load_forecast_screen_ready() {
        let provider = FakeProvider::default();
        let state = load_forecast_screen(&provider, "Yoshkar-Ola", "KEY").await;

        let view = state.ready().unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}

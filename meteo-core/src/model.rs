use serde::{Deserialize, Serialize};

/// One weather condition as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEntry {
    /// English description from the provider's vocabulary, e.g. "clear sky".
    pub description: String,
    pub icon_code: String,
}

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    /// Metres per second, truncated.
    pub wind_speed: u32,
    pub pressure_hpa: i32,
    /// Never empty when produced by a provider; only the first entry is displayed.
    pub conditions: Vec<ConditionEntry>,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&ConditionEntry> {
        self.conditions.first()
    }
}

/// One time-stamped prediction from the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: u32,
    pub pressure_hpa: i32,
    pub conditions: Vec<ConditionEntry>,
}

impl ForecastEntry {
    pub fn primary_condition(&self) -> Option<&ConditionEntry> {
        self.conditions.first()
    }
}

/// Forecast entries in provider order (3-hour steps over 5 days for OpenWeather).
pub type ForecastList = Vec<ForecastEntry>;

//! Pure mappings from raw provider fields to display values.
//!
//! Nothing here performs I/O; every function is safe to call from any thread.

use crate::WeatherError;

/// Glyph used when no keyword matches.
pub const DEFAULT_EMOJI: &str = "🌤";

/// hPa → mmHg.
pub const HPA_TO_MMHG: f64 = 0.750062;

/// Ordered keyword table: `(english, russian, glyph)`. The first row whose
/// keyword occurs in the description wins.
const EMOJI_TABLE: &[(&str, &str, &str)] = &[
    ("rain", "дождь", "🌧"),
    ("thunderstorm", "гроза", "⛈"),
    ("snow", "снег", "🌨"),
    ("cloudy", "облачно", "☁"),
    ("clear", "ясно", "☀"),
    ("fog", "туман", "🌫"),
    ("overcast", "пасмурно", "🌥"),
    ("partly cloudy", "переменная облачность", "⛅"),
    ("drizzle", "морось", "🌦"),
    ("hail", "град", "🌨"),
    ("blizzard", "метель", "🌨"),
    ("sunny", "солнечно", "☀"),
];

const DESCRIPTION_TABLE: &[(&str, &str)] = &[
    ("clear sky", "Ясно"),
    ("few clouds", "Малооблачно"),
    ("scattered clouds", "Рассеянные облака"),
    ("broken clouds", "Облачно с прояснениями"),
    ("shower rain", "Кратковременный дождь"),
    ("rain", "Дождь"),
    ("thunderstorm", "Гроза"),
    ("snow", "Снег"),
    ("light snow", "Небольшой снег"),
    ("moderate snow", "Умеренный снег"),
    ("heavy snow", "Сильный снег"),
    ("sleet", "Мокрый снег"),
    ("light rain", "Небольшой дождь"),
    ("moderate rain", "Умеренный дождь"),
    ("heavy intensity rain", "Сильный дождь"),
    ("very heavy rain", "Очень сильный дождь"),
    ("extreme rain", "Экстремальный дождь"),
    ("freezing rain", "Ледяной дождь"),
    ("light intensity shower rain", "Небольшой ливень"),
    ("heavy intensity shower rain", "Сильный ливень"),
    ("mist", "Туман"),
    ("smoke", "Дымка"),
    ("haze", "Мгла"),
    ("fog", "Туман"),
    ("sand/dust whirls", "Песчаная буря"),
    ("overcast clouds", "Пасмурно"),
    ("light thunderstorm", "Небольшая гроза"),
    ("thunderstorm with light rain", "Гроза с небольшим дождем"),
    ("thunderstorm with rain", "Гроза с дождем"),
    ("thunderstorm with heavy rain", "Гроза с сильным дождем"),
];

const LOCATION_TABLE: &[(&str, &str)] = &[
    ("Yoshkar-Ola", "Йошкар-Ола"),
    ("Moscow", "Москва"),
    ("Saint Petersburg", "Санкт-Петербург"),
    ("Kazan", "Казань"),
];

/// Background picture shown behind a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Storm,
    Snow,
    Foggy,
    #[default]
    Default,
}

impl Background {
    pub fn asset_key(&self) -> &'static str {
        match self {
            Background::Sunny => "sunny",
            Background::PartlyCloudy => "partly-cloudy",
            Background::Cloudy => "cloudy",
            Background::Rainy => "rainy",
            Background::Storm => "storm",
            Background::Snow => "snow",
            Background::Foggy => "foggy",
            Background::Default => "default",
        }
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.asset_key())
    }
}

/// Weather glyph for a description, in English or Russian.
pub fn emoji_for(description: &str) -> &'static str {
    let lower = description.to_lowercase();

    EMOJI_TABLE
        .iter()
        .find(|(en, ru, _)| lower.contains(en) || lower.contains(ru))
        .map(|(_, _, glyph)| *glyph)
        .unwrap_or(DEFAULT_EMOJI)
}

/// Russian phrase for a provider description; unknown phrases pass through.
pub fn translate_description(description: &str) -> String {
    let lower = description.to_lowercase();

    DESCRIPTION_TABLE
        .iter()
        .find(|(en, _)| *en == lower)
        .map(|(_, ru)| (*ru).to_string())
        .unwrap_or_else(|| description.to_string())
}

pub fn background_for(description: &str) -> Background {
    match description.to_lowercase().as_str() {
        "clear sky" => Background::Sunny,
        "few clouds" | "scattered clouds" => Background::PartlyCloudy,
        "broken clouds" | "overcast clouds" => Background::Cloudy,
        "shower rain" | "rain" | "light rain" | "moderate rain" => Background::Rainy,
        "thunderstorm" => Background::Storm,
        "snow" => Background::Snow,
        "mist" => Background::Foggy,
        _ => Background::Default,
    }
}

/// Case-sensitive: the provider returns city names in canonical casing.
pub fn translate_location_name(name: &str) -> String {
    LOCATION_TABLE
        .iter()
        .find(|(en, _)| *en == name)
        .map(|(_, ru)| (*ru).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// `"2024-05-01 15:30:00"` → `"01.05 15:30"`.
pub fn format_forecast_timestamp(raw: &str) -> Result<String, WeatherError> {
    let malformed = || WeatherError::Format { input: raw.to_string() };

    let (date, time) = raw.split_once(' ').ok_or_else(malformed)?;

    let mut date_parts = date.split('-');
    let (Some(_year), Some(month), Some(day), None) =
        (date_parts.next(), date_parts.next(), date_parts.next(), date_parts.next())
    else {
        return Err(malformed());
    };

    let hh_mm = time.get(..5).ok_or_else(malformed)?;

    let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    let time_ok = hh_mm.as_bytes()[2] == b':'
        && all_digits(&hh_mm[..2], 2)
        && all_digits(&hh_mm[3..], 2);

    if !all_digits(month, 2) || !all_digits(day, 2) || !time_ok {
        return Err(malformed());
    }

    Ok(format!("{day}.{month} {hh_mm}"))
}

/// Truncates toward zero.
pub fn pressure_hpa_to_mmhg(hpa: i32) -> i32 {
    (f64::from(hpa) * HPA_TO_MMHG) as i32
}

/// Whole degrees, truncated toward zero: `20.9` → `"20°C"`.
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", celsius.trunc() as i64)
}

pub fn format_humidity(pct: u8) -> String {
    format!("{pct}%")
}

pub fn format_wind(speed: u32) -> String {
    format!("{speed} м/с")
}

pub fn format_pressure(hpa: i32) -> String {
    format!("{} мм", pressure_hpa_to_mmhg(hpa))
}

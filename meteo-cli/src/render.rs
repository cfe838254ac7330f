use meteo_core::{AlertKind, CurrentView, ForecastView, NotificationPreferences};

pub const LOADING_WEATHER: &str = "Загрузка погоды...";
pub const LOADING_FORECAST: &str = "Загрузка прогноза...";

const ALERTS_FOOTER: &str = "Уведомления помогут вам быть в курсе важных изменений погоды";

pub fn current(view: &CurrentView, clock: &str) -> String {
    format!(
        "{location}\n{clock}\n\n  {emoji}  {temperature}\n  {description}\n\n  \
         Влажность  {humidity}\n  Ветер      {wind}\n  Давление   {pressure}\n\n  [фон: {background}]\n",
        location = view.location,
        emoji = view.emoji,
        temperature = view.temperature,
        description = view.description,
        humidity = view.humidity,
        wind = view.wind,
        pressure = view.pressure,
        background = view.background,
    )
}

pub fn forecast(view: &ForecastView) -> String {
    let mut out = format!("Прогноз погоды на неделю\n  [фон: {}]\n\n", view.background);

    for row in &view.rows {
        out.push_str(&format!(
            "  {}  {}  {:<28} {:>6}\n",
            row.emoji, row.when, row.description, row.temperature
        ));
    }

    out
}

pub fn alerts(prefs: &NotificationPreferences) -> String {
    let mut out = String::from("Настройка уведомлений\n\n");

    for kind in AlertKind::all() {
        let mark = if prefs.is_enabled(*kind) { "[x]" } else { "[ ]" };
        out.push_str(&format!(
            "  {mark} {} {} ({})\n        {}\n",
            kind.emoji(),
            kind.title(),
            kind,
            kind.subtitle()
        ));
    }

    out.push('\n');
    out.push_str(ALERTS_FOOTER);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{
        ConditionEntry, WeatherSnapshot,
        preferences::{MemoryPreferenceStore, PreferenceStore},
    };

    #[test]
    fn current_screen_lists_every_reading() {
        let snapshot = WeatherSnapshot {
            location_name: "Kazan".into(),
            temperature_c: 20.4,
            humidity_pct: 40,
            wind_speed: 6,
            pressure_hpa: 1000,
            conditions: vec![ConditionEntry { description: "clear sky".into(), icon_code: "01d".into() }],
        };

        let text = current(&CurrentView::from_snapshot(&snapshot), "1 мая, 12:00");

        assert!(text.starts_with("Казань\n1 мая, 12:00\n"));
        assert!(text.contains("☀  20°C"));
        assert!(text.contains("Ясно"));
        assert!(text.contains("Влажность  40%"));
        assert!(text.contains("Ветер      6 м/с"));
        assert!(text.contains("Давление   750 мм"));
        assert!(text.contains("[фон: sunny]"));
    }

    #[test]
    fn forecast_screen_has_one_line_per_row() {
        let entries = vec![meteo_core::ForecastEntry {
            timestamp: "2024-05-01 15:00:00".into(),
            temperature_c: 14.2,
            humidity_pct: 70,
            wind_speed: 2,
            pressure_hpa: 1012,
            conditions: vec![ConditionEntry { description: "light rain".into(), icon_code: "10d".into() }],
        }];
        let view = ForecastView::from_entries(&entries).unwrap();

        let text = forecast(&view);
        assert!(text.contains("[фон: rainy]"));
        assert!(text.contains("🌧  01.05 15:00  Небольшой дождь"));
        assert!(text.trim_end().ends_with("14°C"));
    }

    #[test]
    fn alerts_screen_marks_enabled_kinds() {
        let mut store = MemoryPreferenceStore::new();
        store.set_bool("wind_notification", true).unwrap();
        let prefs = NotificationPreferences::load(&store).unwrap();

        let text = alerts(&prefs);
        assert!(text.contains("[x] 🌧 Уведомления о дожде (rain)"));
        assert!(text.contains("[ ] 🌨 Уведомления о снеге (snow)"));
        assert!(text.contains("[x] 💨 Сильный ветер (wind)"));
        assert!(text.ends_with(&format!("{ALERTS_FOOTER}\n")));
    }
}

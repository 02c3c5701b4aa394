use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{icon::WeatherIcon, model::WeatherSnapshot, units::UnitPreference};

/// Display strings for one snapshot under one unit preference.
///
/// Numbers are shown as fetched; only the unit labels follow `unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub place: String,
    pub local_time: String,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub icon: WeatherIcon,
}

impl WeatherView {
    pub fn render(snapshot: &WeatherSnapshot, unit: UnitPreference, now: DateTime<Utc>) -> Self {
        let symbol = unit.temperature_symbol();

        Self {
            place: snapshot.place_label(),
            local_time: local_time(now, snapshot.timezone_offset_secs),
            description: snapshot.description.clone(),
            temperature: format!("{}{symbol}", snapshot.rounded_temperature()),
            feels_like: format!("{}{symbol}", snapshot.rounded_feels_like()),
            humidity: format!("{}%", snapshot.humidity_pct),
            wind: format!("{} {}", snapshot.wind_speed, unit.speed_label()),
            pressure: format!("{} hPa", snapshot.pressure_hpa),
            icon: WeatherIcon::resolve(&snapshot.icon_code, &snapshot.condition),
        }
    }
}

/// "Monday, October 19, 2026 02:05 PM" at the place's UTC offset.
fn local_time(now: DateTime<Utc>, offset_secs: i32) -> String {
    // Out-of-range offsets fall back to UTC.
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());

    now.with_timezone(&offset).format("%A, %B %-d, %Y %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            place_name: "Benoni".into(),
            country: "ZA".into(),
            description: "clear sky".into(),
            condition: "Clear".into(),
            icon_code: "01d".into(),
            temperature: 22.4,
            feels_like: 21.9,
            humidity_pct: 40,
            wind_speed: 3.1,
            pressure_hpa: 1015.0,
            timezone_offset_secs: 7200,
            fetched_in: UnitPreference::Celsius,
        }
    }

    #[test]
    fn renders_metric_labels() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 5, 0).unwrap();
        let view = WeatherView::render(&snapshot(), UnitPreference::Celsius, now);

        assert_eq!(view.place, "Benoni, ZA");
        assert_eq!(view.temperature, "22°C");
        assert_eq!(view.feels_like, "22°C");
        assert_eq!(view.humidity, "40%");
        assert_eq!(view.wind, "3.1 m/s");
        assert_eq!(view.pressure, "1015 hPa");
        assert_eq!(view.icon, WeatherIcon::Sun);
        assert_eq!(view.local_time, "Monday, October 19, 2026 02:05 PM");
    }

    #[test]
    fn switching_unit_relabels_without_converting() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 5, 0).unwrap();
        let view = WeatherView::render(&snapshot(), UnitPreference::Fahrenheit, now);

        assert_eq!(view.temperature, "22°F");
        assert_eq!(view.wind, "3.1 mph");
    }

    #[test]
    fn invalid_offset_uses_utc() {
        assert_eq!(
            local_time(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 0).unwrap(), 999_999),
            "Friday, January 2, 2026 03:04 AM"
        );
    }
}

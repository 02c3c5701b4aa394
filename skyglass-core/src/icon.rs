/// Icon shown next to the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudRain,
    CloudSunRain,
    CloudMoonRain,
    Bolt,
    Snowflake,
    Smog,
    Wind,
    Unknown,
}

impl WeatherIcon {
    /// Resolve from the provider icon code (e.g. "10n"), falling back to the
    /// condition group (e.g. "Rain") for codes we don't know.
    pub fn resolve(icon_code: &str, condition: &str) -> Self {
        Self::from_icon_code(icon_code).unwrap_or_else(|| Self::from_condition(condition))
    }

    fn from_icon_code(code: &str) -> Option<Self> {
        let icon = match code {
            "01d" => Self::Sun,
            "01n" => Self::Moon,
            "02d" => Self::CloudSun,
            "02n" => Self::CloudMoon,
            "03d" | "03n" | "04d" | "04n" => Self::Cloud,
            "09d" | "09n" => Self::CloudRain,
            "10d" => Self::CloudSunRain,
            "10n" => Self::CloudMoonRain,
            "11d" | "11n" => Self::Bolt,
            "13d" | "13n" => Self::Snowflake,
            "50d" | "50n" => Self::Smog,
            _ => return None,
        };
        Some(icon)
    }

    fn from_condition(condition: &str) -> Self {
        match condition {
            "Clear" => Self::Sun,
            "Clouds" => Self::Cloud,
            "Rain" | "Drizzle" => Self::CloudRain,
            "Thunderstorm" => Self::Bolt,
            "Snow" => Self::Snowflake,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" => Self::Smog,
            "Squall" | "Tornado" => Self::Wind,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::CloudSun => "cloud-sun",
            Self::CloudMoon => "cloud-moon",
            Self::Cloud => "cloud",
            Self::CloudRain => "cloud-rain",
            Self::CloudSunRain => "cloud-sun-rain",
            Self::CloudMoonRain => "cloud-moon-rain",
            Self::Bolt => "bolt",
            Self::Snowflake => "snowflake",
            Self::Smog => "smog",
            Self::Wind => "wind",
            Self::Unknown => "question",
        }
    }

    /// Single glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::Moon => "☾",
            Self::CloudSun | Self::CloudMoon => "⛅",
            Self::Cloud => "☁",
            Self::CloudRain | Self::CloudSunRain | Self::CloudMoonRain => "☂",
            Self::Bolt => "⚡",
            Self::Snowflake => "❄",
            Self::Smog => "≋",
            Self::Wind => "༄",
            Self::Unknown => "?",
        }
    }
}

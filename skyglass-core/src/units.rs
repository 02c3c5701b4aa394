use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Temperature unit chosen by the user.
///
/// Switching units relabels the held snapshot; values are only converted by
/// the provider on the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "celsius",
            UnitPreference::Fahrenheit => "fahrenheit",
        }
    }

    /// Value of the provider's `units` query parameter.
    pub fn provider_units(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "metric",
            UnitPreference::Fahrenheit => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "m/s",
            UnitPreference::Fahrenheit => "mph",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
        }
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitPreference {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(UnitPreference::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(UnitPreference::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

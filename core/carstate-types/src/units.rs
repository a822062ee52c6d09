//! Unit settings applied by the transform engine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kilometres per statute mile, as used for the imperial conversion.
pub const KM_PER_MILE: f64 = 1.609;

/// Distance unit in which range and odometer fields are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "km")]
    Km,
    #[serde(rename = "imperial")]
    Imperial,
}

impl DistanceUnit {
    /// Label written to the `measure` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Imperial => "imperial",
        }
    }

    /// Converts a kilometre reading into this unit, rounded to two decimals.
    /// Returns `None` for `Km` since no conversion applies.
    #[must_use]
    pub fn convert_km(self, km: f64) -> Option<f64> {
        match self {
            Self::Km => None,
            Self::Imperial => Some(round2(km / KM_PER_MILE)),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "km" => Ok(Self::Km),
            "imperial" => Ok(Self::Imperial),
            other => Err(Error::InvalidDistanceUnit(other.to_string())),
        }
    }
}

/// Temperature unit label reported to clients.
///
/// The label is informational only: `inside_tempF` is derived whatever
/// this is set to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Label written to the `temperature` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            other => Err(Error::InvalidTemperatureUnit(other.to_string())),
        }
    }
}

/// Celsius to Fahrenheit, rounded to two decimals.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round2(celsius * 9.0 / 5.0 + 32.0)
}

/// Rounds half away from zero to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

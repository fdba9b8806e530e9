//! Core types for the weather subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a weather reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    OpenWeather,
    OpenMeteo,
    Cache,
    Fallback,
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWeather => write!(f, "OpenWeather"),
            Self::OpenMeteo => write!(f, "Open-Meteo"),
            Self::Cache => write!(f, "Cache"),
            Self::Fallback => write!(f, "Built-in"),
        }
    }
}

/// Conditions that make outdoor plans a bad idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutdoorRisk {
    Thunderstorm,
    Rain,
    Snow,
    Tornado,
}

impl OutdoorRisk {
    pub fn reason(self) -> &'static str {
        match self {
            Self::Thunderstorm => "Thunderstorm risk",
            Self::Rain => "Rain risk",
            Self::Snow => "Snow risk",
            Self::Tornado => "Tornado risk",
        }
    }

    /// Classify an OpenWeather condition id.
    pub fn from_openweather(id: u32) -> Option<Self> {
        match id {
            200..=232 => Some(Self::Thunderstorm),
            500..=531 => Some(Self::Rain),
            600..=622 => Some(Self::Snow),
            781 => Some(Self::Tornado),
            _ => None,
        }
    }

    /// Classify a WMO weather code as reported by Open-Meteo.
    pub fn from_wmo(code: Option<u32>) -> Option<Self> {
        match code? {
            95..=99 => Some(Self::Thunderstorm),
            51..=67 | 80..=82 => Some(Self::Rain),
            71..=77 => Some(Self::Snow),
            _ => None,
        }
    }
}

/// Short description for a WMO weather code.
pub fn wmo_description(code: Option<u32>) -> &'static str {
    match code {
        None => "Unknown",
        Some(0) => "Clear",
        Some(1..=3) => "Partly cloudy",
        Some(45..=48) => "Fog",
        Some(51..=67) => "Rain",
        Some(71..=77) => "Snow",
        Some(80..=82) => "Rain showers",
        Some(95..=99) => "Thunderstorm",
        Some(_) => "Cloudy",
    }
}

/// Current conditions plus the outdoor-risk verdict. Temperatures are °F.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent; Open-Meteo's current block has none.
    pub humidity: Option<f64>,
    pub description: String,
    pub icon: String,
    pub is_risky_for_outdoor: bool,
    /// Empty when not risky.
    pub risk_reason: String,
    pub source: WeatherSource,
}

impl WeatherData {
    pub(crate) fn with_risk(mut self, risk: Option<OutdoorRisk>) -> Self {
        self.is_risky_for_outdoor = risk.is_some();
        self.risk_reason = risk.map(|r| r.reason().to_string()).unwrap_or_default();
        self
    }

    /// Payload served for Charlotte when every provider fails.
    pub fn charlotte_fallback() -> Self {
        Self {
            temperature: 72.0,
            feels_like: 72.0,
            humidity: Some(50.0),
            description: "Sunny".into(),
            icon: "01d".into(),
            is_risky_for_outdoor: false,
            risk_reason: String::new(),
            source: WeatherSource::Fallback,
        }
    }
}

/// Weather lookup errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Offline and no cached weather for this location")]
    Offline,
}

impl From<ureq::Error> for WeatherError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code, _) => Self::Status(code),
            other => Self::Network(other.to_string()),
        }
    }
}

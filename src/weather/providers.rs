//! Weather providers: OpenWeather (keyed) and Open-Meteo (keyless).

use super::types::{wmo_description, OutdoorRisk, WeatherData, WeatherError, WeatherSource};
use crate::geo::GeoPoint;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "CharlotteGuide/0.1 (tourism-api)";

/// Shared HTTP agent with the provider timeout applied.
pub fn http_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}

// ─── OpenWeather ─────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct OpenWeatherResponse {
    pub main: OpenWeatherMain,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
}

#[derive(Deserialize, Debug)]
pub struct OpenWeatherMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Deserialize, Debug)]
pub struct OpenWeatherCondition {
    pub id: u32,
    pub description: String,
    pub icon: String,
}

impl OpenWeatherResponse {
    pub fn into_weather(self) -> Result<WeatherData, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::InvalidResponse("empty 'weather' array".into()))?;

        let data = WeatherData {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: Some(self.main.humidity),
            description: condition.description,
            icon: condition.icon,
            is_risky_for_outdoor: false,
            risk_reason: String::new(),
            source: WeatherSource::OpenWeather,
        };
        Ok(data.with_risk(OutdoorRisk::from_openweather(condition.id)))
    }
}

/// Current conditions from OpenWeather, in imperial units.
pub fn openweather_current(
    agent: &ureq::Agent,
    base_url: &str,
    api_key: &str,
    point: GeoPoint,
) -> Result<WeatherData, WeatherError> {
    let response = agent
        .get(base_url)
        .query("lat", &point.lat().to_string())
        .query("lon", &point.lon().to_string())
        .query("appid", api_key)
        .query("units", "imperial")
        .call()?;

    let body: OpenWeatherResponse = response
        .into_json()
        .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

    body.into_weather()
}

// ─── Open-Meteo ──────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct OpenMeteoResponse {
    #[serde(default)]
    pub current_weather: Option<OpenMeteoCurrent>,
}

#[derive(Deserialize, Debug)]
pub struct OpenMeteoCurrent {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weathercode: Option<u32>,
}

impl OpenMeteoResponse {
    pub fn into_weather(self) -> Result<WeatherData, WeatherError> {
        let current = self
            .current_weather
            .ok_or_else(|| WeatherError::InvalidResponse("missing 'current_weather'".into()))?;
        let temperature = current
            .temperature
            .ok_or_else(|| WeatherError::InvalidResponse("missing temperature".into()))?;

        let data = WeatherData {
            temperature,
            feels_like: temperature,
            humidity: None,
            description: wmo_description(current.weathercode).to_string(),
            icon: "01d".into(),
            is_risky_for_outdoor: false,
            risk_reason: String::new(),
            source: WeatherSource::OpenMeteo,
        };
        Ok(data.with_risk(OutdoorRisk::from_wmo(current.weathercode)))
    }
}

/// Current conditions from Open-Meteo (no API key), in °F and mph.
pub fn open_meteo_current(
    agent: &ureq::Agent,
    base_url: &str,
    point: GeoPoint,
) -> Result<WeatherData, WeatherError> {
    let response = agent
        .get(base_url)
        .query("latitude", &point.lat().to_string())
        .query("longitude", &point.lon().to_string())
        .query("current_weather", "true")
        .query("temperature_unit", "fahrenheit")
        .query("windspeed_unit", "mph")
        .call()?;

    let body: OpenMeteoResponse = response
        .into_json()
        .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;

    body.into_weather()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_openweather() {
        let json = r#"{
            "coord": {"lon": -80.8431, "lat": 35.2271},
            "weather": [{"id": 502, "main": "Rain", "description": "heavy intensity rain", "icon": "10d"}],
            "main": {"temp": 61.3, "feels_like": 60.8, "temp_min": 59.0, "temp_max": 63.0, "pressure": 1012, "humidity": 88},
            "name": "Charlotte"
        }"#;
        let body: OpenWeatherResponse = serde_json::from_str(json).unwrap();
        let data = body.into_weather().unwrap();
        assert_eq!(data.temperature, 61.3);
        assert_eq!(data.humidity, Some(88.0));
        assert_eq!(data.description, "heavy intensity rain");
        assert_eq!(data.icon, "10d");
        assert!(data.is_risky_for_outdoor);
        assert_eq!(data.risk_reason, "Rain risk");
        assert_eq!(data.source, WeatherSource::OpenWeather);
    }

    #[test]
    fn test_decode_openweather_clear() {
        let json = r#"{
            "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 75.0, "feels_like": 74.0, "humidity": 40}
        }"#;
        let data: WeatherData = serde_json::from_str::<OpenWeatherResponse>(json)
            .unwrap()
            .into_weather()
            .unwrap();
        assert!(!data.is_risky_for_outdoor);
        assert_eq!(data.risk_reason, "");
    }

    #[test]
    fn test_decode_openweather_without_conditions() {
        let json = r#"{"weather": [], "main": {"temp": 75.0, "feels_like": 74.0, "humidity": 40}}"#;
        let body: OpenWeatherResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(body.into_weather(), Err(WeatherError::InvalidResponse(_))));
    }

    #[test]
    fn test_decode_open_meteo() {
        let json = r#"{
            "latitude": 35.23,
            "longitude": -80.84,
            "current_weather": {"temperature": 48.2, "windspeed": 6.1, "winddirection": 210, "weathercode": 95, "time": "2024-04-01T14:00"}
        }"#;
        let body: OpenMeteoResponse = serde_json::from_str(json).unwrap();
        let data = body.into_weather().unwrap();
        assert_eq!(data.temperature, 48.2);
        assert_eq!(data.feels_like, 48.2);
        assert_eq!(data.humidity, None);
        assert_eq!(data.description, "Thunderstorm");
        assert_eq!(data.icon, "01d");
        assert_eq!(data.risk_reason, "Thunderstorm risk");
        assert_eq!(data.source, WeatherSource::OpenMeteo);
    }

    #[test]
    fn test_decode_open_meteo_missing_block() {
        let body: OpenMeteoResponse = serde_json::from_str(r#"{"latitude": 1.0}"#).unwrap();
        assert!(body.into_weather().is_err());
    }
}

//! Weather service — orchestrates the provider fallback chain.
//!
//! Flow: cache → OpenWeather (when a key is configured) → Open-Meteo → error.
//! Offline: cache → error.

use super::cache::WeatherCache;
use super::providers;
use super::types::{WeatherData, WeatherError};
use crate::geo::GeoPoint;
use chrono::Duration;
use std::sync::Mutex;

/// Endpoints and credentials for the providers.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub openweather_url: String,
    /// Empty disables OpenWeather.
    pub openweather_api_key: String,
    pub open_meteo_url: String,
    pub ttl: Duration,
    pub offline: bool,
}

/// The weather service with its fallback pipeline.
pub struct WeatherService {
    agent: ureq::Agent,
    config: WeatherConfig,
    cache: Mutex<WeatherCache>,
}

impl WeatherService {
    pub fn new(config: WeatherConfig) -> Self {
        let cache = WeatherCache::with_ttl(config.ttl);
        Self {
            agent: providers::http_agent(),
            config,
            cache: Mutex::new(cache),
        }
    }

    /// Seed the cache, e.g. from a previous run or a test.
    pub fn prime(&self, point: GeoPoint, data: &WeatherData) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).put(point, data);
    }

    /// Current conditions at `point`. Blocks on network I/O.
    pub fn current(&self, point: GeoPoint) -> Result<WeatherData, WeatherError> {
        // 1. Cache
        if let Some(hit) = self.cache.lock().unwrap_or_else(|e| e.into_inner()).get(point) {
            tracing::debug!(%point, "weather cache hit");
            return Ok(hit);
        }

        if self.config.offline {
            return Err(WeatherError::Offline);
        }

        // 2. OpenWeather
        if !self.config.openweather_api_key.is_empty() {
            match providers::openweather_current(
                &self.agent,
                &self.config.openweather_url,
                &self.config.openweather_api_key,
                point,
            ) {
                Ok(data) => return Ok(self.remember(point, data)),
                Err(e) => {
                    tracing::warn!(error = %e, "OpenWeather failed, falling back to Open-Meteo");
                }
            }
        } else {
            tracing::debug!("no OpenWeather key configured, using Open-Meteo");
        }

        // 3. Open-Meteo
        let data = providers::open_meteo_current(&self.agent, &self.config.open_meteo_url, point)?;
        Ok(self.remember(point, data))
    }

    fn remember(&self, point: GeoPoint, data: WeatherData) -> WeatherData {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(point, &data);
        data
    }
}

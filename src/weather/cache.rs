//! In-memory weather cache.
//!
//! Keys are coordinates rounded to two decimals (~1 km), so nearby lookups
//! share an entry. Entries expire after the configured TTL.

use super::types::{WeatherData, WeatherSource};
use crate::geo::GeoPoint;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

pub const DEFAULT_TTL_SECS: i64 = 600;

#[derive(Clone)]
struct CacheEntry {
    data: WeatherData,
    stored_at: DateTime<Utc>,
}

/// The weather cache.
pub struct WeatherCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl WeatherCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    fn key(point: GeoPoint) -> String {
        let lat = (point.lat() * 100.0).round() / 100.0;
        let lon = (point.lon() * 100.0).round() / 100.0;
        format!("{:.2}:{:.2}", lat, lon)
    }

    /// Look up a location. Returns None if missing or expired.
    pub fn get(&self, point: GeoPoint) -> Option<WeatherData> {
        self.get_at(point, Utc::now())
    }

    fn get_at(&self, point: GeoPoint, now: DateTime<Utc>) -> Option<WeatherData> {
        let entry = self.entries.get(&Self::key(point))?;
        if now - entry.stored_at >= self.ttl {
            return None;
        }
        Some(WeatherData {
            source: WeatherSource::Cache,
            ..entry.data.clone()
        })
    }

    pub fn put(&mut self, point: GeoPoint, data: &WeatherData) {
        self.put_at(point, data, Utc::now());
    }

    fn put_at(&mut self, point: GeoPoint, data: &WeatherData, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| now - e.stored_at < ttl);
        self.entries.insert(
            Self::key(point),
            CacheEntry {
                data: data.clone(),
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

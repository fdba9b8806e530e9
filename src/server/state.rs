use crate::config::{ConfigError, Settings};
use crate::places::EventCatalog;
use crate::weather::WeatherService;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

pub struct AppState {
    pub settings: Settings,
    pub weather: Arc<WeatherService>,
    pub events: EventCatalog,
    pub tz: Tz,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let tz = settings.tz()?;
        let weather = settings.weather_config()?;
        let path = settings.events_path();
        let events = EventCatalog::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "event catalog unavailable, serving no events");
            EventCatalog::default()
        });
        tracing::info!(path = %path.display(), events = events.len(), "event catalog loaded");

        Ok(Self {
            weather: Arc::new(WeatherService::new(weather)),
            settings,
            events,
            tz,
        })
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

//! Weather subsystem: current conditions with an outdoor-risk verdict.
//!
//! Provides OpenWeather and Open-Meteo clients, a short-lived in-memory
//! cache, and the service that chains them.

pub mod cache;
pub mod providers;
pub mod service;
pub mod types;

pub use service::{WeatherConfig, WeatherService};
pub use types::{OutdoorRisk, WeatherData, WeatherError, WeatherSource};

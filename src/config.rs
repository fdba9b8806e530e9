//! Runtime settings, from command-line flags or environment variables.

use crate::weather::WeatherConfig;
use chrono::Duration;
use chrono_tz::Tz;
use clap::Args;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown timezone '{0}'. Use IANA format (e.g. America/New_York).")]
    InvalidTimezone(String),

    #[error("Invalid frontend origin '{0}'")]
    InvalidOrigin(String),

    #[error("Weather cache TTL must be between 0 and {max} seconds, got {got}")]
    InvalidTtl { got: i64, max: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "CHARLOTTE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "CHARLOTTE_PORT", default_value_t = 8000)]
    pub port: u16,

    /// OpenWeather API key. Leave empty to use Open-Meteo only.
    #[arg(long, env = "OPENWEATHER_API_KEY", default_value = "", hide_env_values = true)]
    pub openweather_api_key: String,

    #[arg(long, env = "OPENWEATHER_URL", default_value = DEFAULT_OPENWEATHER_URL)]
    pub openweather_url: String,

    #[arg(long, env = "OPEN_METEO_URL", default_value = DEFAULT_OPEN_METEO_URL)]
    pub open_meteo_url: String,

    /// Origin allowed by CORS in addition to http://localhost:3000.
    #[arg(long, env = "FRONTEND_URL", default_value = DEFAULT_FRONTEND_URL)]
    pub frontend_url: String,

    /// JSON event catalog. Defaults to ~/.charlotte/events.json.
    #[arg(long, env = "CHARLOTTE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Timezone used to decide what "today" means for date filters.
    #[arg(long, env = "CHARLOTTE_TZ", default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    #[arg(long, env = "WEATHER_TTL_SECS", default_value_t = crate::weather::cache::DEFAULT_TTL_SECS)]
    pub weather_ttl_secs: i64,

    /// Offline mode: only serve cached weather.
    #[arg(long, env = "CHARLOTTE_OFFLINE")]
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            openweather_api_key: String::new(),
            openweather_url: DEFAULT_OPENWEATHER_URL.into(),
            open_meteo_url: DEFAULT_OPEN_METEO_URL.into(),
            frontend_url: DEFAULT_FRONTEND_URL.into(),
            events_file: None,
            timezone: DEFAULT_TIMEZONE.into(),
            weather_ttl_secs: crate::weather::cache::DEFAULT_TTL_SECS,
            offline: false,
        }
    }
}

impl Settings {
    pub fn events_path(&self) -> PathBuf {
        self.events_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".charlotte")
                .join("events.json")
        })
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Origins allowed by CORS: the configured frontend plus local dev.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.trim_end_matches('/').to_string()];
        if !origins.iter().any(|o| o == DEFAULT_FRONTEND_URL) {
            origins.push(DEFAULT_FRONTEND_URL.to_string());
        }
        origins
    }

    pub fn weather_config(&self) -> Result<WeatherConfig, ConfigError> {
        let ttl = Duration::try_seconds(self.weather_ttl_secs)
            .filter(|_| self.weather_ttl_secs >= 0)
            .ok_or(ConfigError::InvalidTtl {
                got: self.weather_ttl_secs,
                max: Duration::MAX.num_seconds(),
            })?;

        Ok(WeatherConfig {
            openweather_url: self.openweather_url.clone(),
            openweather_api_key: self.openweather_api_key.trim().to_string(),
            open_meteo_url: self.open_meteo_url.clone(),
            ttl,
            offline: self.offline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    #[test]
    fn test_flag_defaults_match_default_impl() {
        let parsed = TestCli::parse_from(["test"]).settings;
        let default = Settings::default();
        assert_eq!(parsed.port, default.port);
        assert_eq!(parsed.open_meteo_url, default.open_meteo_url);
        assert_eq!(parsed.timezone, default.timezone);
        assert_eq!(parsed.weather_ttl_secs, default.weather_ttl_secs);
    }

    #[test]
    fn test_flags_override() {
        let parsed = TestCli::parse_from([
            "test",
            "--port",
            "9090",
            "--events-file",
            "/tmp/events.json",
            "--offline",
        ])
        .settings;
        assert_eq!(parsed.port, 9090);
        assert_eq!(parsed.events_path(), PathBuf::from("/tmp/events.json"));
        assert!(parsed.weather_config().unwrap().offline);
    }

    #[test]
    fn test_timezone_validation() {
        assert_eq!(Settings::default().tz().unwrap(), chrono_tz::America::New_York);
        let bad = Settings {
            timezone: "Mars/Olympus_Mons".into(),
            ..Settings::default()
        };
        assert!(matches!(bad.tz(), Err(ConfigError::InvalidTimezone(_))));
    }

    #[test]
    fn test_cors_origins() {
        assert_eq!(Settings::default().cors_origins(), vec![DEFAULT_FRONTEND_URL]);

        let custom = Settings {
            frontend_url: "https://guide.example.com/".into(),
            ..Settings::default()
        };
        assert_eq!(
            custom.cors_origins(),
            vec!["https://guide.example.com", DEFAULT_FRONTEND_URL]
        );
    }

    #[test]
    fn test_blank_api_key_disables_openweather() {
        let s = Settings {
            openweather_api_key: "   ".into(),
            ..Settings::default()
        };
        assert!(s.weather_config().unwrap().openweather_api_key.is_empty());
    }

    #[test]
    fn test_weather_ttl_out_of_range() {
        let huge = Settings {
            weather_ttl_secs: i64::MAX,
            ..Settings::default()
        };
        assert!(matches!(huge.weather_config(), Err(ConfigError::InvalidTtl { .. })));

        let negative = Settings {
            weather_ttl_secs: -1,
            ..Settings::default()
        };
        assert!(negative.weather_config().is_err());

        let parsed = TestCli::parse_from(["test", "--weather-ttl-secs", "9223372036854775807"]).settings;
        assert!(parsed.weather_config().is_err());

        assert_eq!(
            Settings::default().weather_config().unwrap().ttl,
            Duration::seconds(crate::weather::cache::DEFAULT_TTL_SECS)
        );
    }
}

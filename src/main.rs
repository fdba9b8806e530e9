use charlotte_guide::config::Settings;
use charlotte_guide::geo::{self, DistanceUnit, GeoPoint, RadiusQuery, CHARLOTTE};
use charlotte_guide::places::{search_attractions, DateFilter, EventCatalog, EventQuery};
use charlotte_guide::server;
use charlotte_guide::weather::WeatherService;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Charlotte Guide — tourism API for Charlotte, NC
///
/// Serves current weather with outdoor-risk analysis, event search and
/// attraction search, all filterable by great-circle radius.
///
/// Examples:
///   charlotte serve --port 8000
///   charlotte weather
///   charlotte distance --from 35.2271,-80.8431 --to 35.7796,-78.6382
///   charlotte events --query jazz --radius 10 --when weekend
///   charlotte attractions --radius 5 --unit km
#[derive(Parser)]
#[command(name = "charlotte", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[command(flatten)]
        settings: Settings,
    },

    /// Print current weather as JSON.
    Weather {
        /// Latitude (-90 to 90). Defaults to Charlotte.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude (-180 to 180). Defaults to Charlotte.
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        #[command(flatten)]
        settings: Settings,
    },

    /// Great-circle distance between two "lat,lon" points.
    Distance {
        #[arg(long, allow_hyphen_values = true, value_parser = parse_point)]
        from: GeoPoint,

        #[arg(long, allow_hyphen_values = true, value_parser = parse_point)]
        to: GeoPoint,

        /// "mi" or "km".
        #[arg(long, default_value = "mi", value_parser = parse_unit)]
        unit: DistanceUnit,
    },

    /// Search the event catalog.
    Events {
        #[command(flatten)]
        search: SearchArgs,

        /// all, today, week, weekend or month.
        #[arg(long, default_value = "all", value_parser = parse_when)]
        when: DateFilter,

        #[command(flatten)]
        settings: Settings,
    },

    /// Search built-in attractions.
    Attractions {
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Text to match against names.
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// Search origin as "lat,lon". Defaults to Uptown Charlotte.
    #[arg(long, allow_hyphen_values = true, value_parser = parse_point)]
    near: Option<GeoPoint>,

    #[arg(long, default_value_t = 25.0)]
    radius: f64,

    #[arg(long, default_value = "mi", value_parser = parse_unit)]
    unit: DistanceUnit,
}

impl SearchArgs {
    fn area(&self) -> RadiusQuery {
        RadiusQuery::new(self.near.unwrap_or(CHARLOTTE), self.radius, self.unit)
            .unwrap_or_else(|e| fail(e))
    }
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected 'lat,lon', got '{}'", s))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("Bad latitude '{}': {}", lat, e))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("Bad longitude '{}': {}", lon, e))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

fn parse_unit(s: &str) -> Result<DistanceUnit, String> {
    s.parse::<DistanceUnit>().map_err(|e| e.to_string())
}

fn parse_when(s: &str) -> Result<DateFilter, String> {
    s.parse()
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { settings } => {
            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
            if let Err(e) = runtime.block_on(server::start(settings)) {
                fail(e);
            }
        }

        Command::Weather { lat, lon, settings } => {
            let point = GeoPoint::new(lat.unwrap_or(CHARLOTTE.lat()), lon.unwrap_or(CHARLOTTE.lon()))
                .unwrap_or_else(|e| fail(e));
            let config = settings.weather_config().unwrap_or_else(|e| fail(e));
            let service = WeatherService::new(config);
            let data = service.current(point).unwrap_or_else(|e| fail(e));
            eprintln!("  {} ({})", point, data.source);
            print_json(&data);
        }

        Command::Distance { from, to, unit } => {
            let d = geo::distance(from, to, unit);
            println!("{:.3} {}", d, unit);
        }

        Command::Events { search, when, settings } => {
            let tz = settings.tz().unwrap_or_else(|e| fail(e));
            let catalog = EventCatalog::load_from(&settings.events_path()).unwrap_or_else(|e| fail(e));
            let query = EventQuery {
                term: search.query.clone(),
                area: search.area(),
                when,
            };
            let today = Utc::now().with_timezone(&tz).date_naive();
            let hits = catalog.search(&query, today);
            eprintln!("  {} event(s) within {} {}", hits.len(), query.area.radius, query.area.unit);
            print_json(&hits);
        }

        Command::Attractions { search } => {
            let hits = search_attractions(search.query.as_deref(), &search.area());
            eprintln!("  {} attraction(s)", hits.len());
            print_json(&hits);
        }
    }
}

//! Great-circle distance and radius filtering on a spherical Earth.
//!
//! All distances use the Haversine formula. The Earth radius depends on the
//! requested unit: 3959 statute miles or 6371 kilometers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const EARTH_RADIUS_MILES: f64 = 3959.0;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Tolerance applied to the radius boundary so analytically placed
/// candidates survive floating-point rounding.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Uptown Charlotte, NC.
pub const CHARLOTTE: GeoPoint = GeoPoint {
    lat: 35.2271,
    lon: -80.8431,
};

// ─── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid coordinates: lat={lat}, lon={lon}. Lat: -90..90, Lon: -180..180")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid radius {0}: must be a finite value >= 0")]
    InvalidRadius(f64),

    #[error("Unknown distance unit '{0}'. Use 'mi' or 'km'.")]
    UnknownUnit(String),
}

// ─── Units ───────────────────────────────────────────────────────

/// Unit a distance (and the matching radius) is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    pub fn earth_radius(self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miles => write!(f, "miles"),
            Self::Kilometers => write!(f, "kilometers"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Ok(Self::Kilometers),
            _ => Err(GeoError::UnknownUnit(s.to_string())),
        }
    }
}

// ─── Points ──────────────────────────────────────────────────────

/// A validated position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Build a point, rejecting anything outside lat -90..90 / lon -180..180.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite()
            || !lon.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lon)
        {
            return Err(GeoError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// The point reached by travelling `dist` along the great circle
    /// starting at `bearing_deg` (clockwise from north). Non-finite input
    /// yields `InvalidCoordinate`.
    pub fn destination(
        &self,
        bearing_deg: f64,
        dist: f64,
        unit: DistanceUnit,
    ) -> Result<GeoPoint, GeoError> {
        let delta = dist / unit.earth_radius();
        let theta = bearing_deg.to_radians();
        let phi1 = self.lat.to_radians();
        let lambda1 = self.lon.to_radians();

        let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
        let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
        let lambda2 = lambda1
            + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

        GeoPoint::new(
            phi2.to_degrees().clamp(-90.0, 90.0),
            normalize_longitude(lambda2.to_degrees()),
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Raw coordinates as they arrive in external records. Not validated until
/// converted with [`Coordinates::to_point`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn to_point(&self) -> Result<GeoPoint, GeoError> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 540.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

// ─── Distance ────────────────────────────────────────────────────

/// Haversine great-circle distance between two points.
pub fn distance(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let a_term = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding near antipodes can push the term a hair past 1.
    let a_term = a_term.clamp(0.0, 1.0);
    let c = 2.0 * a_term.sqrt().atan2((1.0 - a_term).sqrt());

    unit.earth_radius() * c
}

/// Distance between raw degree pairs, validating both.
pub fn distance_between(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    unit: DistanceUnit,
) -> Result<f64, GeoError> {
    let a = GeoPoint::new(lat1, lon1)?;
    let b = GeoPoint::new(lat2, lon2)?;
    Ok(distance(a, b, unit))
}

fn check_radius(radius: f64) -> Result<(), GeoError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(GeoError::InvalidRadius(radius))
    }
}

/// Inclusive radius test: true iff `distance(origin, candidate) <= radius`.
pub fn within_radius(
    origin: GeoPoint,
    candidate: GeoPoint,
    radius: f64,
    unit: DistanceUnit,
) -> Result<bool, GeoError> {
    check_radius(radius)?;
    Ok(distance(origin, candidate, unit) <= radius + BOUNDARY_EPSILON)
}

// ─── Radius queries ──────────────────────────────────────────────

/// A search bounded to `radius` around `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub origin: GeoPoint,
    pub radius: f64,
    pub unit: DistanceUnit,
}

/// A candidate that passed a radius query, with its distance from the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit<T> {
    #[serde(flatten)]
    pub item: T,
    pub distance: f64,
}

impl RadiusQuery {
    pub fn new(origin: GeoPoint, radius: f64, unit: DistanceUnit) -> Result<Self, GeoError> {
        check_radius(radius)?;
        Ok(Self { origin, radius, unit })
    }

    /// Distance from the origin if `candidate` lies within the radius.
    pub fn distance_if_within(&self, candidate: GeoPoint) -> Option<f64> {
        let d = distance(self.origin, candidate, self.unit);
        (d <= self.radius + BOUNDARY_EPSILON).then_some(d)
    }

    pub fn contains(&self, candidate: GeoPoint) -> bool {
        self.distance_if_within(candidate).is_some()
    }

    /// Keep the candidates inside the radius, nearest first.
    ///
    /// Candidates whose coordinates fail validation are skipped.
    pub fn filter<T, I, F>(&self, candidates: I, locate: F) -> Vec<Hit<T>>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Result<GeoPoint, GeoError>,
    {
        let mut hits: Vec<Hit<T>> = candidates
            .into_iter()
            .filter_map(|item| {
                let point = match locate(&item) {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping candidate with invalid coordinates");
                        return None;
                    }
                };
                self.distance_if_within(point).map(|distance| Hit { item, distance })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

//! Built-in Charlotte attractions and radius search over them.

use crate::geo::{Coordinates, Hit, RadiusQuery};
use serde::Serialize;

struct BuiltinAttraction {
    id: &'static str,
    name: &'static str,
    rating: f64,
    price: &'static str,
    lat: f64,
    lon: f64,
}

const BUILTIN_ATTRACTIONS: &[BuiltinAttraction] = &[
    BuiltinAttraction {
        id: "nascar-hall-of-fame", name: "NASCAR Hall of Fame",
        rating: 4.6, price: "$$", lat: 35.2213, lon: -80.8466,
    },
    BuiltinAttraction {
        id: "discovery-place-science", name: "Discovery Place Science",
        rating: 4.5, price: "$$", lat: 35.2290, lon: -80.8405,
    },
    BuiltinAttraction {
        id: "mint-museum-uptown", name: "Mint Museum Uptown",
        rating: 4.6, price: "$$", lat: 35.2243, lon: -80.8487,
    },
    BuiltinAttraction {
        id: "romare-bearden-park", name: "Romare Bearden Park",
        rating: 4.7, price: "Free", lat: 35.2263, lon: -80.8472,
    },
    BuiltinAttraction {
        id: "bank-of-america-stadium", name: "Bank of America Stadium",
        rating: 4.6, price: "$$$", lat: 35.2258, lon: -80.8528,
    },
    BuiltinAttraction {
        id: "levine-museum-new-south", name: "Levine Museum of the New South",
        rating: 4.5, price: "$", lat: 35.2229, lon: -80.8381,
    },
    BuiltinAttraction {
        id: "freedom-park", name: "Freedom Park",
        rating: 4.8, price: "Free", lat: 35.1916, lon: -80.8441,
    },
    BuiltinAttraction {
        id: "billy-graham-library", name: "Billy Graham Library",
        rating: 4.8, price: "Free", lat: 35.2019, lon: -80.9380,
    },
    BuiltinAttraction {
        id: "us-national-whitewater-center", name: "U.S. National Whitewater Center",
        rating: 4.7, price: "$$", lat: 35.2735, lon: -81.0051,
    },
    BuiltinAttraction {
        id: "unc-charlotte-botanical-gardens", name: "UNC Charlotte Botanical Gardens",
        rating: 4.7, price: "Free", lat: 35.3075, lon: -80.7296,
    },
    BuiltinAttraction {
        id: "reedy-creek-nature-center", name: "Reedy Creek Nature Center",
        rating: 4.7, price: "Free", lat: 35.2679, lon: -80.7057,
    },
    BuiltinAttraction {
        id: "carowinds", name: "Carowinds",
        rating: 4.4, price: "$$$", lat: 35.1036, lon: -80.9420,
    },
    BuiltinAttraction {
        id: "charlotte-motor-speedway", name: "Charlotte Motor Speedway",
        rating: 4.6, price: "$$", lat: 35.3517, lon: -80.6828,
    },
    BuiltinAttraction {
        id: "daniel-stowe-botanical-garden", name: "Daniel Stowe Botanical Garden",
        rating: 4.8, price: "$$", lat: 35.2236, lon: -81.0727,
    },
];

/// An attraction as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub price: String,
    pub image_url: String,
    pub is_open: bool,
    pub coordinates: Coordinates,
}

fn builtin_to_attraction(a: &BuiltinAttraction) -> Attraction {
    Attraction {
        id: a.id.to_string(),
        name: a.name.to_string(),
        rating: a.rating,
        price: a.price.to_string(),
        image_url: String::new(),
        is_open: true,
        coordinates: Coordinates {
            latitude: a.lat,
            longitude: a.lon,
        },
    }
}

/// The full built-in list.
pub fn builtin_attractions() -> Vec<Attraction> {
    BUILTIN_ATTRACTIONS.iter().map(builtin_to_attraction).collect()
}

/// Attractions whose name contains `term` (case-insensitive) within the
/// query radius, nearest first.
pub fn search_attractions(term: Option<&str>, area: &RadiusQuery) -> Vec<Hit<Attraction>> {
    let term = term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty());
    let candidates = builtin_attractions().into_iter().filter(|a| {
        term.as_deref()
            .map_or(true, |t| a.name.to_lowercase().contains(t))
    });
    area.filter(candidates, |a| a.coordinates.to_point())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{DistanceUnit, GeoPoint, CHARLOTTE};

    fn area(radius: f64) -> RadiusQuery {
        RadiusQuery::new(CHARLOTTE, radius, DistanceUnit::Miles).unwrap()
    }

    #[test]
    fn test_builtin_coordinates_valid() {
        for a in builtin_attractions() {
            assert!(a.coordinates.to_point().is_ok(), "{}", a.name);
        }
    }

    #[test]
    fn test_uptown_radius() {
        let hits = search_attractions(None, &area(1.0));
        assert_eq!(hits.len(), 6);
        assert_eq!(hits[0].item.id, "discovery-place-science");
        assert!(hits.iter().all(|h| h.distance <= 1.0));
    }

    #[test]
    fn test_wide_radius_includes_everything() {
        let hits = search_attractions(None, &area(25.0));
        assert_eq!(hits.len(), builtin_attractions().len());
    }

    #[test]
    fn test_term_filter() {
        let hits = search_attractions(Some("botanical"), &area(25.0));
        let ids: Vec<&str> = hits.iter().map(|h| h.item.id.as_str()).collect();
        assert_eq!(ids, vec!["unc-charlotte-botanical-gardens", "daniel-stowe-botanical-garden"]);
    }

    #[test]
    fn test_far_origin_finds_nothing() {
        let raleigh = GeoPoint::new(35.7796, -78.6382).unwrap();
        let q = RadiusQuery::new(raleigh, 50.0, DistanceUnit::Miles).unwrap();
        assert!(search_attractions(None, &q).is_empty());
    }
}

//! Things to do: events from a catalog file and built-in attractions,
//! both searchable by radius.

pub mod attractions;
pub mod events;

pub use attractions::{builtin_attractions, search_attractions, Attraction};
pub use events::{CatalogError, DateFilter, Event, EventCatalog, EventQuery, Venue};
